//! Persisted orders.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checkout::ValidatedCheckout;
use crate::catalog::Product;
use crate::pricing::Quote;
use crate::types::{OrderId, OrderStatus, Price, ProductId, RequesterFingerprint};

/// An order as stored.
///
/// Customer fields are kept as entered: historic rows predate phone
/// validation, so `customer_phone` is a plain string here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// `None` once the product has been deleted.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub wilaya: String,
    pub commune: String,
    pub full_address: String,
    pub ship_to_home: bool,
    pub size: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub custom_options: BTreeMap<String, String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub shipping_cost: Price,
    pub total_price: Price,
    pub status: OrderStatus,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A priced, validated order ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub product_name: String,
    pub checkout: ValidatedCheckout,
    pub unit_price: Price,
    pub shipping_cost: Price,
    pub total_price: Price,
    pub fingerprint: RequesterFingerprint,
}

impl NewOrder {
    /// Combine a validated checkout with the server-side quote for it.
    #[must_use]
    pub fn new(
        product: &Product,
        checkout: ValidatedCheckout,
        quote: &Quote,
        fingerprint: RequesterFingerprint,
    ) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            checkout,
            unit_price: quote.unit_price,
            shipping_cost: quote.shipping.map_or(Price::ZERO, |s| s.amount()),
            total_price: quote.total,
            fingerprint,
        }
    }
}
