//! Checkout service.
//!
//! Prices are always recomputed here from stored product and shipping data;
//! amounts sent by the browser are never trusted.

mod error;

pub use error::CheckoutError;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use souq_core::catalog::Product;
use souq_core::orders::{CheckoutRequest, NewOrder, Order};
use souq_core::pricing::{self, DeliveryTarget, OptionSelections, Quote};
use souq_core::{ProductId, RequesterFingerprint};

use crate::db::{self, CatalogRepository, OrderRepository};
use crate::state::AppState;

/// An order form for one product.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub checkout: CheckoutRequest,
}

/// What the product page asks to be priced.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub quantity: u32,
    #[serde(flatten)]
    pub selections: OptionSelections,
    /// Include shipping to this wilaya when present.
    #[serde(default)]
    pub wilaya: Option<String>,
    #[serde(default)]
    pub ship_to_home: bool,
}

impl QuoteRequest {
    fn target(&self) -> Option<DeliveryTarget<'_>> {
        self.wilaya
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|wilaya| DeliveryTarget {
                wilaya,
                ship_to_home: self.ship_to_home,
            })
    }
}

/// Checkout operations backed by the application state.
pub struct CheckoutService<'a> {
    state: &'a AppState,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Price a product for the given selections and optional destination.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::ProductNotFound` if the product does not exist.
    /// Returns `CheckoutError::Pricing` if the product's modifiers are broken
    /// or the amount is too large to compute.
    /// Returns `CheckoutError::Repository` if the store cannot be read.
    #[instrument(skip(self, request), fields(product_id = %product_id, quantity = request.quantity))]
    pub async fn quote(
        &self,
        product_id: ProductId,
        request: &QuoteRequest,
    ) -> Result<Quote, CheckoutError> {
        let product = self.product(product_id).await?;
        let shipping = self.state.shipping().await?;

        let quote = pricing::quote(
            &product,
            &request.selections,
            request.quantity,
            request.target(),
            &shipping.table,
        )?;
        report_pricing_gaps(&product, request.wilaya.as_deref(), &quote);

        Ok(quote)
    }

    /// Validate, price, de-duplicate and persist an order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::ProductNotFound` if the product does not exist.
    /// Returns `CheckoutError::Invalid` if the form breaks a checkout rule.
    /// Returns `CheckoutError::Duplicate` if the requester ordered this
    /// product inside the duplicate window.
    /// Returns `CheckoutError::Pricing` if the product's modifiers are broken
    /// or the amount is too large to compute.
    /// Returns `CheckoutError::Repository` if the store cannot be read or written.
    #[instrument(
        skip(self, request),
        fields(product_id = %request.product_id, fingerprint = %fingerprint)
    )]
    pub async fn place_order(
        &self,
        request: OrderRequest,
        fingerprint: RequesterFingerprint,
        now: DateTime<Utc>,
    ) -> Result<Order, CheckoutError> {
        let product = self.product(request.product_id).await?;
        let shipping = self.state.shipping().await?;

        let zone = shipping.zone(&request.checkout.wilaya);
        let checkout = request.checkout.validate(&product, zone)?;

        let quote = pricing::quote(
            &product,
            &checkout.selections,
            checkout.quantity,
            Some(checkout.destination.target()),
            &shipping.table,
        )?
        .storable()?;
        report_pricing_gaps(&product, Some(&checkout.destination.wilaya), &quote);

        let guard = self.state.duplicate_guard();
        let orders = OrderRepository::new(self.state.pool());
        let recent = db::bounded(
            self.state.store_timeout(),
            orders.recent(product.id, &fingerprint, guard.since(now)),
        )
        .await?;
        if guard.is_duplicate(product.id, &fingerprint, &recent, now) {
            info!("Rejected duplicate order");
            return Err(CheckoutError::Duplicate);
        }

        let new_order = NewOrder::new(&product, checkout, &quote, fingerprint);
        let order = db::bounded(self.state.store_timeout(), orders.create(&new_order)).await?;

        info!(
            order_id = %order.id,
            total = %order.total_price,
            "Order placed"
        );
        Ok(order)
    }

    async fn product(&self, id: ProductId) -> Result<Product, CheckoutError> {
        db::bounded(
            self.state.store_timeout(),
            CatalogRepository::new(self.state.pool()).product(id),
        )
        .await?
        .ok_or(CheckoutError::ProductNotFound)
    }
}

/// Log selections with no configured modifier and destinations with no zone.
/// Both are priced at zero rather than rejected.
fn report_pricing_gaps(product: &Product, wilaya: Option<&str>, quote: &Quote) {
    for unmatched in &quote.unmatched_options {
        warn!(
            product_id = %product.id,
            dimension = %unmatched.dimension,
            option = %unmatched.value,
            "Selected option has no configured modifier, pricing it at zero"
        );
    }
    if quote.shipping_unconfigured() {
        warn!(
            product_id = %product.id,
            wilaya = wilaya.unwrap_or_default(),
            "No shipping zone for wilaya, shipping priced at zero"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_blank_wilaya_has_no_target() {
        let request: QuoteRequest =
            serde_json::from_value(serde_json::json!({"quantity": 2, "wilaya": "  "})).unwrap();
        assert!(request.target().is_none());
    }

    #[test]
    fn test_quote_request_reads_flat_selections() {
        let request: QuoteRequest = serde_json::from_value(serde_json::json!({
            "quantity": 3,
            "size": "L",
            "wilaya": "Oran",
            "ship_to_home": true
        }))
        .unwrap();
        assert_eq!(request.selections.size(), Some("L"));
        let target = request.target().unwrap();
        assert_eq!(target.wilaya, "Oran");
        assert!(target.ship_to_home);
    }

    #[test]
    fn test_order_request_flattens_checkout() {
        let product_id = ProductId::generate();
        let request: OrderRequest = serde_json::from_value(serde_json::json!({
            "product_id": product_id,
            "customer_name": "Amina",
            "customer_phone": "0550123456",
            "wilaya": "Alger",
            "commune": "Bab Ezzouar",
            "ship_to_home": true,
            "quantity": 1,
            "color": "Rouge"
        }))
        .unwrap();
        assert_eq!(request.product_id, product_id);
        assert_eq!(request.checkout.selections.color(), Some("Rouge"));
        assert!(request.checkout.ship_to_home);
    }
}
