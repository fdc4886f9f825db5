//! `PostgreSQL` row types shared by the storefront and admin binaries.
//!
//! Rows mirror the table columns one to one. Converting a row into its domain
//! type validates what the database cannot: JSON document shapes and
//! non-negative counts. Failures surface as [`RecordError`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::types::Json;

use crate::catalog::{
    DescriptionBlock, Product, ProductOptions, ProductType, ProductTypeSummary, QuantityOffer,
    Review, ShippingZone, Stock,
};
use crate::orders::{Order, RecentOrder};
use crate::settings::{SocialLinks, StoreSettings, ThemeSettings};
use crate::types::{
    OrderId, OrderStatus, Price, ProductId, ProductTypeId, RequesterFingerprint, ReviewId,
    ShippingZoneId,
};

/// A stored row that does not describe a valid domain value.
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("{table}.{column} is negative or out of range: {value}")]
    OutOfRange {
        table: &'static str,
        column: &'static str,
        value: i64,
    },
    #[error("{table}.{column} has an unexpected shape: {source}")]
    Json {
        table: &'static str,
        column: &'static str,
        source: serde_json::Error,
    },
}

fn count<T>(table: &'static str, column: &'static str, value: T) -> Result<u32, RecordError>
where
    T: Copy + Into<i64>,
    u32: TryFrom<T>,
{
    u32::try_from(value).map_err(|_| RecordError::OutOfRange {
        table,
        column,
        value: value.into(),
    })
}

/// Decode a JSON column; `null` yields the type's default.
fn document<T: DeserializeOwned + Default>(
    table: &'static str,
    column: &'static str,
    value: Option<Json<serde_json::Value>>,
) -> Result<T, RecordError> {
    match value.map(|json| json.0) {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|source| RecordError::Json {
            table,
            column,
            source,
        }),
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Column list matching [`ProductRow`].
pub const PRODUCT_COLUMNS: &str = "id, product_type_id, name, description, description_content, \
     base_price, price_before_discount, images, options, quantity_offers, min_quantity, \
     max_quantity, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: ProductId,
    pub product_type_id: ProductTypeId,
    pub name: String,
    pub description: Option<String>,
    pub description_content: Option<Json<serde_json::Value>>,
    pub base_price: Price,
    pub price_before_discount: Option<Price>,
    pub images: Vec<String>,
    pub options: Option<Json<serde_json::Value>>,
    pub quantity_offers: Option<Json<serde_json::Value>>,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RecordError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let options: ProductOptions = document("products", "options", row.options)?;
        let quantity_offers: Vec<QuantityOffer> =
            document("products", "quantity_offers", row.quantity_offers)?;
        let description_content: Vec<DescriptionBlock> =
            document("products", "description_content", row.description_content)?;
        let stock = match row.max_quantity {
            Some(max) => Stock::Limited(count("products", "max_quantity", max)?),
            None => Stock::Unlimited,
        };

        Ok(Self {
            id: row.id,
            product_type_id: row.product_type_id,
            name: row.name,
            description: row.description,
            description_content,
            base_price: row.base_price,
            price_before_discount: row.price_before_discount,
            images: row.images,
            options,
            quantity_offers,
            min_quantity: count("products", "min_quantity", row.min_quantity)?,
            stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProductTypeRow {
    pub id: ProductTypeId,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProductTypeRow> for ProductType {
    fn from(row: ProductTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProductTypeSummaryRow {
    #[sqlx(flatten)]
    pub product_type: ProductTypeRow,
    pub product_count: i64,
}

impl From<ProductTypeSummaryRow> for ProductTypeSummary {
    fn from(row: ProductTypeSummaryRow) -> Self {
        Self {
            product_type: row.product_type.into(),
            product_count: row.product_count,
        }
    }
}

/// `shipping_data` row. `base_price` is the office pickup price.
#[derive(Debug, sqlx::FromRow)]
pub struct ShippingZoneRow {
    pub id: ShippingZoneId,
    pub wilaya: String,
    pub base_price: Price,
    pub shipping_home_price: Price,
    pub communes: Vec<String>,
}

impl From<ShippingZoneRow> for ShippingZone {
    fn from(row: ShippingZoneRow) -> Self {
        Self {
            id: row.id,
            wilaya: row.wilaya,
            office_price: row.base_price,
            home_price: row.shipping_home_price,
            communes: row.communes,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub reviewer_name: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RecordError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(row.rating).map_err(|_| RecordError::OutOfRange {
            table: "reviews",
            column: "rating",
            value: row.rating.into(),
        })?;
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            reviewer_name: row.reviewer_name,
            rating,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Column list matching [`OrderRow`].
pub const ORDER_COLUMNS: &str = "id, product_id, product_name, customer_name, customer_phone, \
     wilaya, commune, full_address, ship_to_home, size, color, custom_options, quantity, \
     unit_price, shipping_cost, total_price, status, ip_address, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub id: OrderId,
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
    pub custom_options: Option<Json<serde_json::Value>>,
    pub quantity: i32,
    pub unit_price: Price,
    pub shipping_cost: Price,
    pub total_price: Price,
    pub status: OrderStatus,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RecordError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let custom_options: BTreeMap<String, String> =
            document("orders", "custom_options", row.custom_options)?;
        let ip_address = row
            .ip_address
            .map_or_else(RequesterFingerprint::unknown, |ip| {
                RequesterFingerprint::new(&ip)
            });

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            wilaya: row.wilaya,
            commune: row.commune,
            full_address: row.full_address,
            ship_to_home: row.ship_to_home,
            size: row.size,
            color: row.color,
            custom_options,
            quantity: count("orders", "quantity", row.quantity)?,
            unit_price: row.unit_price,
            shipping_cost: row.shipping_cost,
            total_price: row.total_price,
            status: row.status,
            ip_address: ip_address.as_str().to_owned(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The columns the duplicate guard needs.
#[derive(Debug, sqlx::FromRow)]
pub struct RecentOrderRow {
    pub product_id: ProductId,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RecentOrderRow> for RecentOrder {
    fn from(row: RecentOrderRow) -> Self {
        Self {
            product_id: row.product_id,
            fingerprint: row
                .ip_address
                .map_or_else(RequesterFingerprint::unknown, |ip| {
                    RequesterFingerprint::new(&ip)
                }),
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Column list matching [`StoreSettingsRow`].
pub const SETTINGS_COLUMNS: &str = "store_name, logo_url, hero_images, social_media, \
     phone_number, facebook_pixel_id, google_sheet_api_url, telegram_chat_id, theme_settings";

#[derive(Debug, sqlx::FromRow)]
pub struct StoreSettingsRow {
    pub store_name: String,
    pub logo_url: Option<String>,
    pub hero_images: Vec<String>,
    pub social_media: Option<Json<serde_json::Value>>,
    pub phone_number: Option<String>,
    pub facebook_pixel_id: Option<String>,
    pub google_sheet_api_url: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub theme_settings: Option<Json<serde_json::Value>>,
}

impl TryFrom<StoreSettingsRow> for StoreSettings {
    type Error = RecordError;

    fn try_from(row: StoreSettingsRow) -> Result<Self, Self::Error> {
        let social_media: SocialLinks =
            document("store_settings", "social_media", row.social_media)?;
        let theme: ThemeSettings =
            document("store_settings", "theme_settings", row.theme_settings)?;
        let blank_to_none = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Ok(Self {
            store_name: row.store_name,
            logo_url: blank_to_none(row.logo_url),
            hero_images: row.hero_images,
            social_media,
            phone_number: blank_to_none(row.phone_number),
            facebook_pixel_id: blank_to_none(row.facebook_pixel_id),
            google_sheet_api_url: blank_to_none(row.google_sheet_api_url),
            telegram_chat_id: blank_to_none(row.telegram_chat_id),
            theme,
        })
    }
}
