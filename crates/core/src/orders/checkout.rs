//! Checkout input validation.
//!
//! A [`CheckoutRequest`] is what the storefront form posts. Validating it
//! against the product and the wilaya's shipping zone yields a
//! [`ValidatedCheckout`] with a parsed phone number and a typed
//! [`Destination`], or the first [`ValidationError`] found.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ShippingZone};
use crate::pricing::{DeliveryTarget, OptionSelections};
use crate::types::{Phone, PhoneError};

/// Commune label stored for office pickup orders.
pub const PICKUP_COMMUNE: &str = "استلام من المكتب";

/// Why a checkout was refused. All variants are the shopper's to fix.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("customer name is required")]
    MissingName,
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),
    #[error("wilaya is required")]
    MissingWilaya,
    #[error("commune is required for home delivery")]
    MissingCommune,
    #[error("home delivery is not available to {commune} in {wilaya}")]
    UnknownCommune { wilaya: String, commune: String },
    #[error("a size must be selected")]
    MissingSize,
    #[error("a color must be selected")]
    MissingColor,
    #[error("a value for {group} must be selected")]
    MissingCustomOption { group: String },
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("minimum order quantity is {min}")]
    BelowMinimum { min: u32, requested: u32 },
    #[error("only {available} left in stock")]
    ExceedsStock { available: u32, requested: u32 },
}

/// How the parcel reaches the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Home { commune: String },
    OfficePickup,
}

/// A validated delivery destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub wilaya: String,
    pub delivery: Delivery,
}

impl Destination {
    #[must_use]
    pub const fn ship_to_home(&self) -> bool {
        matches!(self.delivery, Delivery::Home { .. })
    }

    /// Commune column value; pickup orders carry [`PICKUP_COMMUNE`].
    #[must_use]
    pub fn commune(&self) -> &str {
        match &self.delivery {
            Delivery::Home { commune } => commune,
            Delivery::OfficePickup => PICKUP_COMMUNE,
        }
    }

    /// Human-readable address printed on the order.
    #[must_use]
    pub fn full_address(&self) -> String {
        format!("{}, {}", self.commune(), self.wilaya)
    }

    /// Pricing view of this destination.
    #[must_use]
    pub fn target(&self) -> DeliveryTarget<'_> {
        DeliveryTarget {
            wilaya: &self.wilaya,
            ship_to_home: self.ship_to_home(),
        }
    }
}

/// Order form as posted by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub wilaya: String,
    #[serde(default)]
    pub commune: Option<String>,
    #[serde(default)]
    pub ship_to_home: bool,
    pub quantity: u32,
    #[serde(flatten)]
    pub selections: OptionSelections,
}

/// A checkout that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub customer_name: String,
    pub phone: Phone,
    pub destination: Destination,
    pub quantity: u32,
    /// Trimmed selections, limited to dimensions the product configures.
    pub selections: OptionSelections,
}

impl CheckoutRequest {
    /// Validate against `product` and the wilaya's zone, if one exists.
    ///
    /// A missing zone is not an error here: shipping falls back to an
    /// unconfigured (zero) fee and the caller is expected to log it. When a
    /// zone lists communes, home delivery must target one of them.
    ///
    /// # Errors
    ///
    /// Returns the first rule the request breaks.
    pub fn validate(
        self,
        product: &Product,
        zone: Option<&ShippingZone>,
    ) -> Result<ValidatedCheckout, ValidationError> {
        let customer_name = self.customer_name.trim().to_owned();
        if customer_name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let phone = Phone::parse(&self.customer_phone)?;

        let wilaya = self.wilaya.trim().to_owned();
        if wilaya.is_empty() {
            return Err(ValidationError::MissingWilaya);
        }

        let delivery = if self.ship_to_home {
            let commune = self
                .commune
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or(ValidationError::MissingCommune)?;
            if let Some(zone) = zone
                && !zone.communes.is_empty()
                && !zone.serves(commune)
            {
                return Err(ValidationError::UnknownCommune {
                    wilaya,
                    commune: commune.to_owned(),
                });
            }
            Delivery::Home {
                commune: commune.to_owned(),
            }
        } else {
            Delivery::OfficePickup
        };

        let selections = required_selections(&self.selections, product)?;

        let quantity = self.quantity;
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if quantity < product.min_quantity {
            return Err(ValidationError::BelowMinimum {
                min: product.min_quantity,
                requested: quantity,
            });
        }
        if let Some(available) = product.stock.max_quantity()
            && quantity > available
        {
            return Err(ValidationError::ExceedsStock {
                available,
                requested: quantity,
            });
        }

        Ok(ValidatedCheckout {
            customer_name,
            phone,
            destination: Destination { wilaya, delivery },
            quantity,
            selections,
        })
    }
}

fn required_selections(
    selections: &OptionSelections,
    product: &Product,
) -> Result<OptionSelections, ValidationError> {
    let options = &product.options;

    let size = if options.requires_size() {
        Some(selections.size().ok_or(ValidationError::MissingSize)?.to_owned())
    } else {
        None
    };
    let color = if options.requires_color() {
        Some(selections.color().ok_or(ValidationError::MissingColor)?.to_owned())
    } else {
        None
    };

    let mut custom = BTreeMap::new();
    for group in options.required_custom_groups() {
        let name = group.option_name.trim();
        let value = selections
            .custom(name)
            .or_else(|| selections.custom(&group.option_name))
            .ok_or_else(|| ValidationError::MissingCustomOption {
                group: name.to_owned(),
            })?;
        custom.insert(name.to_owned(), value.to_owned());
    }

    Ok(OptionSelections {
        size,
        color,
        custom,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CustomOptionGroup, OptionValue, ProductOptions, Stock};
    use crate::types::{Price, ProductId, ProductTypeId, ShippingZoneId};

    fn product() -> Product {
        let now = chrono::Utc::now();
        Product {
            id: ProductId::generate(),
            product_type_id: ProductTypeId::generate(),
            name: "Kaftan".to_owned(),
            description: None,
            description_content: Vec::new(),
            base_price: Price::from_whole(1000),
            price_before_discount: None,
            images: Vec::new(),
            options: ProductOptions {
                sizes: vec![OptionValue::new("L", Price::from_whole(200))],
                colors: Vec::new(),
                custom_options: vec![CustomOptionGroup {
                    option_name: "material".to_owned(),
                    values: vec![OptionValue::new("silk", Price::from_whole(300))],
                }],
            },
            quantity_offers: Vec::new(),
            min_quantity: 2,
            stock: Stock::Limited(5),
            created_at: now,
            updated_at: now,
        }
    }

    fn zone() -> ShippingZone {
        ShippingZone {
            id: ShippingZoneId::generate(),
            wilaya: "Alger".to_owned(),
            office_price: Price::from_whole(400),
            home_price: Price::from_whole(600),
            communes: vec!["Hydra".to_owned()],
        }
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            customer_name: " Yacine ".to_owned(),
            customer_phone: "0550123456".to_owned(),
            wilaya: "Alger".to_owned(),
            commune: Some("Hydra".to_owned()),
            ship_to_home: true,
            quantity: 2,
            selections: OptionSelections {
                size: Some("L".to_owned()),
                color: Some("ignored".to_owned()),
                custom: BTreeMap::from([("material".to_owned(), "silk".to_owned())]),
            },
        }
    }

    #[test]
    fn test_valid_home_delivery() {
        let checkout = request().validate(&product(), Some(&zone())).unwrap();
        assert_eq!(checkout.customer_name, "Yacine");
        assert_eq!(checkout.destination.full_address(), "Hydra, Alger");
        assert!(checkout.destination.ship_to_home());
        // colour is not configured, so the stray selection is dropped
        assert_eq!(checkout.selections.color, None);
    }

    #[test]
    fn test_office_pickup_ignores_commune() {
        let mut req = request();
        req.ship_to_home = false;
        req.commune = None;
        let checkout = req.validate(&product(), Some(&zone())).unwrap();
        assert_eq!(checkout.destination.delivery, Delivery::OfficePickup);
        assert_eq!(checkout.destination.commune(), PICKUP_COMMUNE);
    }

    #[test]
    fn test_missing_fields() {
        let mut req = request();
        req.customer_name = String::new();
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::MissingName)
        );

        let mut req = request();
        req.customer_phone = "0123".to_owned();
        assert!(matches!(
            req.validate(&product(), None),
            Err(ValidationError::InvalidPhone(_))
        ));

        let mut req = request();
        req.wilaya = " ".to_owned();
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::MissingWilaya)
        );

        let mut req = request();
        req.commune = Some(String::new());
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::MissingCommune)
        );
    }

    #[test]
    fn test_commune_must_belong_to_zone() {
        let mut req = request();
        req.commune = Some("Oran".to_owned());
        assert!(matches!(
            req.validate(&product(), Some(&zone())),
            Err(ValidationError::UnknownCommune { .. })
        ));
    }

    #[test]
    fn test_commune_not_checked_without_zone() {
        let mut req = request();
        req.commune = Some("Oran".to_owned());
        assert!(req.validate(&product(), None).is_ok());
    }

    #[test]
    fn test_required_options() {
        let mut req = request();
        req.selections.size = None;
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::MissingSize)
        );

        let mut req = request();
        req.selections.custom.clear();
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::MissingCustomOption {
                group: "material".to_owned()
            })
        );
    }

    #[test]
    fn test_quantity_rules() {
        let mut req = request();
        req.quantity = 0;
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::ZeroQuantity)
        );

        let mut req = request();
        req.quantity = 1;
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::BelowMinimum {
                min: 2,
                requested: 1
            })
        );

        let mut req = request();
        req.quantity = 6;
        assert_eq!(
            req.validate(&product(), None),
            Err(ValidationError::ExceedsStock {
                available: 5,
                requested: 6
            })
        );
    }

    #[test]
    fn test_request_flattens_selections() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{
                "customer_name": "Lina",
                "customer_phone": "0661234567",
                "wilaya": "Oran",
                "quantity": 1,
                "size": "M",
                "custom": {"material": "cotton"}
            }"#,
        )
        .unwrap();
        assert!(!req.ship_to_home);
        assert_eq!(req.selections.size.as_deref(), Some("M"));
        assert_eq!(req.selections.custom["material"], "cotton");
    }
}
