//! Order totals and full price quotes.

use serde::Serialize;

use super::modifiers::{ModifierTable, OptionSelections, UnmatchedOption, resolve_unit_price};
use super::shipping::{DeliveryTarget, ShippingCost, ShippingTable};
use super::tiers::{TierBreakdown, price_for_quantity, tier_breakdown};
use crate::catalog::{Product, QuantityOffer};
use crate::types::Price;

/// Errors raised while pricing a product.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Option modifiers pushed the unit price below zero.
    #[error("unit price {amount} is negative; check the product's option modifiers")]
    NegativeUnitPrice { amount: Price },
    /// The requested quantity and configured prices give an amount too large
    /// to compute.
    #[error("price is too large to compute; lower the quantity")]
    Overflow,
}

/// Line price for `quantity` units plus shipping to `target`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the total cannot be represented.
pub fn assemble_total(
    quantity: u32,
    unit_price: Price,
    offers: &[QuantityOffer],
    target: DeliveryTarget<'_>,
    shipping: &ShippingTable,
) -> Result<Price, PricingError> {
    price_for_quantity(quantity, unit_price, offers)?
        .checked_add(shipping.cost(target).amount())
        .ok_or(PricingError::Overflow)
}

/// Everything needed to show or persist a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub quantity: u32,
    /// Base price with option modifiers applied.
    pub unit_price: Price,
    pub tiers: TierBreakdown,
    pub subtotal: Price,
    /// `None` when no destination was given.
    pub shipping: Option<ShippingCost>,
    pub total: Price,
    /// Selected option names with no configured modifier.
    pub unmatched_options: Vec<UnmatchedOption>,
}

impl Quote {
    /// Whether a destination was given but has no shipping zone.
    #[must_use]
    pub fn shipping_unconfigured(&self) -> bool {
        matches!(self.shipping, Some(ShippingCost::Unconfigured))
    }

    /// The quote, if every amount an order records fits a price column.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] otherwise.
    pub fn storable(self) -> Result<Self, PricingError> {
        if self.unit_price.exceeds_storage() || self.total.exceeds_storage() {
            return Err(PricingError::Overflow);
        }
        Ok(self)
    }
}

/// Price `quantity` units of `product` with the given option selections and,
/// optionally, shipping to `target`.
///
/// # Errors
///
/// Returns [`PricingError::NegativeUnitPrice`] when modifiers make the unit
/// price negative, and [`PricingError::Overflow`] when any amount cannot be
/// represented.
pub fn quote(
    product: &Product,
    selections: &OptionSelections,
    quantity: u32,
    target: Option<DeliveryTarget<'_>>,
    shipping: &ShippingTable,
) -> Result<Quote, PricingError> {
    let table = ModifierTable::from_options(&product.options);
    let unit = resolve_unit_price(product.base_price, selections, &table)?;
    if unit.amount.is_negative() {
        return Err(PricingError::NegativeUnitPrice {
            amount: unit.amount,
        });
    }

    let tiers = tier_breakdown(quantity, unit.amount, &product.quantity_offers)?;
    let subtotal = tiers.total;
    let shipping = target.map(|target| shipping.cost(target));
    let total = subtotal
        .checked_add(shipping.map_or(Price::ZERO, ShippingCost::amount))
        .ok_or(PricingError::Overflow)?;

    Ok(Quote {
        quantity,
        unit_price: unit.amount,
        tiers,
        subtotal,
        shipping,
        total,
        unmatched_options: unit.unmatched,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{OptionValue, ProductOptions, ShippingZone, Stock};
    use crate::types::{ProductId, ProductTypeId, ShippingZoneId};

    fn product() -> Product {
        let now = chrono::Utc::now();
        Product {
            id: ProductId::generate(),
            product_type_id: ProductTypeId::generate(),
            name: "Djellaba".to_owned(),
            description: None,
            description_content: Vec::new(),
            base_price: Price::from_whole(1000),
            price_before_discount: None,
            images: Vec::new(),
            options: ProductOptions {
                sizes: vec![OptionValue::new("L", Price::from_whole(200))],
                colors: vec![OptionValue::new("Red", Price::from_whole(-50))],
                custom_options: Vec::new(),
            },
            quantity_offers: vec![
                QuantityOffer::new(2, Price::from_whole(1800)),
                QuantityOffer::new(4, Price::from_whole(3400)),
            ],
            min_quantity: 1,
            stock: Stock::Limited(10),
            created_at: now,
            updated_at: now,
        }
    }

    fn table() -> ShippingTable {
        ShippingTable::from_zones(&[ShippingZone {
            id: ShippingZoneId::generate(),
            wilaya: "Alger".to_owned(),
            office_price: Price::from_whole(400),
            home_price: Price::from_whole(600),
            communes: Vec::new(),
        }])
    }

    #[test]
    fn test_assemble_total() {
        let total = assemble_total(
            5,
            Price::from_whole(1000),
            &product().quantity_offers,
            DeliveryTarget {
                wilaya: "Alger",
                ship_to_home: true,
            },
            &table(),
        );
        assert_eq!(total, Ok(Price::from_whole(5000)));
    }

    #[test]
    fn test_quote_breakdown() {
        let selections = OptionSelections {
            size: Some("L".to_owned()),
            color: Some("Red".to_owned()),
            ..OptionSelections::default()
        };
        let quote = quote(
            &product(),
            &selections,
            3,
            Some(DeliveryTarget {
                wilaya: "Alger",
                ship_to_home: false,
            }),
            &table(),
        )
        .unwrap();

        assert_eq!(quote.unit_price, Price::from_whole(1150));
        assert_eq!(quote.subtotal, Price::from_whole(2950));
        assert_eq!(
            quote.shipping,
            Some(ShippingCost::Configured(Price::from_whole(400)))
        );
        assert_eq!(quote.total, Price::from_whole(3350));
        assert!(!quote.shipping_unconfigured());
    }

    #[test]
    fn test_quote_without_destination() {
        let quote = quote(&product(), &OptionSelections::default(), 1, None, &table()).unwrap();
        assert_eq!(quote.shipping, None);
        assert_eq!(quote.total, Price::from_whole(1000));
    }

    #[test]
    fn test_quote_unconfigured_region() {
        let quote = quote(
            &product(),
            &OptionSelections::default(),
            1,
            Some(DeliveryTarget {
                wilaya: "Illizi",
                ship_to_home: true,
            }),
            &table(),
        )
        .unwrap();
        assert!(quote.shipping_unconfigured());
        assert_eq!(quote.total, Price::from_whole(1000));
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let mut product = product();
        product.options.colors = vec![OptionValue::new("Clearance", Price::from_whole(-2000))];
        let selections = OptionSelections {
            color: Some("Clearance".to_owned()),
            ..OptionSelections::default()
        };
        let err = quote(&product, &selections, 1, None, &table()).unwrap_err();
        assert_eq!(
            err,
            PricingError::NegativeUnitPrice {
                amount: Price::from_whole(-1000)
            }
        );
    }

    #[test]
    fn test_huge_quantity_of_huge_offer_is_an_error() {
        let mut product = product();
        product.quantity_offers = vec![QuantityOffer::new(
            1,
            Price::new(rust_decimal::Decimal::from_scientific("1e25").unwrap()),
        )];
        let err = quote(
            &product,
            &OptionSelections::default(),
            100_000,
            None,
            &table(),
        )
        .unwrap_err();
        assert_eq!(err, PricingError::Overflow);
    }

    #[test]
    fn test_largest_order_of_storable_prices_is_priced() {
        let mut product = product();
        product.base_price = Price::MAX_STORED;
        product.options = ProductOptions::default();
        product.quantity_offers = vec![QuantityOffer::new(7, Price::MAX_STORED)];
        let quote = quote(
            &product,
            &OptionSelections::default(),
            u32::MAX,
            Some(DeliveryTarget {
                wilaya: "Alger",
                ship_to_home: true,
            }),
            &table(),
        )
        .unwrap();
        assert!(quote.total > quote.subtotal);
        assert_eq!(quote.storable(), Err(PricingError::Overflow));
    }

    #[test]
    fn test_ordinary_quote_is_storable() {
        let quote = quote(&product(), &OptionSelections::default(), 4, None, &table()).unwrap();
        assert_eq!(quote.clone().storable(), Ok(quote));
    }
}
