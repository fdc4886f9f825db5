//! Offline price check.
//!
//! Prices a product exported from the admin API (`GET /api/products/{id}`)
//! without touching the database, using the same rule engine as checkout.
//!
//! ```bash
//! souq-cli quote --product burnous.json --quantity 3 --size L \
//!     --option "Broderie=Fil d'or" --shipping zones.yaml --wilaya Alger --home
//! ```

use std::collections::BTreeMap;

use tracing::{info, warn};

use souq_core::catalog::{Product, ShippingZone};
use souq_core::pricing::{DeliveryTarget, OptionSelections, Quote, ShippingTable, quote};
use souq_core::{Price, ShippingZoneId};

use super::seed::parse_zones;
use super::{CommandError, read_file};

/// What to price.
#[derive(Debug, Clone, Default)]
pub struct QuoteArgs {
    pub product: String,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
    /// `group=value` pairs for custom option groups.
    pub options: Vec<String>,
    pub shipping: Option<String>,
    pub wilaya: Option<String>,
    pub home: bool,
}

/// Split `group=value` pairs into custom selections.
pub fn custom_selections(pairs: &[String]) -> Result<BTreeMap<String, String>, CommandError> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(group, value)| (group.trim().to_owned(), value.trim().to_owned()))
                .filter(|(group, _)| !group.is_empty())
                .ok_or_else(|| CommandError::Invalid(format!("expected group=value, got {pair}")))
        })
        .collect()
}

fn zones_from_drafts(content: &str, path: &str) -> Result<Vec<ShippingZone>, CommandError> {
    Ok(parse_zones(path, content)?
        .into_iter()
        .map(|draft| ShippingZone {
            id: ShippingZoneId::generate(),
            wilaya: draft.wilaya,
            office_price: draft.office_price,
            home_price: draft.home_price,
            communes: draft.communes,
        })
        .collect())
}

/// Price `args.quantity` units of the product described by `product_json`.
///
/// # Errors
///
/// Returns an error if the product cannot be decoded or its modifiers make
/// the unit price negative.
pub fn price(
    args: &QuoteArgs,
    product_json: &str,
    zones: &[ShippingZone],
) -> Result<Quote, CommandError> {
    let product: Product =
        serde_json::from_str(product_json).map_err(|e| CommandError::Parse {
            path: args.product.clone(),
            reason: e.to_string(),
        })?;

    let selections = OptionSelections {
        size: args.size.clone(),
        color: args.color.clone(),
        custom: custom_selections(&args.options)?,
    };
    let target = args.wilaya.as_deref().map(|wilaya| DeliveryTarget {
        wilaya: wilaya.trim(),
        ship_to_home: args.home,
    });

    quote(
        &product,
        &selections,
        args.quantity,
        target,
        &ShippingTable::from_zones(zones),
    )
    .map_err(|e| CommandError::Invalid(e.to_string()))
}

/// Print a quote for the given arguments.
///
/// # Errors
///
/// Returns an error if an input file cannot be read or parsed, or the
/// product cannot be priced.
pub async fn run(args: QuoteArgs) -> Result<(), CommandError> {
    let product_json = read_file(&args.product).await?;
    let zones = match &args.shipping {
        Some(path) => zones_from_drafts(&read_file(path).await?, path)?,
        None => Vec::new(),
    };

    let quote = price(&args, &product_json, &zones)?;

    for unmatched in &quote.unmatched_options {
        warn!(
            dimension = %unmatched.dimension,
            value = %unmatched.value,
            "Option has no price modifier"
        );
    }
    if quote.shipping_unconfigured() {
        warn!(wilaya = ?args.wilaya, "No shipping zone for wilaya, shipping priced at zero");
    }

    info!("Unit price: {}", quote.unit_price);
    info!("Subtotal ({} units): {}", quote.quantity, quote.subtotal);
    info!(
        "Shipping: {}",
        quote.shipping.map_or(Price::ZERO, |s| s.amount())
    );
    info!("Total: {}", quote.total);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use souq_core::pricing::ShippingCost;

    use super::*;

    const PRODUCT: &str = r#"{
        "id": "8d6f8a9e-3c1b-4c51-9d35-0d2b6a2f6c11",
        "product_type_id": "1f0e6a3b-2a7c-4f0e-8a55-5d6a0c1e9b22",
        "name": "Burnous",
        "description": null,
        "base_price": 5000,
        "price_before_discount": null,
        "options": {"sizes": [{"name": "L", "priceModifier": 500}]},
        "quantity_offers": [{"quantity": 2, "price": 9000}],
        "min_quantity": 1,
        "max_quantity": null,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    }"#;

    fn zone(wilaya: &str, office: i64, home: i64) -> ShippingZone {
        ShippingZone {
            id: ShippingZoneId::generate(),
            wilaya: wilaya.to_owned(),
            office_price: Price::from_whole(office),
            home_price: Price::from_whole(home),
            communes: Vec::new(),
        }
    }

    #[test]
    fn test_custom_selections() {
        let parsed =
            custom_selections(&["Broderie = Fil d'or".to_owned(), "Doublure=Soie".to_owned()])
                .unwrap();
        assert_eq!(parsed.get("Broderie").map(String::as_str), Some("Fil d'or"));
        assert!(custom_selections(&["no-separator".to_owned()]).is_err());
        assert!(custom_selections(&["=value".to_owned()]).is_err());
    }

    #[test]
    fn test_price_with_home_delivery() {
        let args = QuoteArgs {
            product: "burnous.json".to_owned(),
            quantity: 1,
            wilaya: Some("Alger".to_owned()),
            home: true,
            ..QuoteArgs::default()
        };
        let quote = price(&args, PRODUCT, &[zone("Alger", 400, 600)]).unwrap();
        assert_eq!(quote.unit_price, Price::from_whole(5000));
        assert_eq!(
            quote.shipping,
            Some(ShippingCost::Configured(Price::from_whole(600)))
        );
        assert_eq!(quote.total, Price::from_whole(5600));
    }

    #[test]
    fn test_price_unknown_wilaya_ships_free() {
        let args = QuoteArgs {
            product: "burnous.json".to_owned(),
            quantity: 1,
            wilaya: Some("Tamanrasset".to_owned()),
            ..QuoteArgs::default()
        };
        let quote = price(&args, PRODUCT, &[zone("Alger", 400, 600)]).unwrap();
        assert!(quote.shipping_unconfigured());
        assert_eq!(quote.total, Price::from_whole(5000));
    }

    #[test]
    fn test_price_rejects_malformed_product() {
        let args = QuoteArgs {
            product: "broken.json".to_owned(),
            quantity: 1,
            ..QuoteArgs::default()
        };
        assert!(matches!(
            price(&args, "{}", &[]),
            Err(CommandError::Parse { .. })
        ));
    }
}
