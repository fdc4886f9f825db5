//! Shipping cost lookup by wilaya and delivery mode.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::ShippingZone;
use crate::types::Price;

/// Where a parcel goes, as far as pricing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryTarget<'a> {
    pub wilaya: &'a str,
    pub ship_to_home: bool,
}

/// Resolved shipping fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum ShippingCost {
    Configured(Price),
    /// No zone exists for the wilaya. Priced at zero.
    Unconfigured,
}

impl ShippingCost {
    /// Amount charged.
    #[must_use]
    pub const fn amount(self) -> Price {
        match self {
            Self::Configured(price) => price,
            Self::Unconfigured => Price::ZERO,
        }
    }

    #[must_use]
    pub const fn is_configured(self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rates {
    office: Price,
    home: Price,
}

/// Wilaya-indexed shipping rates, built once from the stored zones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingTable {
    rates: HashMap<String, Rates>,
}

impl ShippingTable {
    /// Index `zones` by wilaya. The first zone for a wilaya wins.
    #[must_use]
    pub fn from_zones(zones: &[ShippingZone]) -> Self {
        let mut rates = HashMap::with_capacity(zones.len());
        for zone in zones {
            rates
                .entry(zone.wilaya.trim().to_owned())
                .or_insert(Rates {
                    office: zone.office_price,
                    home: zone.home_price,
                });
        }
        Self { rates }
    }

    /// Fee for delivering to `target`.
    ///
    /// Does not check that a home-delivery commune belongs to the wilaya.
    #[must_use]
    pub fn cost(&self, target: DeliveryTarget<'_>) -> ShippingCost {
        self.rates
            .get(target.wilaya.trim())
            .map_or(ShippingCost::Unconfigured, |rates| {
                ShippingCost::Configured(if target.ship_to_home {
                    rates.home
                } else {
                    rates.office
                })
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Fee for delivering to `wilaya` from a plain list of zones.
#[must_use]
pub fn shipping_cost(wilaya: &str, ship_to_home: bool, zones: &[ShippingZone]) -> ShippingCost {
    ShippingTable::from_zones(zones).cost(DeliveryTarget {
        wilaya,
        ship_to_home,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShippingZoneId;

    fn zones() -> Vec<ShippingZone> {
        vec![ShippingZone {
            id: ShippingZoneId::generate(),
            wilaya: "Alger".to_owned(),
            office_price: Price::from_whole(400),
            home_price: Price::from_whole(600),
            communes: vec!["Hydra".to_owned()],
        }]
    }

    #[test]
    fn test_shipping_lookup() {
        assert_eq!(
            shipping_cost("Alger", true, &zones()),
            ShippingCost::Configured(Price::from_whole(600))
        );
        assert_eq!(
            shipping_cost("Alger", false, &zones()),
            ShippingCost::Configured(Price::from_whole(400))
        );
    }

    #[test]
    fn test_unknown_wilaya_is_unconfigured_zero() {
        let cost = shipping_cost("Tamanrasset", true, &zones());
        assert_eq!(cost, ShippingCost::Unconfigured);
        assert_eq!(cost.amount(), Price::ZERO);
        assert!(!cost.is_configured());
    }

    #[test]
    fn test_cost_serializes_with_status() {
        let json = serde_json::to_value(ShippingCost::Unconfigured).unwrap_or_default();
        assert_eq!(json["status"], "unconfigured");
    }
}
