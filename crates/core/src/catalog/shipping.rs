//! Shipping zones: per-wilaya delivery prices.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ShippingZoneId};

/// Delivery configuration for one wilaya.
///
/// `office_price` applies to pickup at the carrier's office, `home_price` to
/// delivery at the customer's door. `communes` lists the valid home-delivery
/// destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: ShippingZoneId,
    pub wilaya: String,
    pub office_price: Price,
    pub home_price: Price,
    #[serde(default)]
    pub communes: Vec<String>,
}

impl ShippingZone {
    /// Whether `commune` is a configured home-delivery destination.
    #[must_use]
    pub fn serves(&self, commune: &str) -> bool {
        let commune = commune.trim();
        self.communes.iter().any(|c| c == commune)
    }
}

/// Reasons a shipping zone input is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingZoneDraftError {
    #[error("wilaya cannot be empty")]
    EmptyWilaya,
    #[error("{field} cannot be negative")]
    NegativePrice { field: &'static str },
    #[error("{field} cannot exceed {max}", max = Price::MAX_STORED)]
    PriceTooLarge { field: &'static str },
}

/// Merchant input for a shipping zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZoneDraft {
    pub wilaya: String,
    pub office_price: Price,
    pub home_price: Price,
    #[serde(default)]
    pub communes: Vec<String>,
}

impl ShippingZoneDraft {
    /// Validate and normalise the draft.
    ///
    /// Names are trimmed; blank and repeated communes are dropped, keeping
    /// first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank wilaya or a price outside
    /// `0..=Price::MAX_STORED`.
    pub fn normalize(self) -> Result<Self, ShippingZoneDraftError> {
        let wilaya = self.wilaya.trim().to_owned();
        if wilaya.is_empty() {
            return Err(ShippingZoneDraftError::EmptyWilaya);
        }
        if self.office_price.is_negative() {
            return Err(ShippingZoneDraftError::NegativePrice {
                field: "office_price",
            });
        }
        if self.home_price.is_negative() {
            return Err(ShippingZoneDraftError::NegativePrice {
                field: "home_price",
            });
        }
        for (field, price) in [
            ("office_price", self.office_price),
            ("home_price", self.home_price),
        ] {
            if price.exceeds_storage() {
                return Err(ShippingZoneDraftError::PriceTooLarge { field });
            }
        }

        let mut communes: Vec<String> = Vec::with_capacity(self.communes.len());
        for commune in self.communes {
            let commune = commune.trim();
            if !commune.is_empty() && !communes.iter().any(|c| c == commune) {
                communes.push(commune.to_owned());
            }
        }

        Ok(Self {
            wilaya,
            office_price: self.office_price,
            home_price: self.home_price,
            communes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_dedupes() {
        let draft = ShippingZoneDraft {
            wilaya: " Alger ".to_owned(),
            office_price: Price::from_whole(400),
            home_price: Price::from_whole(600),
            communes: vec![
                "Bab Ezzouar".to_owned(),
                " ".to_owned(),
                "Bab Ezzouar ".to_owned(),
                "Hydra".to_owned(),
            ],
        };
        let zone = draft.normalize().unwrap();
        assert_eq!(zone.wilaya, "Alger");
        assert_eq!(zone.communes, vec!["Bab Ezzouar", "Hydra"]);
    }

    #[test]
    fn test_normalize_rejects_negative_price() {
        let draft = ShippingZoneDraft {
            wilaya: "Oran".to_owned(),
            office_price: Price::from_whole(-1),
            home_price: Price::ZERO,
            communes: Vec::new(),
        };
        assert_eq!(
            draft.normalize(),
            Err(ShippingZoneDraftError::NegativePrice {
                field: "office_price"
            })
        );
    }

    #[test]
    fn test_normalize_rejects_unstorable_price() {
        let draft = ShippingZoneDraft {
            wilaya: "Oran".to_owned(),
            office_price: Price::from_whole(500),
            home_price: Price::from_whole(10_000_000_000),
            communes: Vec::new(),
        };
        assert_eq!(
            draft.normalize(),
            Err(ShippingZoneDraftError::PriceTooLarge {
                field: "home_price"
            })
        );
    }

    #[test]
    fn test_serves_commune() {
        let zone = ShippingZone {
            id: ShippingZoneId::generate(),
            wilaya: "Alger".to_owned(),
            office_price: Price::from_whole(400),
            home_price: Price::from_whole(600),
            communes: vec!["Hydra".to_owned()],
        };
        assert!(zone.serves(" Hydra"));
        assert!(!zone.serves("Blida"));
    }
}
