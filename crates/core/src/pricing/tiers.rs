//! Quantity-tier pricing.

use serde::Serialize;

use super::total::PricingError;
use crate::catalog::QuantityOffer;
use crate::types::Price;

/// How a line total was composed from offers and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierBreakdown {
    /// The offer that was applied, if any qualified.
    pub offer: Option<QuantityOffer>,
    /// Number of times the offer was applied.
    pub full_sets: u32,
    /// Units priced at the unit price.
    pub remainder: u32,
    pub total: Price,
}

/// The largest offer whose bundle size fits in `quantity`.
///
/// Ties keep the first offer in input order. Offers with a zero bundle size
/// never qualify.
#[must_use]
pub fn best_offer(quantity: u32, offers: &[QuantityOffer]) -> Option<&QuantityOffer> {
    offers
        .iter()
        .filter(|offer| offer.quantity > 0 && offer.quantity <= quantity)
        .fold(None, |best: Option<&QuantityOffer>, offer| match best {
            Some(current) if current.quantity >= offer.quantity => Some(current),
            _ => Some(offer),
        })
}

/// Price `quantity` units: the best offer repeated as often as it fits, the
/// rest at `unit_price`.
///
/// `unit_price` should already include option modifiers. Offer prices are
/// flat totals and are not adjusted for options.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the total cannot be represented.
pub fn tier_breakdown(
    quantity: u32,
    unit_price: Price,
    offers: &[QuantityOffer],
) -> Result<TierBreakdown, PricingError> {
    let breakdown = match best_offer(quantity, offers) {
        Some(offer) => {
            let full_sets = quantity / offer.quantity;
            let remainder = quantity % offer.quantity;
            let total = offer
                .price
                .checked_times(full_sets)
                .zip(unit_price.checked_times(remainder))
                .and_then(|(sets, rest)| sets.checked_add(rest))
                .ok_or(PricingError::Overflow)?;
            TierBreakdown {
                offer: Some(offer.clone()),
                full_sets,
                remainder,
                total,
            }
        }
        None => TierBreakdown {
            offer: None,
            full_sets: 0,
            remainder: quantity,
            total: unit_price
                .checked_times(quantity)
                .ok_or(PricingError::Overflow)?,
        },
    };
    Ok(breakdown)
}

/// Total for `quantity` units. See [`tier_breakdown`].
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the total cannot be represented.
pub fn price_for_quantity(
    quantity: u32,
    unit_price: Price,
    offers: &[QuantityOffer],
) -> Result<Price, PricingError> {
    tier_breakdown(quantity, unit_price, offers).map(|breakdown| breakdown.total)
}
