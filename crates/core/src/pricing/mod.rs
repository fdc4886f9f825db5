//! Price computation.
//!
//! The pipeline is: option modifiers produce a unit price
//! ([`resolve_unit_price`]), quantity offers turn it into a line subtotal
//! ([`price_for_quantity`]), the shipping table adds a delivery fee
//! ([`ShippingTable::cost`]), and [`quote`] ties the three together.

pub mod modifiers;
pub mod shipping;
pub mod tiers;
pub mod total;

pub use modifiers::{
    ModifierTable, OptionDimension, OptionSelections, UnitPrice, UnmatchedOption,
    resolve_unit_price,
};
pub use shipping::{DeliveryTarget, ShippingCost, ShippingTable, shipping_cost};
pub use tiers::{TierBreakdown, best_offer, price_for_quantity, tier_breakdown};
pub use total::{PricingError, Quote, assemble_total, quote};
