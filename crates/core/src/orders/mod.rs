//! Order rules: checkout validation, duplicate detection, status transitions
//! and merchant filters.

pub mod checkout;
pub mod duplicate;
pub mod filter;
pub mod order;
pub mod transition;

pub use checkout::{
    CheckoutRequest, Delivery, Destination, PICKUP_COMMUNE, ValidatedCheckout, ValidationError,
};
pub use duplicate::{
    DEFAULT_WINDOW_HOURS, DuplicateGuard, MAX_WINDOW_HOURS, RecentOrder, is_duplicate,
};
pub use filter::{DateRange, OrderFilter};
pub use order::{NewOrder, Order};
pub use transition::{
    InventoryEffect, InventoryError, StatusChange, StatusEffect, StatusMatch, TRANSITION_RULES,
    TransitionRule, effects_for, plan_status_change,
};
