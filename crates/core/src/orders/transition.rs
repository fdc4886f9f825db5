//! Order status transitions and their inventory side effects.
//!
//! The merchant may move an order between any two statuses. What the rule
//! table governs is which side effects a move triggers. Today there is one
//! rule: entering `delivered` from any other status decrements the product's
//! stock by the ordered quantity.
//!
//! Planning is pure. Callers must plan against the status read from the
//! authoritative record inside the same transaction that applies the result,
//! never against a status supplied by the client.

use serde::Serialize;

use crate::catalog::Stock;
use crate::types::OrderStatus;

/// Matches one side of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMatch {
    Any,
    AnyExcept(OrderStatus),
    Exactly(OrderStatus),
}

impl StatusMatch {
    #[must_use]
    pub const fn matches(self, status: OrderStatus) -> bool {
        match self {
            Self::Any => true,
            Self::AnyExcept(excluded) => !matches_status(excluded, status),
            Self::Exactly(expected) => matches_status(expected, status),
        }
    }
}

const fn matches_status(a: OrderStatus, b: OrderStatus) -> bool {
    a as u8 == b as u8
}

/// A side effect attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    /// Subtract the ordered quantity from limited stock.
    DecrementStock,
}

/// `from × to → effects`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: StatusMatch,
    pub to: StatusMatch,
    pub effects: &'static [StatusEffect],
}

/// Every transition rule. Transitions no rule matches have no side effects.
pub const TRANSITION_RULES: &[TransitionRule] = &[TransitionRule {
    from: StatusMatch::AnyExcept(OrderStatus::Delivered),
    to: StatusMatch::Exactly(OrderStatus::Delivered),
    effects: &[StatusEffect::DecrementStock],
}];

/// Effects triggered by moving from `from` to `to`.
pub fn effects_for(from: OrderStatus, to: OrderStatus) -> impl Iterator<Item = StatusEffect> {
    TRANSITION_RULES
        .iter()
        .filter(move |rule| rule.from.matches(from) && rule.to.matches(to))
        .flat_map(|rule| rule.effects.iter().copied())
}

/// What happens to the product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventoryEffect {
    /// No rule asked for a stock change.
    Unchanged,
    /// A decrement was due but the product has unlimited stock.
    Exempt,
    /// A decrement was due but the product no longer exists.
    Orphaned,
    Decremented { before: u32, after: u32 },
}

/// A planned status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub inventory: InventoryEffect,
}

impl StatusChange {
    /// Whether the status is unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Errors from planning a status change.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryError {
    #[error("insufficient inventory: {requested} requested, {available} available")]
    Insufficient { available: u32, requested: u32 },
}

/// Plan moving an order of `quantity` units from `current` to `target`.
///
/// `stock` is the product's current stock, or `None` if the product was
/// deleted.
///
/// # Errors
///
/// Returns [`InventoryError::Insufficient`] when a decrement would take
/// limited stock below zero. Stock is never clamped.
pub fn plan_status_change(
    current: OrderStatus,
    target: OrderStatus,
    quantity: u32,
    stock: Option<Stock>,
) -> Result<StatusChange, InventoryError> {
    let mut inventory = InventoryEffect::Unchanged;

    for effect in effects_for(current, target) {
        match effect {
            StatusEffect::DecrementStock => {
                inventory = match stock {
                    None => InventoryEffect::Orphaned,
                    Some(Stock::Unlimited) => InventoryEffect::Exempt,
                    Some(Stock::Limited(available)) => {
                        let after = available.checked_sub(quantity).ok_or(
                            InventoryError::Insufficient {
                                available,
                                requested: quantity,
                            },
                        )?;
                        InventoryEffect::Decremented {
                            before: available,
                            after,
                        }
                    }
                };
            }
        }
    }

    Ok(StatusChange {
        from: current,
        to: target,
        inventory,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_decrements_once() {
        let change = plan_status_change(
            OrderStatus::Pending,
            OrderStatus::Delivered,
            3,
            Some(Stock::Limited(10)),
        )
        .unwrap();
        assert_eq!(
            change.inventory,
            InventoryEffect::Decremented {
                before: 10,
                after: 7
            }
        );

        // re-applying delivered against the stored status is a no-op
        let again = plan_status_change(
            OrderStatus::Delivered,
            OrderStatus::Delivered,
            3,
            Some(Stock::Limited(7)),
        )
        .unwrap();
        assert_eq!(again.inventory, InventoryEffect::Unchanged);
        assert!(again.is_noop());
    }

    #[test]
    fn test_insufficient_stock() {
        let err = plan_status_change(
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            5,
            Some(Stock::Limited(2)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            InventoryError::Insufficient {
                available: 2,
                requested: 5
            }
        );
    }

    #[test]
    fn test_exact_stock_reaches_zero() {
        let change = plan_status_change(
            OrderStatus::Confirmed,
            OrderStatus::Delivered,
            4,
            Some(Stock::Limited(4)),
        )
        .unwrap();
        assert_eq!(
            change.inventory,
            InventoryEffect::Decremented {
                before: 4,
                after: 0
            }
        );
    }

    #[test]
    fn test_unlimited_stock_exempt() {
        for quantity in [1, 50, u32::MAX] {
            let change = plan_status_change(
                OrderStatus::Pending,
                OrderStatus::Delivered,
                quantity,
                Some(Stock::Unlimited),
            )
            .unwrap();
            assert_eq!(change.inventory, InventoryEffect::Exempt);
        }
    }

    #[test]
    fn test_deleted_product_is_orphaned() {
        let change =
            plan_status_change(OrderStatus::Pending, OrderStatus::Delivered, 1, None).unwrap();
        assert_eq!(change.inventory, InventoryEffect::Orphaned);
    }

    #[test]
    fn test_other_transitions_have_no_effect() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                if to == OrderStatus::Delivered && from != OrderStatus::Delivered {
                    continue;
                }
                let change = plan_status_change(from, to, 100, Some(Stock::Limited(1))).unwrap();
                assert_eq!(change.inventory, InventoryEffect::Unchanged, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_redelivery_after_return_decrements_again() {
        let change = plan_status_change(
            OrderStatus::Returned,
            OrderStatus::Delivered,
            1,
            Some(Stock::Limited(3)),
        )
        .unwrap();
        assert_eq!(
            change.inventory,
            InventoryEffect::Decremented {
                before: 3,
                after: 2
            }
        );
    }
}
