//! Duplicate-order guard.
//!
//! Rejects a second order for the same product from the same requester
//! fingerprint inside a rolling window. This is an abuse deterrent, not a
//! uniqueness guarantee: the check and the insert are separate store calls,
//! so two concurrent submissions can both pass.

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::{ProductId, RequesterFingerprint};

/// Default window length.
pub const DEFAULT_WINDOW_HOURS: u32 = 6;

/// Longest window a deployment may configure: one year.
pub const MAX_WINDOW_HOURS: u32 = 24 * 365;

/// The slice of an existing order the guard looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentOrder {
    pub product_id: ProductId,
    pub fingerprint: RequesterFingerprint,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateGuard {
    window: TimeDelta,
}

impl Default for DuplicateGuard {
    fn default() -> Self {
        Self::from_hours(DEFAULT_WINDOW_HOURS)
    }
}

impl DuplicateGuard {
    #[must_use]
    pub const fn new(window: TimeDelta) -> Self {
        Self { window }
    }

    #[must_use]
    pub fn from_hours(hours: u32) -> Self {
        Self::new(TimeDelta::hours(i64::from(hours)))
    }

    #[must_use]
    pub const fn window(&self) -> TimeDelta {
        self.window
    }

    /// Oldest creation time still inside the window.
    ///
    /// A window reaching past the earliest representable time covers all of
    /// history.
    #[must_use]
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether `recent` holds an order for the same product and fingerprint
    /// created at or after `now - window`.
    #[must_use]
    pub fn is_duplicate(
        &self,
        product_id: ProductId,
        fingerprint: &RequesterFingerprint,
        recent: &[RecentOrder],
        now: DateTime<Utc>,
    ) -> bool {
        let since = self.since(now);
        recent.iter().any(|order| {
            order.product_id == product_id
                && &order.fingerprint == fingerprint
                && order.created_at >= since
        })
    }
}

/// Free-function form of [`DuplicateGuard::is_duplicate`].
#[must_use]
pub fn is_duplicate(
    product_id: ProductId,
    fingerprint: &RequesterFingerprint,
    recent: &[RecentOrder],
    window_hours: u32,
    now: DateTime<Utc>,
) -> bool {
    DuplicateGuard::from_hours(window_hours).is_duplicate(product_id, fingerprint, recent, now)
}
