//! Merchant order list filters.

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderStatus, ProductId, ProductTypeId};

/// Relative creation-date window.
///
/// Week-based ranges are multiples of seven days; month and year ranges are
/// calendar months back from now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    #[default]
    All,
    #[serde(rename = "last24hours")]
    Last24Hours,
    LastWeek,
    Last2Weeks,
    Last3Weeks,
    LastMonth,
    Last3Months,
    Last6Months,
    LastYear,
}

impl DateRange {
    /// Earliest creation time included, or `None` for no lower bound.
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = |n| now.checked_sub_months(Months::new(n));
        match self {
            Self::All => None,
            Self::Last24Hours => Some(now - TimeDelta::hours(24)),
            Self::LastWeek => Some(now - TimeDelta::weeks(1)),
            Self::Last2Weeks => Some(now - TimeDelta::weeks(2)),
            Self::Last3Weeks => Some(now - TimeDelta::weeks(3)),
            Self::LastMonth => months(1),
            Self::Last3Months => months(3),
            Self::Last6Months => months(6),
            Self::LastYear => months(12),
        }
    }
}

/// Query-string filters for the merchant order list. Empty fields match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_type_id: Option<ProductTypeId>,
    #[serde(default)]
    pub wilaya: Option<String>,
    #[serde(default)]
    pub range: DateRange,
}

impl OrderFilter {
    /// Wilaya filter with blank input treated as absent.
    #[must_use]
    pub fn wilaya(&self) -> Option<&str> {
        self.wilaya.as_deref().map(str::trim).filter(|w| !w.is_empty())
    }
}
