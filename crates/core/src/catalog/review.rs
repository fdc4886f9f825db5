//! Customer reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub reviewer_name: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A review submitted by a shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub reviewer_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ReviewDraft {
    /// # Errors
    ///
    /// Returns a message for a blank name or an out-of-range rating.
    pub fn validate(&self) -> Result<(), String> {
        if self.reviewer_name.trim().is_empty() {
            return Err("reviewer name cannot be empty".to_owned());
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            ));
        }
        Ok(())
    }
}

/// Average rating shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    /// Average of all ratings; zero when there are no reviews.
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let count = reviews.len();
        if count == 0 {
            return Self {
                average: 0.0,
                count,
            };
        }
        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(sum) / count as f64;
        Self { average, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8) -> Review {
        Review {
            id: ReviewId::generate(),
            product_id: ProductId::generate(),
            reviewer_name: "Amine".to_owned(),
            rating,
            comment: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_averages() {
        let summary = RatingSummary::from_reviews(&[review(5), review(4), review(3)]);
        assert_eq!(summary.count, 3);
        assert!((summary.average - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_empty_is_zero() {
        let summary = RatingSummary::from_reviews(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.average.abs() < f64::EPSILON);
    }

    #[test]
    fn test_draft_rating_bounds() {
        let mut draft = ReviewDraft {
            reviewer_name: "Sara".to_owned(),
            rating: 0,
            comment: None,
        };
        assert!(draft.validate().is_err());
        draft.rating = 5;
        assert!(draft.validate().is_ok());
        draft.rating = 6;
        assert!(draft.validate().is_err());
    }
}
