//! Product types (catalog categories).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProductTypeId;

/// A catalog category grouping products on the storefront home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product type together with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTypeSummary {
    #[serde(flatten)]
    pub product_type: ProductType,
    pub product_count: i64,
}

/// Merchant input for creating or renaming a product type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTypeDraft {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductTypeDraft {
    /// # Errors
    ///
    /// Returns a message when the name is blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product type name cannot be empty".to_owned());
        }
        Ok(())
    }
}

/// Outcome of asking to delete a product type.
///
/// Deleting a type cascades to its products, so a non-empty type needs an
/// explicit confirmation from the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionCheck {
    Proceed,
    NeedsConfirmation { product_count: i64 },
}

impl DeletionCheck {
    #[must_use]
    pub const fn evaluate(product_count: i64, confirmed: bool) -> Self {
        if product_count > 0 && !confirmed {
            Self::NeedsConfirmation { product_count }
        } else {
            Self::Proceed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletion_needs_confirmation_only_when_products_exist() {
        assert_eq!(DeletionCheck::evaluate(0, false), DeletionCheck::Proceed);
        assert_eq!(
            DeletionCheck::evaluate(3, false),
            DeletionCheck::NeedsConfirmation { product_count: 3 }
        );
        assert_eq!(DeletionCheck::evaluate(3, true), DeletionCheck::Proceed);
    }

    #[test]
    fn test_blank_name_rejected() {
        let draft = ProductTypeDraft {
            name: "  ".to_owned(),
            image_url: None,
        };
        assert!(draft.validate().is_err());
    }
}
