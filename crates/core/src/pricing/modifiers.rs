//! Option modifier resolution.
//!
//! A product's option dimensions are flattened into a [`ModifierTable`] once
//! per product load. Resolving a unit price is then a lookup per selected
//! dimension; names that are not in the table contribute nothing and are
//! reported back as [`UnmatchedOption`]s so callers can log them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::total::PricingError;
use crate::catalog::{OptionValue, ProductOptions};
use crate::types::Price;

/// The dimension an option value belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "group", rename_all = "snake_case")]
pub enum OptionDimension {
    Size,
    Color,
    Custom(String),
}

impl fmt::Display for OptionDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size => f.write_str("size"),
            Self::Color => f.write_str("color"),
            Self::Custom(group) => write!(f, "custom:{group}"),
        }
    }
}

/// What the shopper picked, one value per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelections {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Custom group name to selected value.
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

impl OptionSelections {
    /// Selected size, ignoring blank input.
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        non_blank(self.size.as_deref())
    }

    /// Selected colour, ignoring blank input.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        non_blank(self.color.as_deref())
    }

    /// Selected value for a custom group, ignoring blank input.
    #[must_use]
    pub fn custom(&self, group: &str) -> Option<&str> {
        non_blank(self.custom.get(group).map(String::as_str))
    }

    fn selected(&self) -> impl Iterator<Item = (OptionDimension, &str)> {
        let size = self.size().map(|v| (OptionDimension::Size, v));
        let color = self.color().map(|v| (OptionDimension::Color, v));
        let custom = self.custom.iter().filter_map(|(group, value)| {
            non_blank(Some(value.as_str())).map(|v| (OptionDimension::Custom(group.clone()), v))
        });
        size.into_iter().chain(color).chain(custom)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A selected name with no configured modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedOption {
    pub dimension: OptionDimension,
    pub value: String,
}

/// Name-to-modifier lookup for every dimension of a product.
///
/// When a dimension lists the same name twice, the first definition wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierTable {
    sizes: HashMap<String, Price>,
    colors: HashMap<String, Price>,
    custom: HashMap<String, HashMap<String, Price>>,
}

impl ModifierTable {
    /// Build the table from a product's configured options.
    #[must_use]
    pub fn from_options(options: &ProductOptions) -> Self {
        let collect = |values: &[OptionValue]| {
            let mut map = HashMap::with_capacity(values.len());
            for value in values {
                map.entry(value.name.trim().to_owned())
                    .or_insert(value.price_modifier);
            }
            map
        };

        let mut custom: HashMap<String, HashMap<String, Price>> = HashMap::new();
        for group in &options.custom_options {
            let values = collect(&group.values);
            custom
                .entry(group.option_name.trim().to_owned())
                .or_insert(values);
        }

        Self {
            sizes: collect(&options.sizes),
            colors: collect(&options.colors),
            custom,
        }
    }

    /// Modifier for `name` in `dimension`, if configured.
    #[must_use]
    pub fn modifier(&self, dimension: &OptionDimension, name: &str) -> Option<Price> {
        let values = match dimension {
            OptionDimension::Size => &self.sizes,
            OptionDimension::Color => &self.colors,
            OptionDimension::Custom(group) => self.custom.get(group.trim())?,
        };
        values.get(name.trim()).copied()
    }
}

/// Result of resolving a unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPrice {
    pub amount: Price,
    pub unmatched: Vec<UnmatchedOption>,
}

/// Base price plus the modifier of every selected option.
///
/// Each selected dimension contributes its modifier once. Selected names that
/// are not configured contribute zero and are listed in
/// [`UnitPrice::unmatched`]. Dimensions without a selection are skipped;
/// requiring a selection is the caller's job.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the modifiers cannot be summed.
pub fn resolve_unit_price(
    base_price: Price,
    selections: &OptionSelections,
    table: &ModifierTable,
) -> Result<UnitPrice, PricingError> {
    let mut amount = base_price;
    let mut unmatched = Vec::new();

    for (dimension, value) in selections.selected() {
        match table.modifier(&dimension, value) {
            Some(modifier) => {
                amount = amount
                    .checked_add(modifier)
                    .ok_or(PricingError::Overflow)?;
            }
            None => unmatched.push(UnmatchedOption {
                dimension,
                value: value.to_owned(),
            }),
        }
    }

    Ok(UnitPrice { amount, unmatched })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::CustomOptionGroup;

    fn options() -> ProductOptions {
        ProductOptions {
            sizes: vec![
                OptionValue::new("M", Price::ZERO),
                OptionValue::new("L", Price::from_whole(200)),
                OptionValue::new("L", Price::from_whole(999)),
            ],
            colors: vec![OptionValue::new("Red", Price::from_whole(-50))],
            custom_options: vec![CustomOptionGroup {
                option_name: "material".to_owned(),
                values: vec![OptionValue::new("silk", Price::from_whole(300))],
            }],
        }
    }

    #[test]
    fn test_modifiers_are_additive() {
        let table = ModifierTable::from_options(&options());
        let selections = OptionSelections {
            size: Some("L".to_owned()),
            color: Some("Red".to_owned()),
            custom: BTreeMap::new(),
        };
        let unit = resolve_unit_price(Price::from_whole(1000), &selections, &table).unwrap();
        assert_eq!(unit.amount, Price::from_whole(1150));
        assert!(unit.unmatched.is_empty());
    }

    #[test]
    fn test_first_definition_wins() {
        let table = ModifierTable::from_options(&options());
        assert_eq!(
            table.modifier(&OptionDimension::Size, "L"),
            Some(Price::from_whole(200))
        );
    }

    #[test]
    fn test_custom_groups_apply() {
        let table = ModifierTable::from_options(&options());
        let selections = OptionSelections {
            custom: BTreeMap::from([("material".to_owned(), "silk".to_owned())]),
            ..OptionSelections::default()
        };
        let unit = resolve_unit_price(Price::from_whole(1000), &selections, &table).unwrap();
        assert_eq!(unit.amount, Price::from_whole(1300));
    }

    #[test]
    fn test_unknown_names_are_neutral_and_reported() {
        let table = ModifierTable::from_options(&options());
        let selections = OptionSelections {
            size: Some("XXL".to_owned()),
            color: Some("Red".to_owned()),
            custom: BTreeMap::from([("finish".to_owned(), "matte".to_owned())]),
        };
        let unit = resolve_unit_price(Price::from_whole(1000), &selections, &table).unwrap();
        assert_eq!(unit.amount, Price::from_whole(950));
        assert_eq!(
            unit.unmatched,
            vec![
                UnmatchedOption {
                    dimension: OptionDimension::Size,
                    value: "XXL".to_owned(),
                },
                UnmatchedOption {
                    dimension: OptionDimension::Custom("finish".to_owned()),
                    value: "matte".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_blank_selection_is_no_selection() {
        let table = ModifierTable::from_options(&options());
        let selections = OptionSelections {
            size: Some("  ".to_owned()),
            ..OptionSelections::default()
        };
        let unit = resolve_unit_price(Price::from_whole(1000), &selections, &table).unwrap();
        assert_eq!(unit.amount, Price::from_whole(1000));
        assert!(unit.unmatched.is_empty());
    }

    #[test]
    fn test_unrepresentable_modifier_sum_is_an_error() {
        let options = ProductOptions {
            sizes: vec![OptionValue::new("XXL", Price::new(rust_decimal::Decimal::MAX))],
            ..ProductOptions::default()
        };
        let table = ModifierTable::from_options(&options);
        let selections = OptionSelections {
            size: Some("XXL".to_owned()),
            ..OptionSelections::default()
        };
        assert_eq!(
            resolve_unit_price(Price::from_whole(1000), &selections, &table),
            Err(PricingError::Overflow)
        );
    }
}
