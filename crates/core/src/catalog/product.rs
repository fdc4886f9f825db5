//! Products, their option dimensions and quantity offers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Price, ProductId, ProductTypeId};

/// Offer name used when a stored offer has none.
pub const DEFAULT_OFFER_NAME: &str = "قطع";

/// One selectable value of an option dimension, e.g. size `L` for +200 DA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValue {
    pub name: String,
    /// Signed adjustment added once to the base price when selected.
    #[serde(default)]
    pub price_modifier: Price,
}

impl OptionValue {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, price_modifier: Price) -> Self {
        Self {
            name: name.into(),
            price_modifier,
        }
    }
}

/// A merchant-defined extra dimension such as "material".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOptionGroup {
    pub option_name: String,
    #[serde(default)]
    pub values: Vec<OptionValue>,
}

/// All option dimensions configured on a product.
///
/// Stored as a JSON document, so field names follow the storage format
/// (`sizes`, `colors`, `customOptions`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptions {
    #[serde(default)]
    pub sizes: Vec<OptionValue>,
    #[serde(default)]
    pub colors: Vec<OptionValue>,
    #[serde(default)]
    pub custom_options: Vec<CustomOptionGroup>,
}

impl ProductOptions {
    /// Whether a size must be chosen at checkout.
    #[must_use]
    pub fn requires_size(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Whether a colour must be chosen at checkout.
    #[must_use]
    pub fn requires_color(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Custom groups that have at least one value and therefore need a choice.
    pub fn required_custom_groups(&self) -> impl Iterator<Item = &CustomOptionGroup> {
        self.custom_options
            .iter()
            .filter(|group| !group.values.is_empty())
    }

    /// Whether the product has no option dimensions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty() && self.colors.is_empty() && self.custom_options.is_empty()
    }
}

/// "Buy `quantity` units for a flat `price`."
///
/// `price` is the total for exactly `quantity` units, not a per-unit price.
///
/// Decoding is lenient because offers were historically written by several
/// clients: `quantity` and `price` may be numbers or numeric strings, missing
/// values become zero and a missing name becomes [`DEFAULT_OFFER_NAME`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityOffer {
    pub quantity: u32,
    pub price: Price,
    pub name: String,
}

impl QuantityOffer {
    /// Create an offer with the default name.
    #[must_use]
    pub fn new(quantity: u32, price: Price) -> Self {
        Self {
            quantity,
            price,
            name: DEFAULT_OFFER_NAME.to_owned(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientCount {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
struct RawOffer {
    #[serde(default)]
    quantity: Option<LenientCount>,
    #[serde(default)]
    price: Option<Price>,
    #[serde(default)]
    name: Option<String>,
}

impl<'de> Deserialize<'de> for QuantityOffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let raw = RawOffer::deserialize(deserializer)?;
        let quantity = match raw.quantity {
            None => 0,
            Some(LenientCount::Number(n)) => u32::try_from(n).map_err(D::Error::custom)?,
            Some(LenientCount::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    0
                } else {
                    text.parse::<u32>().map_err(D::Error::custom)?
                }
            }
        };
        let name = raw
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_OFFER_NAME.to_owned());

        Ok(Self {
            quantity,
            price: raw.price.unwrap_or(Price::ZERO),
            name,
        })
    }
}

/// Stock level of a product.
///
/// Stored as a nullable `max_quantity` column: `NULL` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Stock {
    Limited(u32),
    Unlimited,
}

impl Stock {
    /// The stored representation.
    #[must_use]
    pub const fn max_quantity(self) -> Option<u32> {
        match self {
            Self::Limited(n) => Some(n),
            Self::Unlimited => None,
        }
    }

    /// Whether `quantity` units can currently be sold.
    #[must_use]
    pub const fn covers(self, quantity: u32) -> bool {
        match self {
            Self::Limited(n) => quantity <= n,
            Self::Unlimited => true,
        }
    }
}

impl From<Option<u32>> for Stock {
    fn from(max_quantity: Option<u32>) -> Self {
        max_quantity.map_or(Self::Unlimited, Self::Limited)
    }
}

impl From<Stock> for Option<u32> {
    fn from(stock: Stock) -> Self {
        stock.max_quantity()
    }
}

/// A block of rich product description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum DescriptionBlock {
    Text(String),
    Image(String),
}

/// A product as sold in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub product_type_id: ProductTypeId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub description_content: Vec<DescriptionBlock>,
    pub base_price: Price,
    /// Optional strike-through price. Only meaningful when above `base_price`.
    pub price_before_discount: Option<Price>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub options: ProductOptions,
    #[serde(default)]
    pub quantity_offers: Vec<QuantityOffer>,
    pub min_quantity: u32,
    #[serde(rename = "max_quantity")]
    pub stock: Stock,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The strike-through reference price, if it actually shows a discount.
    #[must_use]
    pub fn discount_reference(&self) -> Option<Price> {
        self.price_before_discount
            .filter(|reference| *reference > self.base_price)
    }

    /// First image, used for cards and notifications.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Reasons a merchant's product input is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductDraftError {
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("{field} cannot be negative")]
    NegativePrice { field: &'static str },
    #[error("{field} cannot exceed {max}", max = Price::MAX_STORED)]
    PriceTooLarge { field: &'static str },
    #[error("minimum quantity must be at least 1")]
    MinQuantityTooLow,
    #[error("maximum quantity ({max}) must be at least the minimum quantity ({min})")]
    MaxBelowMin { min: u32, max: u32 },
    #[error("quantity offer #{index} must cover at least one unit")]
    EmptyOffer { index: usize },
    #[error("quantity offer #{index} has a negative price")]
    NegativeOfferPrice { index: usize },
    #[error("quantity offer #{index} costs more than {max}", max = Price::MAX_STORED)]
    OfferPriceTooLarge { index: usize },
    #[error("option names cannot be empty")]
    EmptyOptionName,
}

const fn default_min_quantity() -> u32 {
    1
}

/// Merchant input for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub product_type_id: ProductTypeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_content: Vec<DescriptionBlock>,
    pub base_price: Price,
    #[serde(default)]
    pub price_before_discount: Option<Price>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub options: ProductOptions,
    #[serde(default)]
    pub quantity_offers: Vec<QuantityOffer>,
    #[serde(default = "default_min_quantity")]
    pub min_quantity: u32,
    #[serde(default)]
    pub max_quantity: Option<u32>,
}

impl ProductDraft {
    /// Check the draft against catalog invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ProductDraftError> {
        if self.name.trim().is_empty() {
            return Err(ProductDraftError::EmptyName);
        }
        if self.base_price.is_negative() {
            return Err(ProductDraftError::NegativePrice {
                field: "base_price",
            });
        }
        if self.price_before_discount.is_some_and(|p| p.is_negative()) {
            return Err(ProductDraftError::NegativePrice {
                field: "price_before_discount",
            });
        }
        if self.base_price.exceeds_storage() {
            return Err(ProductDraftError::PriceTooLarge {
                field: "base_price",
            });
        }
        if self.price_before_discount.is_some_and(|p| p.exceeds_storage()) {
            return Err(ProductDraftError::PriceTooLarge {
                field: "price_before_discount",
            });
        }
        if self.min_quantity < 1 {
            return Err(ProductDraftError::MinQuantityTooLow);
        }
        if let Some(max) = self.max_quantity
            && max < self.min_quantity
        {
            return Err(ProductDraftError::MaxBelowMin {
                min: self.min_quantity,
                max,
            });
        }
        for (index, offer) in self.quantity_offers.iter().enumerate() {
            if offer.quantity == 0 {
                return Err(ProductDraftError::EmptyOffer { index });
            }
            if offer.price.is_negative() {
                return Err(ProductDraftError::NegativeOfferPrice { index });
            }
            if offer.price.exceeds_storage() {
                return Err(ProductDraftError::OfferPriceTooLarge { index });
            }
        }

        let blank = |value: &OptionValue| value.name.trim().is_empty();
        let options = &self.options;
        if options.sizes.iter().any(blank)
            || options.colors.iter().any(blank)
            || options
                .custom_options
                .iter()
                .any(|group| group.option_name.trim().is_empty() || group.values.iter().any(blank))
        {
            return Err(ProductDraftError::EmptyOptionName);
        }

        let oversized = |value: &OptionValue| value.price_modifier.exceeds_storage();
        if options.sizes.iter().any(oversized)
            || options.colors.iter().any(oversized)
            || options
                .custom_options
                .iter()
                .any(|group| group.values.iter().any(oversized))
        {
            return Err(ProductDraftError::PriceTooLarge {
                field: "price_modifier",
            });
        }

        Ok(())
    }

    /// Stock level described by this draft.
    #[must_use]
    pub fn stock(&self) -> Stock {
        Stock::from(self.max_quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn draft() -> ProductDraft {
        ProductDraft {
            product_type_id: ProductTypeId::generate(),
            name: "Abaya".to_owned(),
            description: None,
            description_content: Vec::new(),
            base_price: Price::from_whole(1000),
            price_before_discount: None,
            images: Vec::new(),
            options: ProductOptions::default(),
            quantity_offers: vec![QuantityOffer::new(2, Price::from_whole(1800))],
            min_quantity: 1,
            max_quantity: Some(10),
        }
    }

    #[test]
    fn test_offer_decodes_strings_and_defaults_name() {
        let offer: QuantityOffer =
            serde_json::from_str(r#"{"quantity": "3", "price": "2500"}"#).unwrap();
        assert_eq!(offer.quantity, 3);
        assert_eq!(offer.price, Price::from_whole(2500));
        assert_eq!(offer.name, DEFAULT_OFFER_NAME);
    }

    #[test]
    fn test_offer_missing_fields_become_zero() {
        let offer: QuantityOffer = serde_json::from_str(r#"{"name": "pack"}"#).unwrap();
        assert_eq!(offer.quantity, 0);
        assert_eq!(offer.price, Price::ZERO);
        assert_eq!(offer.name, "pack");
    }

    #[test]
    fn test_offer_rejects_garbage_quantity() {
        assert!(serde_json::from_str::<QuantityOffer>(r#"{"quantity": "two"}"#).is_err());
    }

    #[test]
    fn test_options_storage_format() {
        let json = r#"{
            "sizes": [{"name": "L", "priceModifier": 200}],
            "customOptions": [{"optionName": "material", "values": [{"name": "silk", "priceModifier": "350"}]}]
        }"#;
        let options: ProductOptions = serde_json::from_str(json).unwrap();
        assert!(options.requires_size());
        assert!(!options.requires_color());
        assert_eq!(options.required_custom_groups().count(), 1);
        assert_eq!(
            options.custom_options[0].values[0].price_modifier,
            Price::from_whole(350)
        );
    }

    #[test]
    fn test_stock_serializes_as_nullable_count() {
        assert_eq!(serde_json::to_string(&Stock::Unlimited).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Stock::Limited(4)).unwrap(), "4");
        assert_eq!(serde_json::from_str::<Stock>("7").unwrap(), Stock::Limited(7));
        assert!(Stock::Unlimited.covers(u32::MAX));
        assert!(!Stock::Limited(2).covers(3));
    }

    #[test]
    fn test_description_blocks() {
        let blocks: Vec<DescriptionBlock> = serde_json::from_str(
            r#"[{"type": "text", "content": "hello"}, {"type": "image", "content": "a.png"}]"#,
        )
        .unwrap();
        assert_eq!(blocks[1], DescriptionBlock::Image("a.png".to_owned()));
    }

    #[test]
    fn test_draft_valid() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_draft_max_below_min() {
        let mut d = draft();
        d.min_quantity = 3;
        d.max_quantity = Some(2);
        assert_eq!(
            d.validate(),
            Err(ProductDraftError::MaxBelowMin { min: 3, max: 2 })
        );
    }

    #[test]
    fn test_draft_rejects_zero_min_and_empty_offer() {
        let mut d = draft();
        d.min_quantity = 0;
        assert_eq!(d.validate(), Err(ProductDraftError::MinQuantityTooLow));

        let mut d = draft();
        d.quantity_offers.push(QuantityOffer::new(0, Price::from_whole(5)));
        assert_eq!(d.validate(), Err(ProductDraftError::EmptyOffer { index: 1 }));
    }

    #[test]
    fn test_draft_rejects_unstorable_prices() {
        let over = Price::MAX_STORED.checked_add(Price::new(Decimal::new(1, 2))).unwrap();

        let mut d = draft();
        d.base_price = over;
        assert_eq!(
            d.validate(),
            Err(ProductDraftError::PriceTooLarge {
                field: "base_price"
            })
        );

        let mut d = draft();
        d.price_before_discount = Some(over);
        assert_eq!(
            d.validate(),
            Err(ProductDraftError::PriceTooLarge {
                field: "price_before_discount"
            })
        );

        let mut d = draft();
        d.quantity_offers.push(QuantityOffer::new(
            5,
            Price::new(Decimal::from_scientific("1e25").unwrap()),
        ));
        assert_eq!(
            d.validate(),
            Err(ProductDraftError::OfferPriceTooLarge { index: 1 })
        );

        let mut d = draft();
        d.options.custom_options.push(CustomOptionGroup {
            option_name: "Broderie".to_owned(),
            values: vec![OptionValue::new("Or massif", Price::ZERO - over)],
        });
        assert_eq!(
            d.validate(),
            Err(ProductDraftError::PriceTooLarge {
                field: "price_modifier"
            })
        );

        let mut d = draft();
        d.base_price = Price::MAX_STORED;
        d.quantity_offers = vec![QuantityOffer::new(2, Price::MAX_STORED)];
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_blank_option() {
        let mut d = draft();
        d.options.colors.push(OptionValue::new(" ", Price::ZERO));
        assert_eq!(d.validate(), Err(ProductDraftError::EmptyOptionName));
    }

    #[test]
    fn test_discount_reference_only_when_higher() {
        let d = draft();
        let now = Utc::now();
        let mut product = Product {
            id: ProductId::generate(),
            product_type_id: d.product_type_id,
            name: d.name,
            description: None,
            description_content: Vec::new(),
            base_price: Price::from_whole(1000),
            price_before_discount: Some(Price::from_whole(1000)),
            images: Vec::new(),
            options: ProductOptions::default(),
            quantity_offers: Vec::new(),
            min_quantity: 1,
            stock: Stock::Unlimited,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.discount_reference(), None);
        product.price_before_discount = Some(Price::from_whole(1500));
        assert_eq!(product.discount_reference(), Some(Price::from_whole(1500)));
    }
}
