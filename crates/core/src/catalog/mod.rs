//! Catalog model: products, product types, shipping zones and reviews.

pub mod product;
pub mod product_type;
pub mod review;
pub mod shipping;

pub use product::{
    CustomOptionGroup, DEFAULT_OFFER_NAME, DescriptionBlock, OptionValue, Product, ProductDraft,
    ProductDraftError, ProductOptions, QuantityOffer, Stock,
};
pub use product_type::{DeletionCheck, ProductType, ProductTypeDraft, ProductTypeSummary};
pub use review::{RatingSummary, Review, ReviewDraft};
pub use shipping::{ShippingZone, ShippingZoneDraft, ShippingZoneDraftError};
