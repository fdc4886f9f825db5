//! Store settings and the shared settings context.
//!
//! Settings are a single stored record. Binaries load it once at startup
//! into a [`SettingsContext`], hand clones of the context to whatever needs
//! branding or integration values, and replace its contents on an explicit
//! refresh.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
}

/// Storefront colour scheme, stored as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub background_main: String,
    pub background_dark: String,
    pub primary_gradient_start: String,
    pub primary_gradient_end: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            background_main: "#f7f7f7".to_owned(),
            background_dark: "#121212".to_owned(),
            primary_gradient_start: "#8A2BE2".to_owned(),
            primary_gradient_end: "#4682B4".to_owned(),
        }
    }
}

impl ThemeSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("backgroundMain", &self.background_main),
            ("backgroundDark", &self.background_dark),
            ("primaryGradientStart", &self.primary_gradient_start),
            ("primaryGradientEnd", &self.primary_gradient_end),
        ] {
            if !is_hex_color(value) {
                return Err(SettingsError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`.
fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
    })
}

/// The store's branding and integration configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub store_name: String,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub hero_images: Vec<String>,
    #[serde(default)]
    pub social_media: SocialLinks,
    pub phone_number: Option<String>,
    pub facebook_pixel_id: Option<String>,
    /// Spreadsheet webhook that receives new orders.
    pub google_sheet_api_url: Option<String>,
    pub telegram_chat_id: Option<String>,
    #[serde(default)]
    pub theme: ThemeSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: "Souq".to_owned(),
            logo_url: None,
            hero_images: Vec::new(),
            social_media: SocialLinks::default(),
            phone_number: None,
            facebook_pixel_id: None,
            google_sheet_api_url: None,
            telegram_chat_id: None,
            theme: ThemeSettings::default(),
        }
    }
}

/// The subset of settings safe to show shoppers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicStoreSettings {
    pub store_name: String,
    pub logo_url: Option<String>,
    pub hero_images: Vec<String>,
    pub social_media: SocialLinks,
    pub phone_number: Option<String>,
    pub facebook_pixel_id: Option<String>,
    pub theme: ThemeSettings,
}

impl From<StoreSettings> for PublicStoreSettings {
    fn from(settings: StoreSettings) -> Self {
        Self {
            store_name: settings.store_name,
            logo_url: settings.logo_url,
            hero_images: settings.hero_images,
            social_media: settings.social_media,
            phone_number: settings.phone_number,
            facebook_pixel_id: settings.facebook_pixel_id,
            theme: settings.theme,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("store name cannot be empty")]
    EmptyStoreName,
    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },
    #[error("{field} must be an http or https URL")]
    UnsupportedScheme { field: &'static str },
    #[error("{field} is not a hex colour: {value}")]
    InvalidColor { field: &'static str, value: String },
}

fn check_url(field: &'static str, value: &str) -> Result<(), SettingsError> {
    let url = Url::parse(value).map_err(|source| SettingsError::InvalidUrl { field, source })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(SettingsError::UnsupportedScheme { field }),
    }
}

/// Blank strings clear an optional field.
fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Partial update sent by the merchant. Absent fields are left alone; an
/// empty string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettingsPatch {
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub hero_images: Option<Vec<String>>,
    #[serde(default)]
    pub social_media: Option<SocialLinks>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub facebook_pixel_id: Option<String>,
    #[serde(default)]
    pub google_sheet_api_url: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default)]
    pub theme: Option<ThemeSettings>,
}

impl StoreSettingsPatch {
    /// Apply the patch to a copy of `current`.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank store name, a malformed URL or a
    /// malformed colour. `current` is untouched on error.
    pub fn apply(self, current: &StoreSettings) -> Result<StoreSettings, SettingsError> {
        let mut next = current.clone();

        if let Some(name) = self.store_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(SettingsError::EmptyStoreName);
            }
            name.clone_into(&mut next.store_name);
        }
        if let Some(logo) = self.logo_url {
            next.logo_url = optional(logo);
            if let Some(url) = &next.logo_url {
                check_url("logo_url", url)?;
            }
        }
        if let Some(images) = self.hero_images {
            let images: Vec<String> = images.into_iter().filter_map(optional).collect();
            for image in &images {
                check_url("hero_images", image)?;
            }
            next.hero_images = images;
        }
        if let Some(social) = self.social_media {
            let links = SocialLinks {
                facebook: social.facebook.and_then(optional),
                instagram: social.instagram.and_then(optional),
                telegram: social.telegram.and_then(optional),
            };
            for (field, link) in [
                ("social_media.facebook", &links.facebook),
                ("social_media.instagram", &links.instagram),
                ("social_media.telegram", &links.telegram),
            ] {
                if let Some(link) = link {
                    check_url(field, link)?;
                }
            }
            next.social_media = links;
        }
        if let Some(phone) = self.phone_number {
            next.phone_number = optional(phone);
        }
        if let Some(pixel) = self.facebook_pixel_id {
            next.facebook_pixel_id = optional(pixel);
        }
        if let Some(webhook) = self.google_sheet_api_url {
            next.google_sheet_api_url = optional(webhook);
            if let Some(url) = &next.google_sheet_api_url {
                check_url("google_sheet_api_url", url)?;
            }
        }
        if let Some(chat) = self.telegram_chat_id {
            next.telegram_chat_id = optional(chat);
        }
        if let Some(theme) = self.theme {
            theme.validate()?;
            next.theme = theme;
        }

        Ok(next)
    }
}

/// Shared, explicitly passed holder of the current settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsContext {
    inner: Arc<RwLock<StoreSettings>>,
}

impl SettingsContext {
    #[must_use]
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// A copy of the current settings.
    #[must_use]
    pub fn snapshot(&self) -> StoreSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in freshly loaded settings.
    pub fn replace(&self, settings: StoreSettings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }
}
