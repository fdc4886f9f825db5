//! Seed shipping zones from a YAML file.
//!
//! The file is a list of zones:
//!
//! ```yaml
//! - wilaya: Alger
//!   office_price: 400
//!   home_price: 600
//!   communes: [Bab Ezzouar, Hydra, Kouba]
//! - wilaya: Oran
//!   office_price: 500
//!   home_price: 800
//! ```
//!
//! Existing zones with the same wilaya are replaced.

use tracing::{error, info};

use souq_admin::db::{self, ShippingRepository};
use souq_core::catalog::ShippingZoneDraft;

use super::{CommandError, database_url, read_file};

/// Parse and normalise every zone in `content`.
///
/// All zones are checked before any is written.
pub fn parse_zones(path: &str, content: &str) -> Result<Vec<ShippingZoneDraft>, CommandError> {
    let drafts: Vec<ShippingZoneDraft> =
        serde_yaml::from_str(content).map_err(|e| CommandError::Parse {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;

    let mut zones = Vec::with_capacity(drafts.len());
    let mut problems = Vec::new();
    for (index, draft) in drafts.into_iter().enumerate() {
        match draft.normalize() {
            Ok(zone) if zones.iter().any(|z: &ShippingZoneDraft| z.wilaya == zone.wilaya) => {
                problems.push(format!("zone #{index}: wilaya {} listed twice", zone.wilaya));
            }
            Ok(zone) => zones.push(zone),
            Err(e) => problems.push(format!("zone #{index}: {e}")),
        }
    }

    if !problems.is_empty() {
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(CommandError::Invalid(format!(
            "{} invalid shipping zones in {path}",
            problems.len()
        )));
    }
    Ok(zones)
}

/// Upsert the shipping zones listed in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any zone is
/// invalid, or a database write fails.
pub async fn shipping(path: &str) -> Result<(), CommandError> {
    let content = read_file(path).await?;
    let zones = parse_zones(path, &content)?;
    info!(path, zones = zones.len(), "Parsed shipping zones");

    let pool = db::create_pool(&database_url()?).await?;
    let repo = ShippingRepository::new(&pool);

    for zone in &zones {
        let saved = repo.upsert(zone).await?;
        info!(
            wilaya = %saved.wilaya,
            office = %saved.office_price,
            home = %saved.home_price,
            communes = saved.communes.len(),
            "Shipping zone saved"
        );
    }

    info!(count = zones.len(), "Seeding complete");
    Ok(())
}
