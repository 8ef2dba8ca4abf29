use serde::Deserialize;
use tracing::{info, warn};

use super::ListEnvelope;
use crate::error::PipelineError;
use crate::graph::{GraphClient, METADATA_TIMEOUT};

/// Human-readable drive names tried in order before falling back to the
/// first drive returned.
pub const PREFERRED_DRIVE_NAMES: &[&str] =
    &["Shared Documents", "Documentos", "Documentos Compartilhados"];

/// One drive returned by the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct DriveCandidate {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Two-tier selection: each preferred name is tried in order across all
/// candidates (case-insensitive exact match); if none matches, the first
/// drive returned wins. The boolean reports whether a preferred name matched.
pub fn select_drive(drives: &[DriveCandidate]) -> Option<(&DriveCandidate, bool)> {
    let preferred = PREFERRED_DRIVE_NAMES.iter().find_map(|pref| {
        drives
            .iter()
            .find(|d| d.name.to_lowercase() == pref.to_lowercase())
    });
    match preferred {
        Some(d) => Some((d, true)),
        None => drives.first().map(|d| (d, false)),
    }
}

/// List the site's drives and return the selected drive's id.
pub async fn resolve_drive_id(
    graph: &GraphClient,
    site_id: &str,
) -> Result<String, PipelineError> {
    let url = format!("{}/sites/{}/drives", graph.base(), site_id);
    let listing: ListEnvelope<DriveCandidate> = graph
        .get(&url, METADATA_TIMEOUT)
        .send()
        .await
        .map_err(|e| PipelineError::http(&url, e))?
        .error_for_status()
        .map_err(|e| PipelineError::http(&url, e))?
        .json()
        .await
        .map_err(|e| PipelineError::http(&url, e))?;

    let (drive, matched) = select_drive(&listing.value).ok_or_else(|| {
        PipelineError::Resolution {
            reason: format!("no drive found in site {site_id:?}"),
        }
    })?;

    if matched {
        info!(name = %drive.name, id = %drive.id, "resolved drive");
    } else {
        warn!(
            name = %drive.name,
            id = %drive.id,
            "no preferred drive name matched, falling back to first drive"
        );
    }
    Ok(drive.id.clone())
}
