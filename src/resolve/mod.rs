pub mod drive;
pub mod site;

pub use drive::resolve_drive_id;
pub use site::resolve_site_id;

use serde::Deserialize;

/// Listing envelope the directory API wraps every collection in.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}
