use serde::Deserialize;
use tracing::info;

use super::ListEnvelope;
use crate::error::PipelineError;
use crate::graph::{GraphClient, METADATA_TIMEOUT};

/// One site returned by the search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCandidate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub site_collection: Option<SiteCollection>,
}

/// Presence of this facet marks a site-collection root.
#[derive(Debug, Deserialize)]
pub struct SiteCollection {
    #[serde(default)]
    pub hostname: Option<String>,
}

/// Pick the first candidate that is a site collection rooted on `host`.
/// First-in-returned-order wins; there is no further disambiguation.
pub fn select_site<'a>(candidates: &'a [SiteCandidate], host: &str) -> Option<&'a SiteCandidate> {
    let prefix = format!("https://{host}");
    candidates
        .iter()
        .find(|s| s.site_collection.is_some() && s.web_url.starts_with(&prefix))
}

/// Search for the site by term and return its id.
pub async fn resolve_site_id(
    graph: &GraphClient,
    host: &str,
    search_term: &str,
) -> Result<String, PipelineError> {
    let url = format!("{}/sites", graph.base());
    let listing: ListEnvelope<SiteCandidate> = graph
        .get(&url, METADATA_TIMEOUT)
        .query(&[("search", search_term)])
        .send()
        .await
        .map_err(|e| PipelineError::http(&url, e))?
        .error_for_status()
        .map_err(|e| PipelineError::http(&url, e))?
        .json()
        .await
        .map_err(|e| PipelineError::http(&url, e))?;

    let site = select_site(&listing.value, host).ok_or_else(|| PipelineError::Resolution {
        reason: format!("no site matching term {search_term:?} on host {host:?}"),
    })?;

    info!(
        name = site.name.as_deref().unwrap_or("<unnamed>"),
        web_url = %site.web_url,
        "resolved site"
    );
    Ok(site.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(json: &str) -> Vec<SiteCandidate> {
        let listing: ListEnvelope<SiteCandidate> = serde_json::from_str(json).unwrap();
        listing.value
    }

    #[test]
    fn picks_matching_host_regardless_of_order() {
        let sites = candidates(
            r#"{"value":[
                {"id":"other","name":"Other","webUrl":"https://other.sharepoint.com/sites/x",
                 "siteCollection":{"hostname":"other.sharepoint.com"}},
                {"id":"wanted","name":"CSC","webUrl":"https://contoso.sharepoint.com/sites/cscgp",
                 "siteCollection":{"hostname":"contoso.sharepoint.com"}}
            ]}"#,
        );
        let chosen = select_site(&sites, "contoso.sharepoint.com").unwrap();
        assert_eq!(chosen.id, "wanted");
    }

    #[test]
    fn skips_candidates_without_site_collection_facet() {
        let sites = candidates(
            r#"{"value":[
                {"id":"subsite","webUrl":"https://contoso.sharepoint.com/sites/sub"},
                {"id":"root","webUrl":"https://contoso.sharepoint.com/sites/root",
                 "siteCollection":{}}
            ]}"#,
        );
        let chosen = select_site(&sites, "contoso.sharepoint.com").unwrap();
        assert_eq!(chosen.id, "root");
    }

    #[test]
    fn first_of_several_matches_wins() {
        let sites = candidates(
            r#"{"value":[
                {"id":"a","webUrl":"https://contoso.sharepoint.com/sites/a","siteCollection":{}},
                {"id":"b","webUrl":"https://contoso.sharepoint.com/sites/b","siteCollection":{}}
            ]}"#,
        );
        assert_eq!(select_site(&sites, "contoso.sharepoint.com").unwrap().id, "a");
    }

    #[test]
    fn no_match_yields_none() {
        let sites = candidates(
            r#"{"value":[
                {"id":"x","webUrl":"https://elsewhere.sharepoint.com/sites/x","siteCollection":{}}
            ]}"#,
        );
        assert!(select_site(&sites, "contoso.sharepoint.com").is_none());
        assert!(select_site(&[], "contoso.sharepoint.com").is_none());
    }
}
