use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Base endpoint of the directory/content API.
pub const GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Timeout for metadata lookups (site search, drive listing, token).
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for content download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Authenticated handle on the remote directory API. Holds the HTTP client
/// and the bearer token for the lifetime of one run; every request goes
/// through [`GraphClient::get`] so the token and per-call timeout are applied
/// uniformly.
pub struct GraphClient {
    http: Client,
    token: String,
    base: String,
}

impl GraphClient {
    pub fn new(http: Client, token: String) -> Self {
        GraphClient {
            http,
            token,
            base: GRAPH_BASE.to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Start a GET against `url` with the bearer token and the given timeout.
    pub fn get(&self, url: &str, timeout: Duration) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.token).timeout(timeout)
    }
}
