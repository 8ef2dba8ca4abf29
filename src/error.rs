use thiserror::Error;

/// Fatal error kinds for a pipeline run. None of these is retried or
/// recovered internally; every kind aborts the run with its diagnostic
/// context attached.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The credential provider did not produce a bearer token.
    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    /// Site search or drive listing produced no usable candidate.
    #[error("resolution failed: {reason}")]
    Resolution { reason: String },

    /// Content retrieval returned a non-success status.
    #[error("download failed: HTTP {status}: {body} | path: {path}")]
    Fetch {
        status: u16,
        body: String,
        path: String,
    },

    /// The workbook could not be parsed, or the table violated a schema
    /// invariant (empty/duplicate header, required column missing).
    #[error("schema error: {0}")]
    Schema(String),

    /// Transport-level failure on a remote call.
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl PipelineError {
    pub(crate) fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        PipelineError::Http {
            url: url.into(),
            source,
        }
    }
}
