use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::PipelineError;
use crate::graph::METADATA_TIMEOUT;

/// Login endpoint of the identity provider.
pub const AUTHORITY_BASE: &str = "https://login.microsoftonline.com";
/// Scope granting app-only access to the directory API.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// App-registration secrets for the client-credentials grant.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

fn token_from_response(body: TokenResponse) -> Result<String, PipelineError> {
    match body.access_token {
        Some(token) => Ok(token),
        None => Err(PipelineError::Auth {
            reason: format!(
                "{}: {}",
                body.error.unwrap_or_else(|| "no access_token in response".into()),
                body.error_description.unwrap_or_default()
            ),
        }),
    }
}

/// Exchange the app registration for a bearer token. Any failure here aborts
/// the run before resolution starts.
pub async fn acquire_token(
    http: &Client,
    creds: &ClientCredentials,
) -> Result<String, PipelineError> {
    let url = format!("{}/{}/oauth2/v2.0/token", AUTHORITY_BASE, creds.tenant_id);
    let params = [
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("scope", GRAPH_SCOPE),
        ("grant_type", "client_credentials"),
    ];

    let resp = http
        .post(&url)
        .timeout(METADATA_TIMEOUT)
        .form(&params)
        .send()
        .await
        .map_err(|e| PipelineError::http(&url, e))?;
    let body: TokenResponse = resp
        .json()
        .await
        .map_err(|e| PipelineError::http(&url, e))?;

    let token = token_from_response(body)?;
    info!("acquired bearer token");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_extracted_when_present() {
        let body: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc","token_type":"Bearer"}"#).unwrap();
        assert_eq!(token_from_response(body).unwrap(), "abc");
    }

    #[test]
    fn missing_token_is_auth_error_with_payload() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"error":"invalid_client","error_description":"AADSTS7000215"}"#,
        )
        .unwrap();
        let err = token_from_response(body).unwrap_err();
        match err {
            PipelineError::Auth { reason } => {
                assert!(reason.contains("invalid_client"));
                assert!(reason.contains("AADSTS7000215"));
            }
            other => panic!("expected Auth error, got {other:?}"),
        }
    }
}
