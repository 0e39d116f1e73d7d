//! OAuth2 JWT-bearer exchange for service accounts.
//!
//! The relay signs a short-lived RS256 assertion with the service account's
//! private key and trades it at the token endpoint for a bearer token. A
//! fresh token is fetched for every relay request; nothing is cached.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::credentials::ServiceAccountKey;
use crate::error::SheetsError;
use crate::SPREADSHEETS_SCOPE;

/// Grant type for the JWT-bearer flow (RFC 7523).
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion, in seconds. Google caps this at one hour.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the signed assertion.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AssertionClaims {
    /// Issuer -- the service account email.
    pub iss: String,
    /// Space-separated OAuth scopes.
    pub scope: String,
    /// Audience -- the token endpoint.
    pub aud: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sign an assertion for `key`, addressed to `token_url`, issued at `now`.
pub fn sign_assertion(
    key: &ServiceAccountKey,
    token_url: &str,
    now: i64,
) -> Result<String, SheetsError> {
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: SPREADSHEETS_SCOPE.to_string(),
        aud: token_url.to_string(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &encoding_key)?)
}

/// Exchange a freshly signed assertion for a bearer token.
///
/// `token_url` overrides the credential's own `token_uri` when given.
pub async fn fetch_access_token(
    client: &reqwest::Client,
    key: &ServiceAccountKey,
    token_url: Option<&str>,
) -> Result<String, SheetsError> {
    let token_url = token_url.unwrap_or_else(|| key.token_uri());
    let assertion = sign_assertion(key, token_url, chrono::Utc::now().timestamp())?;

    let response = client
        .post(token_url)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        let message = token_error_message(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %message, "Token exchange rejected");
        return Err(SheetsError::Token(message));
    }

    let token: TokenResponse = response.json().await?;
    tracing::debug!(client_email = %key.client_email, "Obtained service account token");
    Ok(token.access_token)
}

/// OAuth error bodies look like `{"error": "invalid_grant",
/// "error_description": "..."}`.
fn token_error_message(status: u16, body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("error"))
                .and_then(serde_json::Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
