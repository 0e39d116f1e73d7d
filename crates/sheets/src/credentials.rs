//! Service-account credential parsing.
//!
//! The credential is the JSON key file Google issues for a service account.
//! Only `client_email` and `private_key` are required; `token_uri` and
//! `private_key_id` are used when present.

use serde::Deserialize;

use crate::DEFAULT_TOKEN_URL;

/// Name of the environment variable holding the credential JSON.
pub const SERVICE_ACCOUNT_ENV: &str = "GOOGLE_SERVICE_ACCOUNT";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("GOOGLE_SERVICE_ACCOUNT environment variable not set")]
    Missing,

    #[error("Invalid service account credential: {0}")]
    Malformed(String),
}

/// A parsed service-account key.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse the credential JSON.
    ///
    /// Fails with [`CredentialError::Malformed`] when the JSON is invalid or
    /// either required field is missing or empty.
    pub fn from_json(raw: &str) -> Result<Self, CredentialError> {
        let key: ServiceAccountKey =
            serde_json::from_str(raw).map_err(|e| CredentialError::Malformed(e.to_string()))?;

        if key.client_email.is_empty() {
            return Err(CredentialError::Malformed("client_email is empty".into()));
        }
        if key.private_key.is_empty() {
            return Err(CredentialError::Malformed("private_key is empty".into()));
        }
        Ok(key)
    }

    /// Parse an optional raw credential, treating `None` as missing.
    pub fn from_optional_json(raw: Option<&str>) -> Result<Self, CredentialError> {
        match raw {
            Some(raw) => Self::from_json(raw),
            None => Err(CredentialError::Missing),
        }
    }

    /// Token endpoint to post assertions to.
    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URL)
    }
}
