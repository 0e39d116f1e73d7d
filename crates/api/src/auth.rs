//! Bearer-token resolution for upstream calls.

use checkout_sheets::token::fetch_access_token;
use checkout_sheets::{CredentialError, SheetsError};

use crate::config::SheetsConfig;

/// Resolve a fresh bearer token from the configured service account.
///
/// Fails with [`SheetsError::Credentials`] when the credential was missing
/// or malformed at start-up, and with a token error when the exchange is
/// refused.
pub async fn resolve_access_token(
    http: &reqwest::Client,
    config: &SheetsConfig,
) -> Result<String, SheetsError> {
    let key = config.credentials.as_ref().map_err(CredentialError::clone)?;
    fetch_access_token(http, key, config.token_url.as_deref()).await
}
