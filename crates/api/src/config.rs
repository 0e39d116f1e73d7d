use std::time::Duration;

use checkout_sheets::credentials::SERVICE_ACCOUNT_ENV;
use checkout_sheets::{CredentialError, RetryPolicy, ServiceAccountKey, DEFAULT_SHEETS_API_URL};

/// Server configuration loaded from environment variables.
///
/// Read once at start-up and shared immutably; nothing here changes while
/// the server runs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upstream Sheets settings and the service-account credential.
    pub sheets: SheetsConfig,
}

/// Upstream settings used by the relay handler.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Parsed credential, or the reason it is unusable. A broken credential
    /// does not stop the server; each relay request fails with a 500.
    pub credentials: Result<ServiceAccountKey, CredentialError>,
    /// Spreadsheets collection base URL.
    pub api_url: String,
    /// Token endpoint override; the credential's `token_uri` otherwise.
    pub token_url: Option<String>,
    /// Retry policy at the upstream-call boundary (one attempt by default).
    pub retry: RetryPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                                         |
    /// |-----------------------------|-------------------------------------------------|
    /// | `HOST`                      | `0.0.0.0`                                       |
    /// | `PORT`                      | `3001`                                          |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                                            |
    /// | `GOOGLE_SERVICE_ACCOUNT`    | unset                                           |
    /// | `SHEETS_API_URL`            | `https://sheets.googleapis.com/v4/spreadsheets` |
    /// | `GOOGLE_TOKEN_URL`          | credential `token_uri`                          |
    /// | `UPSTREAM_MAX_ATTEMPTS`     | `1`                                             |
    /// | `UPSTREAM_RETRY_BACKOFF_MS` | `250`                                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            request_timeout_secs,
            sheets: SheetsConfig::from_env(),
        }
    }
}

impl SheetsConfig {
    pub fn from_env() -> Self {
        let raw_credentials = std::env::var(SERVICE_ACCOUNT_ENV).ok();
        let credentials = ServiceAccountKey::from_optional_json(raw_credentials.as_deref());

        let api_url =
            std::env::var("SHEETS_API_URL").unwrap_or_else(|_| DEFAULT_SHEETS_API_URL.into());

        let token_url = std::env::var("GOOGLE_TOKEN_URL")
            .ok()
            .filter(|s| !s.is_empty());

        let max_attempts: u32 = std::env::var("UPSTREAM_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("UPSTREAM_MAX_ATTEMPTS must be a valid u32");

        let backoff_ms: u64 = std::env::var("UPSTREAM_RETRY_BACKOFF_MS")
            .unwrap_or_else(|_| "250".into())
            .parse()
            .expect("UPSTREAM_RETRY_BACKOFF_MS must be a valid u64");

        Self {
            credentials,
            api_url,
            token_url,
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(backoff_ms)),
        }
    }
}
