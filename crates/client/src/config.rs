use std::fmt;
use std::str::FromStr;

use checkout_sheets::DEFAULT_SHEETS_API_URL;

use crate::error::ClientError;

/// Default relay server base URL for local development.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3001";

/// Which store implementation the client talks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Through the relay server, which holds the service account.
    #[default]
    Relay,
    /// Straight to the Sheets API with an API key.
    Direct,
}

impl FromStr for StoreMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relay" => Ok(StoreMode::Relay),
            "direct" => Ok(StoreMode::Direct),
            other => Err(ClientError::Config(format!(
                "CHECKOUT_MODE must be 'relay' or 'direct', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Relay => f.write_str("relay"),
            StoreMode::Direct => f.write_str("direct"),
        }
    }
}

/// Client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub mode: StoreMode,
    /// Relay server base URL; the endpoint is `{relay_url}/api/sheets`.
    pub relay_url: String,
    /// Sheets API base URL for [`StoreMode::Direct`].
    pub sheets_api_url: String,
    /// API key for [`StoreMode::Direct`].
    pub api_key: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("mode", &self.mode)
            .field("relay_url", &self.relay_url)
            .field("sheets_api_url", &self.sheets_api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Required      | Default                                         |
    /// |--------------------|---------------|-------------------------------------------------|
    /// | `CHECKOUT_MODE`    | no            | `relay`                                         |
    /// | `CHECKOUT_API_URL` | no            | `http://localhost:3001`                         |
    /// | `SHEETS_API_URL`   | no            | `https://sheets.googleapis.com/v4/spreadsheets` |
    /// | `SHEETS_API_KEY`   | direct mode   | --                                              |
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("CHECKOUT_MODE").filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => StoreMode::default(),
        };

        let relay_url = lookup("CHECKOUT_API_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());

        let sheets_api_url = lookup("SHEETS_API_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string());

        let api_key = lookup("SHEETS_API_KEY").filter(|s| !s.is_empty());

        if mode == StoreMode::Direct && api_key.is_none() {
            return Err(ClientError::Config(
                "SHEETS_API_KEY is required in direct mode".to_string(),
            ));
        }

        Ok(Self {
            mode,
            relay_url,
            sheets_api_url,
            api_key,
        })
    }
}
