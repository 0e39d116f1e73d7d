use std::sync::Arc;

use checkout_sheets::SheetsApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the config is behind an `Arc` and both HTTP clients
/// share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Client used for the token exchange.
    pub http: reqwest::Client,
    /// Upstream Sheets client.
    pub sheets: SheetsApi,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let http = reqwest::Client::new();
        let sheets = SheetsApi::with_client(http.clone(), config.sheets.api_url.clone())
            .with_retry(config.sheets.retry);

        Self {
            config: Arc::new(config),
            http,
            sheets,
        }
    }
}
