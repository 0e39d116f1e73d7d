//! Store that goes through the relay server.

use async_trait::async_trait;
use checkout_core::checkout::CheckoutRecord;
use checkout_core::relay::RelayRequest;
use checkout_core::rows::records_from_sheet_json;
use serde_json::Value;

use crate::config::StoreMode;
use crate::error::ClientError;
use crate::store::CheckoutStore;

/// Path of the relay endpoint under the relay base URL.
pub const RELAY_PATH: &str = "/api/sheets";

/// POSTs `{action, spreadsheetId, data}` to the relay endpoint.
pub struct RelayStore {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayStore {
    /// Create a store for a relay at `base_url`, e.g. `http://localhost:3001`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{RELAY_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &RelayRequest) -> Result<reqwest::Response, ClientError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ClientError::Api(relay_error_message(status.as_u16(), &body)));
        }
        Ok(response)
    }
}

/// The relay's `error` string, or `HTTP <status>` when there is none.
fn relay_error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[async_trait]
impl CheckoutStore for RelayStore {
    async fn append(
        &self,
        spreadsheet_id: &str,
        record: &CheckoutRecord,
    ) -> Result<(), ClientError> {
        self.post(&RelayRequest::append(spreadsheet_id, record))
            .await?;
        Ok(())
    }

    async fn read(&self, spreadsheet_id: &str) -> Result<Vec<CheckoutRecord>, ClientError> {
        let response = self.post(&RelayRequest::read(spreadsheet_id)).await?;
        let body: Value = response.json().await?;
        Ok(records_from_sheet_json(&body))
    }

    fn mode(&self) -> StoreMode {
        StoreMode::Relay
    }
}
