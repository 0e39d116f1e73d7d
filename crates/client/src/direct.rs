//! Store that calls the Sheets API directly with an API key.
//!
//! No server-side secret is involved. API keys can only write to sheets
//! whose sharing settings allow it.

use async_trait::async_trait;
use checkout_core::checkout::CheckoutRecord;
use checkout_core::rows::records_from_sheet_json;
use checkout_sheets::{SheetsApi, SheetsAuth};
use serde_json::Value;

use crate::config::StoreMode;
use crate::error::ClientError;
use crate::store::CheckoutStore;

pub struct DirectStore {
    sheets: SheetsApi,
    auth: SheetsAuth,
}

impl DirectStore {
    pub fn new(sheets_api_url: &str, api_key: String) -> Self {
        Self::with_client(reqwest::Client::new(), sheets_api_url, api_key)
    }

    pub fn with_client(client: reqwest::Client, sheets_api_url: &str, api_key: String) -> Self {
        Self {
            sheets: SheetsApi::with_client(client, sheets_api_url),
            auth: SheetsAuth::ApiKey(api_key),
        }
    }
}

#[async_trait]
impl CheckoutStore for DirectStore {
    async fn append(
        &self,
        spreadsheet_id: &str,
        record: &CheckoutRecord,
    ) -> Result<(), ClientError> {
        let row = Value::from(record.to_row().to_vec());
        self.sheets
            .append_row(spreadsheet_id, &row, &self.auth)
            .await?;
        Ok(())
    }

    async fn read(&self, spreadsheet_id: &str) -> Result<Vec<CheckoutRecord>, ClientError> {
        let body = self.sheets.read_range(spreadsheet_id, &self.auth).await?;
        Ok(records_from_sheet_json(&body))
    }

    fn mode(&self) -> StoreMode {
        StoreMode::Direct
    }
}
