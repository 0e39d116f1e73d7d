//! The checkout store capability and its composition-time selection.

use async_trait::async_trait;
use checkout_core::checkout::CheckoutRecord;

use crate::config::{ClientConfig, StoreMode};
use crate::direct::DirectStore;
use crate::error::ClientError;
use crate::relay::RelayStore;

/// Append and list checkout records in a spreadsheet.
///
/// Implementations make one upstream call per operation and never retry.
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    /// Append one record as a new row, columns A–E.
    async fn append(&self, spreadsheet_id: &str, record: &CheckoutRecord)
        -> Result<(), ClientError>;

    /// Read every record, skipping the header row and dropping short rows.
    async fn read(&self, spreadsheet_id: &str) -> Result<Vec<CheckoutRecord>, ClientError>;

    /// Which implementation this is, for logging.
    fn mode(&self) -> StoreMode;
}

/// Build the store selected by `config.mode`.
pub fn build_store(config: &ClientConfig) -> Result<Box<dyn CheckoutStore>, ClientError> {
    let client = reqwest::Client::new();
    match config.mode {
        StoreMode::Relay => Ok(Box::new(RelayStore::with_client(
            client,
            &config.relay_url,
        ))),
        StoreMode::Direct => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                ClientError::Config("SHEETS_API_KEY is required in direct mode".to_string())
            })?;
            Ok(Box::new(DirectStore::with_client(
                client,
                &config.sheets_api_url,
                api_key,
            )))
        }
    }
}
