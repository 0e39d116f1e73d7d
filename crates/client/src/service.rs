//! The two client operations: record a checkout event, list all of them.

use checkout_core::checkout::CheckoutRecord;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::store::{build_store, CheckoutStore};

/// Records and lists checkout events through one [`CheckoutStore`].
///
/// Errors are logged once here and then returned unchanged; recovery is
/// left to the caller.
pub struct CheckoutService {
    store: Box<dyn CheckoutStore>,
}

impl CheckoutService {
    pub fn new(store: Box<dyn CheckoutStore>) -> Self {
        Self { store }
    }

    /// Build the service with the store selected by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(build_store(config)?))
    }

    /// Append `record` as a new row of the sheet.
    pub async fn send_checkout_to_sheet(
        &self,
        spreadsheet_id: &str,
        record: &CheckoutRecord,
    ) -> Result<(), ClientError> {
        match self.store.append(spreadsheet_id, record).await {
            Ok(()) => {
                tracing::info!(
                    mode = %self.store.mode(),
                    person = %record.person_name,
                    device_id = %record.device_id,
                    status = %record.status,
                    "Checkout sent to sheet",
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(mode = %self.store.mode(), error = %e, "Error sending checkout to sheet");
                Err(e)
            }
        }
    }

    /// Every record in the sheet, in row order, header excluded.
    pub async fn get_checkout_records(
        &self,
        spreadsheet_id: &str,
    ) -> Result<Vec<CheckoutRecord>, ClientError> {
        match self.store.read(spreadsheet_id).await {
            Ok(records) => {
                tracing::debug!(mode = %self.store.mode(), count = records.len(), "Checkout records read");
                Ok(records)
            }
            Err(e) => {
                tracing::error!(mode = %self.store.mode(), error = %e, "Error retrieving checkout records");
                Err(e)
            }
        }
    }
}
