//! JSON wire types for the relay endpoint.
//!
//! Clients POST a [`RelayRequest`]. The server checks it in two steps:
//! [`RelayRequest::spreadsheet_id`] before a token is fetched, then
//! [`RelayRequest::into_action`] once the token is in hand.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checkout::CheckoutRecord;
use crate::error::CoreError;
use crate::rows::coerce_cell;

pub const ACTION_APPEND: &str = "append";
pub const ACTION_READ: &str = "read";

pub const MSG_SPREADSHEET_ID_REQUIRED: &str = "spreadsheetId is required";
pub const MSG_DATA_REQUIRED: &str = "data is required for append action";
pub const MSG_INVALID_ACTION: &str = "Invalid action";

/// Request body accepted by the relay endpoint.
///
/// Every field is an optional loosely typed value on the wire, so a missing
/// or oddly typed field produces the endpoint's own 400 message instead of
/// a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<Value>,
    /// Row cells for `append`, forwarded to the sheet as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Operation selected by a checked request.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayAction {
    /// Append one row holding the given cells.
    Append { row: Value },
    /// Read every row in the fixed range.
    Read,
}

/// `{ "success": true }` returned after an append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendResponse {
    pub success: bool,
}

/// `{ "error": "..." }` returned on every relay failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl RelayRequest {
    /// Build an append request carrying the record's five cells in column
    /// order.
    pub fn append(spreadsheet_id: &str, record: &CheckoutRecord) -> Self {
        Self {
            action: Some(Value::from(ACTION_APPEND)),
            spreadsheet_id: Some(Value::from(spreadsheet_id)),
            data: Some(Value::from(record.to_row().to_vec())),
        }
    }

    pub fn read(spreadsheet_id: &str) -> Self {
        Self {
            action: Some(Value::from(ACTION_READ)),
            spreadsheet_id: Some(Value::from(spreadsheet_id)),
            data: None,
        }
    }

    /// The spreadsheet id as it goes into the upstream URL.
    ///
    /// Checked for every action. A JSON-falsy id (`null`, `false`, `0`,
    /// `""`) counts as missing; any other value is coerced to a string.
    pub fn spreadsheet_id(&self) -> Result<String, CoreError> {
        self.spreadsheet_id
            .as_ref()
            .filter(|id| !is_falsy(id))
            .map(coerce_cell)
            .ok_or_else(|| CoreError::Validation(MSG_SPREADSHEET_ID_REQUIRED.to_string()))
    }

    /// Resolve the action.
    ///
    /// Only the strings `"append"` and `"read"` are actions. `data` is
    /// required for `append` and treated as absent when it is JSON-falsy.
    pub fn into_action(self) -> Result<RelayAction, CoreError> {
        match self.action.as_ref().and_then(Value::as_str) {
            Some(ACTION_APPEND) => {
                let row = self
                    .data
                    .filter(|data| !is_falsy(data))
                    .ok_or_else(|| CoreError::Validation(MSG_DATA_REQUIRED.to_string()))?;
                Ok(RelayAction::Append { row })
            }
            Some(ACTION_READ) => Ok(RelayAction::Read),
            _ => Err(CoreError::Validation(MSG_INVALID_ACTION.to_string())),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
