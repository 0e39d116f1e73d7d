//! The checkout record entity and its enumerations.
//!
//! A record maps 1:1 onto spreadsheet columns A–E in the fixed order
//! person name, device type, device id, checkout time, status. Rows are
//! only ever appended, never updated in place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of spreadsheet columns a record occupies (A–E).
pub const COLUMN_COUNT: usize = 5;

pub const DEVICE_GOOGLE_PIXEL: &str = "Google Pixel";
pub const DEVICE_APPLE_IPHONE: &str = "Apple iPhone";
pub const DEVICE_MAC_MINI: &str = "Mac Mini";

pub const STATUS_CHECKED_OUT: &str = "checked-out";
pub const STATUS_CHECKED_IN: &str = "checked-in";

/// Kind of device being checked out.
///
/// Conversion from a string never fails: cell values that are not one of
/// the known device names land in [`DeviceType::Other`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    GooglePixel,
    AppleIPhone,
    MacMini,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceType::GooglePixel => DEVICE_GOOGLE_PIXEL,
            DeviceType::AppleIPhone => DEVICE_APPLE_IPHONE,
            DeviceType::MacMini => DEVICE_MAC_MINI,
            DeviceType::Other(raw) => raw,
        }
    }
}

impl From<String> for DeviceType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            DEVICE_GOOGLE_PIXEL => DeviceType::GooglePixel,
            DEVICE_APPLE_IPHONE => DeviceType::AppleIPhone,
            DEVICE_MAC_MINI => DeviceType::MacMini,
            _ => DeviceType::Other(raw),
        }
    }
}

impl From<&str> for DeviceType {
    fn from(raw: &str) -> Self {
        DeviceType::from(raw.to_string())
    }
}

impl From<DeviceType> for String {
    fn from(device: DeviceType) -> Self {
        match device {
            DeviceType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the device left or came back.
///
/// Like [`DeviceType`], unknown strings are kept in [`CheckoutStatus::Other`]
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckoutStatus {
    CheckedOut,
    CheckedIn,
    Other(String),
}

impl CheckoutStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CheckoutStatus::CheckedOut => STATUS_CHECKED_OUT,
            CheckoutStatus::CheckedIn => STATUS_CHECKED_IN,
            CheckoutStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for CheckoutStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            STATUS_CHECKED_OUT => CheckoutStatus::CheckedOut,
            STATUS_CHECKED_IN => CheckoutStatus::CheckedIn,
            _ => CheckoutStatus::Other(raw),
        }
    }
}

impl From<&str> for CheckoutStatus {
    fn from(raw: &str) -> Self {
        CheckoutStatus::from(raw.to_string())
    }
}

impl From<CheckoutStatus> for String {
    fn from(status: CheckoutStatus) -> Self {
        match status {
            CheckoutStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One checkout or check-in event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRecord {
    /// Column A.
    pub person_name: String,
    /// Column B.
    pub device_type: DeviceType,
    /// Column C.
    pub device_id: String,
    /// Column D. Kept as the string the client produced; never parsed.
    pub checkout_time: String,
    /// Column E.
    pub status: CheckoutStatus,
}

impl CheckoutRecord {
    /// Serialize the record into its spreadsheet row, columns A–E.
    pub fn to_row(&self) -> [String; COLUMN_COUNT] {
        [
            self.person_name.clone(),
            self.device_type.as_str().to_string(),
            self.device_id.clone(),
            self.checkout_time.clone(),
            self.status.as_str().to_string(),
        ]
    }

    /// Build a record from five already-coerced cells in column order.
    ///
    /// The device type and status cells are cast without checking that they
    /// name a known member.
    pub fn from_row(cells: [String; COLUMN_COUNT]) -> Self {
        let [person_name, device_type, device_id, checkout_time, status] = cells;
        Self {
            person_name,
            device_type: DeviceType::from(device_type),
            device_id,
            checkout_time,
            status: CheckoutStatus::from(status),
        }
    }
}
