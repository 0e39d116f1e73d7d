//! Google Sheets v4 client used by the checkout relay and the direct
//! API-key client.
//!
//! Covers the two value-range calls the checkout flow needs (append one row,
//! read the fixed range), service-account credential parsing, and the
//! OAuth2 JWT-bearer exchange that turns a credential into a bearer token.

pub mod api;
pub mod credentials;
pub mod error;
pub mod retry;
pub mod token;

pub use api::{SheetsApi, SheetsAuth};
pub use credentials::{CredentialError, ServiceAccountKey};
pub use error::SheetsError;
pub use retry::RetryPolicy;

/// Default base URL of the Sheets v4 spreadsheets collection.
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Default OAuth2 token endpoint for service-account assertions.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// The fixed range every checkout row lives in (columns A–E).
pub const SHEET_RANGE: &str = "Sheet1!A:E";

/// OAuth scope granting spreadsheet read/write.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
