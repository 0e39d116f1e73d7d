use crate::credentials::CredentialError;

/// Errors from the Sheets client layer.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// The service-account credential is missing or unusable.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// Signing the JWT assertion failed (usually a bad private key).
    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint refused the assertion.
    #[error("{0}")]
    Token(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The Sheets API returned a non-2xx status. Displays as the message
    /// extracted from the upstream body.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the upstream body, or `HTTP <status>`.
        message: String,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("Invalid upstream response: {0}")]
    Decode(String),
}
