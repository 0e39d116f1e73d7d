use checkout_sheets::SheetsError;

/// Errors surfaced by the client service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request to the relay failed before a response arrived.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The relay answered with a non-2xx status. Holds the relay's `error`
    /// string, or `HTTP <status>`.
    #[error("{0}")]
    Api(String),

    /// A direct Sheets API call failed.
    #[error(transparent)]
    Sheets(#[from] SheetsError),

    /// Client configuration is incomplete or invalid.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}
