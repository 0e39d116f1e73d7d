use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout_core::error::CoreError;
use checkout_core::relay::ErrorBody;
use checkout_sheets::SheetsError;

/// Fallback message for a 500 whose error carries no text.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";

/// Relay handler error type.
///
/// Every failure leaves the handler through this type, and
/// [`IntoResponse`] is the one place errors are logged and turned into a
/// `{ "error": "..." }` body. Validation failures map to 400; everything
/// else maps to 500 with the error's own message.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A request validation error from `checkout_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Credential, token, network, or upstream API failure.
    #[error(transparent)]
    Sheets(#[from] SheetsError),

    /// The request body was not valid JSON.
    #[error("{0}")]
    MalformedBody(String),

    /// The whole request outlived the configured request timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Failure outside the handler: a panic, or a middleware error. Holds
    /// the panic message when there was one.
    #[error("{0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type RelayResult<T> = Result<T, RelayError>;

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RelayError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            other => {
                tracing::error!(error = %other, "API error");
                let message = other.to_string();
                let message = if message.is_empty() {
                    INTERNAL_SERVER_ERROR_MESSAGE.to_string()
                } else {
                    message
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}
