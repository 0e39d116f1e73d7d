//! Route definition for the relay endpoint.

use axum::routing::any;
use axum::Router;

use crate::handlers::sheets;
use crate::state::AppState;

/// Path of the relay endpoint.
pub const SHEETS_PATH: &str = "/api/sheets";

/// Relay route, mounted at the root.
///
/// ```text
/// ANY /api/sheets    -> relay (dispatch on body `action`)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(SHEETS_PATH, any(sheets::relay))
}
