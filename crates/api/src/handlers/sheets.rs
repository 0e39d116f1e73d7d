//! Handler for the relay endpoint.
//!
//! One route, dispatched on the JSON body's `action` rather than the HTTP
//! method. Each action makes exactly one upstream call (more only when a
//! retry policy is configured).

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use checkout_core::relay::{AppendResponse, RelayAction, RelayRequest};
use checkout_sheets::SheetsAuth;
use serde_json::Value;

use crate::auth::resolve_access_token;
use crate::error::{RelayError, RelayResult};
use crate::state::AppState;

/// ANY /api/sheets
///
/// `OPTIONS` answers 200 with an empty body before anything else runs.
/// Otherwise the spreadsheet id is checked, a bearer token is obtained,
/// and only then is the action resolved and forwarded upstream. A broken
/// credential therefore fails every request that names a spreadsheet, even
/// one with a bad action.
pub async fn relay(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> RelayResult<Response> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let request = parse_body(&body)?;
    let spreadsheet_id = request.spreadsheet_id()?;

    let token = resolve_access_token(&state.http, &state.config.sheets).await?;
    let auth = SheetsAuth::Bearer(token);

    match request.into_action()? {
        RelayAction::Append { row } => {
            state
                .sheets
                .append_row(&spreadsheet_id, &row, &auth)
                .await?;
            tracing::info!(%spreadsheet_id, "Row appended");
            Ok(Json(AppendResponse { success: true }).into_response())
        }
        RelayAction::Read => {
            let sheet = state.sheets.read_range(&spreadsheet_id, &auth).await?;
            tracing::debug!(%spreadsheet_id, "Range read");
            Ok(Json(sheet).into_response())
        }
    }
}

/// An empty body, or a JSON value that is not an object, reads as an empty
/// request so it fails field validation with a 400. Anything else must be
/// valid JSON.
fn parse_body(body: &[u8]) -> RelayResult<RelayRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RelayRequest::default());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| RelayError::MalformedBody(e.to_string()))?;
    if !value.is_object() {
        return Ok(RelayRequest::default());
    }
    serde_json::from_value(value).map_err(|e| RelayError::MalformedBody(e.to_string()))
}
