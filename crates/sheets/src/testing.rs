//! In-process stand-in for the Sheets API and the OAuth token endpoint.
//!
//! Enabled by the `test-util` feature. [`FakeSheets::spawn`] binds an axum
//! server on an ephemeral port that keeps rows in memory, applies
//! `USER_ENTERED` number coercion on append, verifies JWT-bearer assertions
//! against the fixture key, and can be told to fail the next values call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::token::{AssertionClaims, JWT_BEARER_GRANT};
use crate::SHEET_RANGE;

/// RSA private key matching [`FIXTURE_PUBLIC_KEY`]. Test use only.
pub const FIXTURE_PRIVATE_KEY: &str = include_str!("../testdata/service_account_key.pem");
pub const FIXTURE_PUBLIC_KEY: &str = include_str!("../testdata/service_account_key.pub.pem");

pub const FIXTURE_CLIENT_EMAIL: &str = "relay@checkout-test.iam.gserviceaccount.com";

#[derive(Default)]
struct Inner {
    sheets: HashMap<String, Vec<Value>>,
    fail_next: Option<(StatusCode, Value)>,
    tokens_issued: u32,
    last_auth: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    inner: Arc<Mutex<Inner>>,
    token_url: String,
}

impl FakeState {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a running fake upstream.
pub struct FakeSheets {
    state: FakeState,
    base_url: String,
}

impl FakeSheets {
    pub async fn spawn() -> std::io::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = FakeState {
            inner: Arc::new(Mutex::new(Inner::default())),
            token_url: format!("http://{addr}/token"),
        };

        let app = Router::new()
            .route("/token", post(issue_token))
            .route(
                "/v4/spreadsheets/{id}/values/{range}",
                get(read_values).post(append_values),
            )
            .with_state(state.clone());

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake Sheets server stopped");
            }
        });

        Ok(Self {
            state,
            base_url: format!("http://{addr}/v4/spreadsheets"),
        })
    }

    /// Base URL to configure as the Sheets API URL.
    pub fn api_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_url(&self) -> &str {
        &self.state.token_url
    }

    /// Credential JSON signed with the fixture key, pointing at this
    /// server's token endpoint.
    pub fn service_account_json(&self) -> String {
        json!({
            "type": "service_account",
            "client_email": FIXTURE_CLIENT_EMAIL,
            "private_key": FIXTURE_PRIVATE_KEY,
            "private_key_id": "fixture",
            "token_uri": self.state.token_url,
        })
        .to_string()
    }

    /// Replace the rows of a spreadsheet (row 0 is usually a header).
    pub fn seed(&self, spreadsheet_id: &str, rows: Vec<Value>) {
        self.state
            .lock()
            .sheets
            .insert(spreadsheet_id.to_string(), rows);
    }

    pub fn rows(&self, spreadsheet_id: &str) -> Vec<Value> {
        self.state
            .lock()
            .sheets
            .get(spreadsheet_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next values call (read or append) answer with `status` and
    /// `body`.
    pub fn fail_next(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.state.lock().fail_next = Some((status, body));
    }

    pub fn tokens_issued(&self) -> u32 {
        self.state.lock().tokens_issued
    }

    /// Credential seen on the last values call: `Bearer <token>` or
    /// `key:<api key>`.
    pub fn last_auth(&self) -> Option<String> {
        self.state.lock().last_auth.clone()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TokenForm {
    grant_type: String,
    assertion: String,
}

async fn issue_token(
    State(state): State<FakeState>,
    Form(form): Form<TokenForm>,
) -> (StatusCode, Json<Value>) {
    if form.grant_type != JWT_BEARER_GRANT {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unsupported_grant_type"})),
        );
    }

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[state.token_url.as_str()]);
    let verified = DecodingKey::from_rsa_pem(FIXTURE_PUBLIC_KEY.as_bytes())
        .and_then(|key| decode::<AssertionClaims>(&form.assertion, &key, &validation));

    match verified {
        Ok(_) => {
            let mut inner = state.lock();
            inner.tokens_issued += 1;
            let token = format!("fake-token-{}", inner.tokens_issued);
            (
                StatusCode::OK,
                Json(json!({
                    "access_token": token,
                    "expires_in": 3599,
                    "token_type": "Bearer",
                })),
            )
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature.",
            })),
        ),
    }
}

/// Authenticate a values call and consume any injected failure.
fn admit(
    state: &FakeState,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
) -> Result<(), (StatusCode, Json<Value>)> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| query.get("key").map(|k| format!("key:{k}")));

    let mut inner = state.lock();
    inner.last_auth = auth.clone();

    if auth.is_none() {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {
                "code": 401,
                "message": "Request is missing required authentication credential.",
                "status": "UNAUTHENTICATED",
            }})),
        ));
    }
    if let Some((status, body)) = inner.fail_next.take() {
        return Err((status, Json(body)));
    }
    Ok(())
}

async fn read_values(
    State(state): State<FakeState>,
    Path((spreadsheet_id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = admit(&state, &headers, &query) {
        return rejection;
    }
    if range != SHEET_RANGE {
        return bad_request(&format!("Unable to parse range: {range}"));
    }

    let rows = state
        .lock()
        .sheets
        .get(&spreadsheet_id)
        .cloned()
        .unwrap_or_default();

    // The real API omits `values` entirely for an empty range.
    let mut body = json!({
        "range": format!("Sheet1!A1:E{}", rows.len().max(1)),
        "majorDimension": "ROWS",
    });
    if !rows.is_empty() {
        body["values"] = Value::Array(rows);
    }
    (StatusCode::OK, Json(body))
}

#[derive(Deserialize)]
struct AppendBody {
    values: Vec<Value>,
}

async fn append_values(
    State(state): State<FakeState>,
    Path((spreadsheet_id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<AppendBody>,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = admit(&state, &headers, &query) {
        return rejection;
    }
    if range != format!("{SHEET_RANGE}:append") {
        return bad_request(&format!("Unable to parse range: {range}"));
    }
    if query.get("valueInputOption").map(String::as_str) != Some("USER_ENTERED") {
        return bad_request("Invalid valueInputOption");
    }

    let appended: Vec<Value> = body
        .values
        .into_iter()
        .map(|row| match row {
            Value::Array(cells) => Value::Array(cells.into_iter().map(user_entered).collect()),
            other => other,
        })
        .collect();
    let count = appended.len();

    state
        .lock()
        .sheets
        .entry(spreadsheet_id.clone())
        .or_default()
        .extend(appended);

    (
        StatusCode::OK,
        Json(json!({
            "spreadsheetId": spreadsheet_id,
            "updates": {"updatedRows": count},
        })),
    )
}

/// Numeric-looking strings are stored as numbers, like a sheet would.
fn user_entered(cell: Value) -> Value {
    let Value::String(raw) = &cell else {
        return cell;
    };
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    let number = trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64);
    match number {
        Some(n) => Value::Number(n),
        None => cell,
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"code": 400, "message": message, "status": "INVALID_ARGUMENT"}})),
    )
}
