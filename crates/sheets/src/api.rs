//! REST client for the Sheets v4 values endpoints.
//!
//! Wraps the two calls the checkout flow makes against the fixed
//! [`SHEET_RANGE`]: appending one row and reading the whole range. Each
//! call makes a single upstream request unless a [`RetryPolicy`] with more
//! attempts is configured.

use std::fmt;

use reqwest::Url;
use serde_json::{json, Value};

use crate::error::SheetsError;
use crate::retry::RetryPolicy;
use crate::SHEET_RANGE;

/// How a request authenticates against the Sheets API.
#[derive(Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// OAuth bearer token from the service-account exchange.
    Bearer(String),
    /// API key sent as the `key` query parameter.
    ApiKey(String),
}

impl fmt::Debug for SheetsAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetsAuth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            SheetsAuth::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

impl SheetsAuth {
    fn apply_to_url(&self, url: &mut Url) {
        if let SheetsAuth::ApiKey(key) = self {
            url.query_pairs_mut().append_pair("key", key);
        }
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            SheetsAuth::Bearer(token) => request.bearer_auth(token),
            SheetsAuth::ApiKey(_) => request,
        }
    }
}

/// HTTP client for the Sheets values API.
#[derive(Clone)]
pub struct SheetsApi {
    client: reqwest::Client,
    api_url: String,
    retry: RetryPolicy,
}

impl SheetsApi {
    /// Create a client for the given spreadsheets base URL, e.g.
    /// `https://sheets.googleapis.com/v4/spreadsheets`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Append one row to the end of the range.
    ///
    /// Sends `POST {base}/{id}/values/Sheet1!A:E:append` with
    /// `valueInputOption=USER_ENTERED`, so the sheet applies its usual type
    /// coercion to the cells. Always a single attempt, whatever the retry
    /// policy says.
    pub async fn append_row(
        &self,
        spreadsheet_id: &str,
        row: &Value,
        auth: &SheetsAuth,
    ) -> Result<(), SheetsError> {
        let mut url = self.range_url(spreadsheet_id, &format!("{SHEET_RANGE}:append"))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        auth.apply_to_url(&mut url);

        let body = json!({
            "values": [row],
            "majorDimension": "ROWS",
        });

        // Not idempotent: a retried 5xx may already have written the row.
        let response = auth.apply(self.client.post(url).json(&body)).send().await?;

        Self::check_status(response).await?;
        tracing::debug!(spreadsheet_id, "Appended row to sheet");
        Ok(())
    }

    /// Read every row of the range, returning the upstream JSON unchanged.
    ///
    /// Retried according to the configured [`RetryPolicy`].
    pub async fn read_range(
        &self,
        spreadsheet_id: &str,
        auth: &SheetsAuth,
    ) -> Result<Value, SheetsError> {
        let mut url = self.range_url(spreadsheet_id, SHEET_RANGE)?;
        auth.apply_to_url(&mut url);

        let response = self
            .send_with_retry(|| auth.apply(self.client.get(url.clone())))
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// `{base}/{spreadsheet_id}/values/{range}` with each segment escaped.
    fn range_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| SheetsError::Decode(format!("bad Sheets API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::Decode("Sheets API URL cannot be a base".into()))?
            .pop_if_empty()
            .push(spreadsheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }

    /// Send a request, retrying transport failures and 5xx responses while
    /// the policy allows.
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response, SheetsError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            match build().send().await {
                Ok(response)
                    if RetryPolicy::is_retryable_status(response.status())
                        && self.retry.should_retry(attempt) =>
                {
                    tracing::warn!(
                        attempt,
                        status = response.status().as_u16(),
                        "Sheets API returned a server error, retrying",
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if self.retry.should_retry(attempt) => {
                    tracing::warn!(attempt, error = %e, "Sheets API request failed, retrying");
                }
                Err(e) => return Err(e.into()),
            }
            attempt += 1;
            tokio::time::sleep(self.retry.backoff).await;
        }
    }

    /// Ensure the response has a success status code, converting failures
    /// into [`SheetsError::Api`] with the upstream message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: upstream_error_message(status.as_u16(), &body),
            });
        }
        Ok(response)
    }

    async fn parse_response(response: reqwest::Response) -> Result<Value, SheetsError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| SheetsError::Decode(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<(), SheetsError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Pull `error.message` out of a Google API error body, falling back to
/// `HTTP <status>` when the body is not JSON or carries no message.
pub fn upstream_error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}
