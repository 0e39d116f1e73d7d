//! Integration tests for the `/api/sheets` relay endpoint.

mod common;

use axum::body::Body;
use axum::http::{Method, StatusCode};
use checkout_sheets::testing::FakeSheets;
use common::{
    assert_cors_headers, body_bytes, body_json, build_test_app, offline_app, post_json, send,
    test_config, SPREADSHEET_ID,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Preflight and CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn options_returns_200_with_empty_body_and_cors_headers() {
    let response = send(offline_app(), Method::OPTIONS, "/api/sheets", Body::empty()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn options_short_circuits_even_with_garbage_body() {
    let response = send(
        offline_app(),
        Method::OPTIONS,
        "/api/sheets",
        Body::from("{not json"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

// ---------------------------------------------------------------------------
// Validation (400)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_spreadsheet_id_returns_400_for_append_and_read() {
    for body in [
        json!({"action": "append", "data": ["a", "b", "c", "d", "e"]}),
        json!({"action": "read"}),
    ] {
        let response = post_json(offline_app(), "/api/sheets", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors_headers(&response);
        assert_eq!(
            body_json(response).await,
            json!({"error": "spreadsheetId is required"})
        );
    }
}

#[tokio::test]
async fn falsy_spreadsheet_id_returns_400() {
    for id in [json!(""), json!(0), json!(false), json!(null)] {
        let response = post_json(
            offline_app(),
            "/api/sheets",
            json!({"action": "read", "spreadsheetId": id}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "spreadsheetId is required"})
        );
    }
}

#[tokio::test]
async fn append_without_data_returns_400() {
    let fake = FakeSheets::spawn().await.unwrap();
    let response = post_json(
        build_test_app(test_config(&fake)),
        "/api/sheets",
        json!({"action": "append", "spreadsheetId": SPREADSHEET_ID}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "data is required for append action"})
    );
    assert!(fake.rows(SPREADSHEET_ID).is_empty());
}

#[tokio::test]
async fn unknown_action_returns_400_after_token_exchange() {
    let fake = FakeSheets::spawn().await.unwrap();
    let response = post_json(
        build_test_app(test_config(&fake)),
        "/api/sheets",
        json!({"action": "delete", "spreadsheetId": SPREADSHEET_ID}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid action"}));
    assert_eq!(fake.tokens_issued(), 1);
}

#[tokio::test]
async fn non_string_action_returns_400() {
    let fake = FakeSheets::spawn().await.unwrap();
    for action in [json!(5), json!(true), json!(["read"]), json!({"name": "read"})] {
        let response = post_json(
            build_test_app(test_config(&fake)),
            "/api/sheets",
            json!({"action": action, "spreadsheetId": SPREADSHEET_ID}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid action"}));
    }
}

#[tokio::test]
async fn get_without_body_fails_validation() {
    let response = send(offline_app(), Method::GET, "/api/sheets", Body::empty()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "spreadsheetId is required"})
    );
}

// ---------------------------------------------------------------------------
// Internal failures (500)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_credentials_return_500_with_message() {
    let response = post_json(
        offline_app(),
        "/api/sheets",
        json!({"action": "read", "spreadsheetId": SPREADSHEET_ID}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    assert_eq!(
        body_json(response).await,
        json!({"error": "GOOGLE_SERVICE_ACCOUNT environment variable not set"})
    );
}

#[tokio::test]
async fn missing_credentials_take_precedence_over_action_checks() {
    for body in [
        json!({"action": "delete", "spreadsheetId": "s1"}),
        json!({"action": "append", "spreadsheetId": "s1"}),
        json!({"action": 5, "spreadsheetId": "s1"}),
    ] {
        let response = post_json(offline_app(), "/api/sheets", body).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "GOOGLE_SERVICE_ACCOUNT environment variable not set"})
        );
    }
}

#[tokio::test]
async fn malformed_json_returns_500() {
    let response = send(
        offline_app(),
        Method::POST,
        "/api/sheets",
        Body::from("{\"action\": "),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn upstream_error_message_is_relayed_on_append() {
    let fake = FakeSheets::spawn().await.unwrap();
    fake.fail_next(
        429,
        json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}),
    );
    let app = build_test_app(test_config(&fake));

    let response = post_json(
        app,
        "/api/sheets",
        json!({
            "action": "append",
            "spreadsheetId": SPREADSHEET_ID,
            "data": ["Alice", "Google Pixel", "PX-1", "t0", "checked-out"],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    assert_eq!(body_json(response).await, json!({"error": "Quota exceeded"}));
    assert!(fake.rows(SPREADSHEET_ID).is_empty());
}

#[tokio::test]
async fn stalled_upstream_times_out_with_error_body() {
    // Accepts connections and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let stalled_url = format!("http://{}/token", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let fake = FakeSheets::spawn().await.unwrap();
    let mut config = test_config(&fake);
    config.request_timeout_secs = 1;
    config.sheets.token_url = Some(stalled_url);

    let response = post_json(
        build_test_app(config),
        "/api/sheets",
        json!({"action": "read", "spreadsheetId": SPREADSHEET_ID}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Request timed out after 1s"})
    );
}

#[tokio::test]
async fn upstream_error_without_message_falls_back_to_status() {
    let fake = FakeSheets::spawn().await.unwrap();
    fake.fail_next(503, json!("unavailable"));
    let app = build_test_app(test_config(&fake));

    let response = post_json(
        app,
        "/api/sheets",
        json!({"action": "read", "spreadsheetId": SPREADSHEET_ID}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"error": "HTTP 503"}));
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn append_writes_row_in_column_order() {
    let fake = FakeSheets::spawn().await.unwrap();
    let app = build_test_app(test_config(&fake));

    let response = post_json(
        app,
        "/api/sheets",
        json!({
            "action": "append",
            "spreadsheetId": SPREADSHEET_ID,
            "data": ["Alice", "Google Pixel", "PX-1", "2024-03-01T09:15:00.000Z", "checked-out"],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert_eq!(body_json(response).await, json!({"success": true}));

    assert_eq!(
        fake.rows(SPREADSHEET_ID),
        vec![json!([
            "Alice",
            "Google Pixel",
            "PX-1",
            "2024-03-01T09:15:00.000Z",
            "checked-out"
        ])]
    );
    assert_eq!(fake.tokens_issued(), 1);
    assert_eq!(fake.last_auth().as_deref(), Some("Bearer fake-token-1"));
}

#[tokio::test]
async fn read_passes_upstream_body_through() {
    let fake = FakeSheets::spawn().await.unwrap();
    fake.seed(
        SPREADSHEET_ID,
        vec![
            json!(["Name", "Device", "ID", "Time", "Status"]),
            json!(["Bob", "Mac Mini", 42, "t1", "checked-in"]),
        ],
    );
    let app = build_test_app(test_config(&fake));

    let response = post_json(
        app,
        "/api/sheets",
        json!({"action": "read", "spreadsheetId": SPREADSHEET_ID}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "range": "Sheet1!A1:E2",
            "majorDimension": "ROWS",
            "values": [
                ["Name", "Device", "ID", "Time", "Status"],
                ["Bob", "Mac Mini", 42, "t1", "checked-in"],
            ],
        })
    );
}

#[tokio::test]
async fn every_request_fetches_a_fresh_token() {
    let fake = FakeSheets::spawn().await.unwrap();
    let config = test_config(&fake);

    for _ in 0..3 {
        let response = post_json(
            build_test_app(config.clone()),
            "/api/sheets",
            json!({"action": "read", "spreadsheetId": SPREADSHEET_ID}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(fake.tokens_issued(), 3);
}

#[tokio::test]
async fn rejected_assertion_surfaces_token_error() {
    let fake = FakeSheets::spawn().await.unwrap();
    let mut config = test_config(&fake);
    // The assertion is addressed to the override URL, which the fake token
    // endpoint does not accept as its audience.
    config.sheets.token_url = Some(format!("{}?aud=mismatch", fake.token_url()));
    let app = build_test_app(config);

    let response = post_json(
        app,
        "/api/sheets",
        json!({"action": "read", "spreadsheetId": SPREADSHEET_ID}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Invalid JWT Signature."})
    );
    assert_eq!(fake.tokens_issued(), 0);
}
