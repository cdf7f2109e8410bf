//! HTTP-Level Snippet Tests
//!
//! Drives `POST /api/channel-talk/snippet` through the full router: init and
//! submit rendering, side effects, and the signing policy.
//!
//! Run with: `cargo test --test snippet_http_test`

mod helpers;

use axum::http::StatusCode;
use ct_callbacks::config::Config;
use ct_callbacks::hooks::Order;
use helpers::{expect_json, Call, RecordingHooks, TestApp};
use serde_json::{json, Value};

const SNIPPET: &str = "/api/channel-talk/snippet";

fn init_body() -> Value {
    json!({
        "user": {"id": "u1", "profile": {"name": "Kim"}},
        "userChat": {"id": "c1"},
        "channel": {"id": "ch1"},
        "snippet": {"id": "s1", "name": "n"}
    })
}

fn submit_body(component_id: &str, submit: Option<Value>) -> Value {
    let mut body = init_body();
    body["componentId"] = json!(component_id);
    if let Some(submit) = submit {
        body["submit"] = submit;
    }
    body
}

fn blocks(json: &Value) -> &[Value] {
    json["blocks"].as_array().unwrap()
}

fn orders() -> Vec<Order> {
    ["ORD-3", "ORD-1", "ORD-2"]
        .iter()
        .map(|id| Order {
            id: (*id).to_string(),
            product: format!("product {id}"),
            status: "완료".into(),
            date: "2024-01-20".into(),
        })
        .collect()
}

#[tokio::test]
async fn init_renders_main_view() {
    let app = TestApp::new();
    let resp = app.post_snippet(init_body().to_string().as_bytes()).await;
    let json = expect_json(resp, StatusCode::OK).await;

    assert_eq!(json["version"], "2");
    let blocks = blocks(&json);
    assert_eq!(blocks.len(), 12);
    assert_eq!(
        blocks[0],
        json!({"type": "text", "value": "Kim님 정보", "style": {"bold": true, "size": "large"}})
    );
    assert!(blocks.contains(&json!({"type": "label", "title": "고객 ID", "value": "u1"})));
    assert_eq!(
        blocks[10],
        json!({"type": "textInput", "id": "memo-input", "placeholder": "고객 메모 입력..."})
    );
    assert!(app.hooks.calls().is_empty());
}

#[tokio::test]
async fn main_view_is_byte_identical_across_requests() {
    let app = TestApp::new();
    let body = init_body().to_string();
    let first = expect_json(app.post_snippet(body.as_bytes()).await, StatusCode::OK).await;
    let second = expect_json(app.post_snippet(body.as_bytes()).await, StatusCode::OK).await;
    assert_eq!(
        serde_json::to_vec(&first["blocks"]).unwrap(),
        serde_json::to_vec(&second["blocks"]).unwrap()
    );
}

#[tokio::test]
async fn view_orders_renders_each_order_in_upstream_order() {
    let app = TestApp::with(
        Config::default_for_test(),
        RecordingHooks::new().with_orders(orders()),
    );
    let resp = app
        .post_snippet(submit_body("view-orders", None).to_string().as_bytes())
        .await;
    let json = expect_json(resp, StatusCode::OK).await;
    let blocks = blocks(&json);

    let dividers = blocks.iter().filter(|b| b["type"] == "divider").count();
    assert_eq!(dividers, 1 + 3);
    let titles: Vec<_> = blocks
        .iter()
        .filter(|b| b["type"] == "label" && b["title"] != "상태")
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["ORD-3", "ORD-1", "ORD-2"]);
    assert_eq!(
        blocks.last().unwrap(),
        &json!({"type": "button", "id": "back-to-main", "label": "← 돌아가기", "style": "default"})
    );
    assert_eq!(app.hooks.calls(), [Call::Orders("u1".into())]);
}

#[tokio::test]
async fn issue_coupon_yields_distinct_codes() {
    let app = TestApp::new();
    let body = submit_body("issue-coupon", None).to_string();

    let mut codes = Vec::new();
    for _ in 0..2 {
        let json = expect_json(app.post_snippet(body.as_bytes()).await, StatusCode::OK).await;
        let code = blocks(&json)
            .iter()
            .find(|b| b["title"] == "쿠폰 코드")
            .map(|b| b["value"].clone())
            .unwrap();
        codes.push(code);
    }
    assert_ne!(codes[0], codes[1]);
}

#[tokio::test]
async fn save_memo_persists_and_echoes() {
    let app = TestApp::new();
    let body = submit_body("save-memo", Some(json!({"memo-input": "VIP 고객"})));
    let json = expect_json(
        app.post_snippet(body.to_string().as_bytes()).await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(
        blocks(&json)[1],
        json!({"type": "label", "title": "내용", "value": "VIP 고객"})
    );
    assert_eq!(
        app.hooks.calls(),
        [Call::Memo("u1".into(), "VIP 고객".into())]
    );
}

#[tokio::test]
async fn save_memo_without_input_shows_empty_marker() {
    let app = TestApp::new();
    let body = submit_body("save-memo", None);
    let json = expect_json(
        app.post_snippet(body.to_string().as_bytes()).await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(blocks(&json)[1]["value"], "(빈 메모)");
    assert_eq!(app.hooks.calls(), [Call::Memo("u1".into(), String::new())]);
}

#[tokio::test]
async fn back_and_unknown_components_render_main() {
    let app = TestApp::new();
    for component in ["back-to-main", "does-not-exist"] {
        let json = expect_json(
            app.post_snippet(submit_body(component, None).to_string().as_bytes())
                .await,
            StatusCode::OK,
        )
        .await;
        assert_eq!(blocks(&json)[0]["value"], "Kim님 정보");
        assert_eq!(blocks(&json).len(), 12);
    }
}

#[tokio::test]
async fn hook_failure_is_generic_500() {
    let app = TestApp::with(
        Config::default_for_test(),
        RecordingHooks::new().failing("issue_coupon"),
    );
    let resp = app
        .post_snippet(submit_body("issue-coupon", None).to_string().as_bytes())
        .await;
    let json = expect_json(resp, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(json, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn bad_signature_is_rejected() {
    let app = TestApp::new();
    let resp = app
        .post(SNIPPET, init_body().to_string().as_bytes(), Some("00ff"))
        .await;
    let json = expect_json(resp, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json, json!({"error": "Invalid signature"}));
}

#[tokio::test]
async fn malformed_request_is_bad_request() {
    let app = TestApp::new();
    let resp = app.post_snippet(br#"{"user":{"id":"u1"}}"#).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_token_fails_closed_by_default() {
    let config = Config {
        snippet_token: None,
        ..Config::default_for_test()
    };
    let app = TestApp::with(config, RecordingHooks::new());
    let resp = app
        .post(SNIPPET, init_body().to_string().as_bytes(), None)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_token_fails_open_when_unsigned_allowed() {
    let config = Config {
        snippet_token: None,
        snippet_allow_unsigned: true,
        ..Config::default_for_test()
    };
    let app = TestApp::with(config, RecordingHooks::new());
    let resp = app
        .post(SNIPPET, init_body().to_string().as_bytes(), None)
        .await;
    let json = expect_json(resp, StatusCode::OK).await;
    assert_eq!(json["version"], "2");
}

#[tokio::test]
async fn configured_token_is_enforced_even_when_unsigned_allowed() {
    let config = Config {
        snippet_allow_unsigned: true,
        ..Config::default_for_test()
    };
    let app = TestApp::with(config, RecordingHooks::new());
    let resp = app
        .post(SNIPPET, init_body().to_string().as_bytes(), None)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
