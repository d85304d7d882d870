//! Telegram transport tests against a local mock of the Bot API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use herald_common::types::DispatchOutcome;
use herald_notifier::{ChatTransport, Notifier, NotifierError, TelegramTransport};

const TOKEN: &str = "123:abc";
const CHAT_ID: &str = "4242";

fn transport(server: &MockServer) -> TelegramTransport {
    TelegramTransport::new(server.uri(), TOKEN, CHAT_ID, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_delivers_to_configured_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_json(json!({"chat_id": CHAT_ID, "text": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    transport(&server).deliver("hello").await.unwrap();
}

#[tokio::test]
async fn test_api_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let err = transport(&server).deliver("hello").await.unwrap_err();
    match err {
        NotifierError::Api {
            status,
            description,
        } => {
            assert_eq!(status, 400);
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreadable_reply_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = transport(&server).deliver("hello").await.unwrap_err();
    assert!(matches!(err, NotifierError::Api { status: 502, .. }));
}

#[tokio::test]
async fn test_unreachable_api_does_not_leak_token() {
    let transport = TelegramTransport::new(
        "http://127.0.0.1:1",
        TOKEN,
        CHAT_ID,
        Duration::from_secs(2),
    )
    .unwrap();

    let err = transport.deliver("hello").await.unwrap_err();
    assert!(matches!(err, NotifierError::Request(_)));
    assert!(!err.to_string().contains(TOKEN));
}

#[tokio::test]
async fn test_notifier_over_telegram_reports_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "ok": false,
            "description": "Internal Server Error"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::new(Arc::new(transport(&server)));
    let outcome = notifier.report_failure("boom").await;

    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["text"], "Bot crashed with error: boom");
}
