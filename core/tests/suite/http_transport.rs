use pretty_assertions::assert_eq;
use serde_json::json;
use showroom_core::ChatRequest;
use showroom_core::ChatTransport;
use showroom_core::FormMode;
use showroom_core::HttpTransport;
use showroom_core::TransportError;
use std::time::Duration;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        session_id: "sess_abc123xyz".to_string(),
    }
}

fn transport(server: &MockServer, timeout: Option<Duration>) -> HttpTransport {
    HttpTransport::new(format!("{}/api/chat", server.uri()), timeout).unwrap()
}

#[tokio::test]
async fn posts_message_and_session_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "do you have sofas?",
            "session_id": "sess_abc123xyz",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "We have **The Cloud Sofa**.",
            "show_form": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = transport(&server, None)
        .exchange(&request("do you have sofas?"))
        .await
        .unwrap();
    assert_eq!(reply.response.as_deref(), Some("We have **The Cloud Sofa**."));
    assert!(!reply.wants_form());
}

#[tokio::test]
async fn form_reply_carries_prefill_and_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Got it",
            "show_form": true,
            "state": {
                "full_name": "Ada Lovelace",
                "email": "ada@example.com",
                "product_interest": "Velvet Armchair",
                "quantity": "2",
            },
            "meta": {"form_mode": "confirm"},
            "should_submit": true,
        })))
        .mount(&server)
        .await;

    let reply = transport(&server, None)
        .exchange(&request("yes please"))
        .await
        .unwrap();
    assert!(reply.wants_form());
    assert_eq!(reply.form_mode(), FormMode::Confirm);
    let prefill = reply.prefill();
    assert_eq!(prefill.full_name, "Ada Lovelace");
    assert_eq!(prefill.phone, "");
    assert_eq!(prefill.quantity, 2);
}

#[tokio::test]
async fn non_success_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(r#"{"detail":"Error processing chat message"}"#),
        )
        .mount(&server)
        .await;

    let err = transport(&server, None)
        .exchange(&request("hi"))
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Error processing chat message"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = transport(&server, None)
        .exchange(&request("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn slow_server_hits_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = transport(&server, Some(Duration::from_millis(50)))
        .exchange(&request("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(ref e) if e.is_timeout()), "{err:?}");
}
