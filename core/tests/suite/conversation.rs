//! End-to-end flows through the controller against a mock endpoint.

use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use showroom_core::ChatController;
use showroom_core::FieldKey;
use showroom_core::FormBlock;
use showroom_core::HttpTransport;
use showroom_core::ProductCatalog;
use showroom_core::ProductField;
use showroom_core::Role;
use showroom_core::ScrollDirective;
use showroom_core::SessionToken;
use showroom_core::SubmitControl;
use showroom_core::TranscriptItem;
use showroom_core::controller::SUBMIT_FAILURE_MESSAGE;
use showroom_core::run_exchange;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

async fn mount_reply(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

fn setup(server: &MockServer) -> (ChatController, HttpTransport) {
    let controller = ChatController::new(SessionToken::generate(), ProductCatalog::default());
    let transport = HttpTransport::new(format!("{}/api/chat", server.uri()), None).unwrap();
    (controller, transport)
}

fn texts(controller: &ChatController) -> Vec<(Role, String)> {
    controller
        .transcript()
        .items()
        .iter()
        .filter_map(TranscriptItem::as_message)
        .map(|(role, text)| (role, text.to_string()))
        .collect()
}

#[tokio::test]
async fn confirm_form_flow_submits_confirmed_payload() {
    let server = MockServer::start().await;
    let (mut controller, transport) = setup(&server);

    mount_reply(
        &server,
        200,
        json!({
            "response": "Got it",
            "show_form": true,
            "state": {"full_name": "Ada", "product_interest": "Velvet Armchair", "quantity": 2},
            "meta": {"form_mode": "confirm"},
        }),
    )
    .await;

    let pending = controller.send_message("I'll take two armchairs").unwrap();
    let result = run_exchange(&transport, &pending).await;
    let outcome = controller.complete_exchange(&pending, result);

    let (_, form_id) = outcome.form.unwrap();
    assert_eq!(outcome.scroll, ScrollDirective::RevealTop(outcome.text_entry.unwrap()));
    assert_eq!(controller.take_scroll(), Some(outcome.scroll));

    let form = controller.transcript().form(form_id).unwrap();
    assert_eq!(form.submit_label(), "Confirm Order");
    assert_eq!(
        form.description().product,
        ProductField::Locked("Velvet Armchair".to_string())
    );

    mount_reply(&server, 200, json!({"response": "Order placed!"})).await;
    let pending = controller.submit_form(form_id).unwrap();
    assert_eq!(
        controller.transcript().form(form_id).map(FormBlock::submit_label),
        Some("Confirmed!")
    );
    let result = run_exchange(&transport, &pending).await;
    controller.complete_exchange(&pending, result);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(body["session_id"], json!(controller.session().as_str()));
    let message = body["message"].as_str().unwrap();
    let encoded = message
        .strip_prefix("Here are my details: ```json")
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap();
    let payload: Value = serde_json::from_str(encoded).unwrap();
    assert_eq!(
        payload,
        json!({
            "full_name": "Ada",
            "email": "",
            "phone": "",
            "address": "",
            "product_interest": "Velvet Armchair",
            "quantity": 2,
            "confirmed": true,
        })
    );

    assert_eq!(
        texts(&controller),
        vec![
            (Role::User, "I'll take two armchairs".to_string()),
            (Role::Bot, "Got it".to_string()),
            (Role::User, "📝 Form Submitted".to_string()),
            (Role::Bot, "Order placed!".to_string()),
        ]
    );
}

#[tokio::test]
async fn rejected_submit_allows_retry() {
    let server = MockServer::start().await;
    let (mut controller, transport) = setup(&server);

    mount_reply(
        &server,
        200,
        json!({"show_form": true, "state": {"product_interest": "Garden Bench"}}),
    )
    .await;
    let pending = controller.send_message("a bench").unwrap();
    let result = run_exchange(&transport, &pending).await;
    let (_, form_id) = controller.complete_exchange(&pending, result).form.unwrap();

    let form = controller.form_mut(form_id).unwrap();
    assert!(!form.is_product_locked());
    assert_eq!(form.value(FieldKey::ProductInterest), "Garden Bench");
    form.set_text(FieldKey::Quantity, "");

    mount_reply(&server, 500, json!({"detail": "Error processing chat message"})).await;
    let pending = controller.submit_form(form_id).unwrap();
    let result = run_exchange(&transport, &pending).await;
    assert!(result.is_err());
    let outcome = controller.complete_exchange(&pending, result);
    assert_eq!(outcome.form, None);
    assert_eq!(outcome.scroll, ScrollDirective::Bottom);

    assert_eq!(
        controller.transcript().form(form_id).map(FormBlock::control),
        Some(SubmitControl::Retry)
    );
    assert_eq!(
        texts(&controller).last(),
        Some(&(Role::Bot, SUBMIT_FAILURE_MESSAGE.to_string()))
    );

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert!(body["message"].as_str().unwrap().contains("\"quantity\":1"));

    mount_reply(&server, 200, json!({"response": "Thanks!"})).await;
    let pending = controller.submit_form(form_id).unwrap();
    let result = run_exchange(&transport, &pending).await;
    controller.complete_exchange(&pending, result);
    assert_eq!(
        texts(&controller).last(),
        Some(&(Role::Bot, "Thanks!".to_string()))
    );
}

#[tokio::test]
async fn server_error_field_is_shown_after_text() {
    let server = MockServer::start().await;
    let (mut controller, transport) = setup(&server);

    mount_reply(
        &server,
        200,
        json!({"response": "Partial answer", "error": "inventory offline"}),
    )
    .await;
    let pending = controller.send_message("stock?").unwrap();
    let result = run_exchange(&transport, &pending).await;
    let outcome = controller.complete_exchange(&pending, result);

    assert_eq!(outcome.scroll, ScrollDirective::Bottom);
    assert_eq!(
        texts(&controller)[1..],
        [
            (Role::Bot, "Partial answer".to_string()),
            (Role::Bot, "Error: inventory offline".to_string()),
        ]
    );
}
