//! Chat exchange end to end: surface, HTTP backend and a mock server

mod common;

use common::{chat_reply, FakeBackend};
use parley::backend::HttpBackend;
use parley::chat::ChatSurface;
use parley::config::BackendConfig;
use parley::messages::{Role, NO_RESPONSE_PLACEHOLDER};
use parley::ParleyError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn http_surface(runtime: &Runtime, server: &MockServer) -> ChatSurface {
    let config = BackendConfig {
        base_url: server.uri(),
        ..BackendConfig::default()
    };
    let backend = HttpBackend::new(&config, "file").unwrap();
    ChatSurface::new(Arc::new(backend), runtime.handle().clone(), 4000)
}

#[test]
fn test_send_receives_reply_and_session() {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({
                "message": "Show top 5 leads by score this week",
                "session_id": ""
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Here are the top 5...",
                "session_id": "abc123"
            })))
            .expect(1)
            .mount(&server),
    );

    let mut chat = http_surface(&runtime, &server);
    chat.send("Show top 5 leads by score this week").unwrap();

    // User message is in the log before the reply arrives
    assert_eq!(chat.messages().len(), 1);
    assert_eq!(chat.messages()[0].role, Role::User);
    assert!(chat.is_loading());

    assert!(chat.wait_for_completion(WAIT));

    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[1].role, Role::Assistant);
    assert_eq!(chat.messages()[1].content, "Here are the top 5...");
    assert_eq!(chat.session_id(), Some("abc123"));
    assert!(!chat.is_loading());
}

#[test]
fn test_session_id_sent_until_reset() {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    runtime.block_on(async {
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "first", "session_id": ""})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "one", "session_id": "abc123"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "second", "session_id": "abc123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "two"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "third", "session_id": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
    });

    let mut chat = http_surface(&runtime, &server);

    chat.send("first").unwrap();
    assert!(chat.wait_for_completion(WAIT));
    assert_eq!(chat.messages()[1].content, "one");

    chat.send("second").unwrap();
    assert!(chat.wait_for_completion(WAIT));
    assert_eq!(chat.messages()[3].content, "two");
    assert_eq!(chat.session_id(), Some("abc123"));

    chat.reset();
    assert!(chat.messages().is_empty());
    assert_eq!(chat.session_id(), None);

    chat.send("third").unwrap();
    assert!(chat.wait_for_completion(WAIT));
    assert_eq!(chat.messages()[1].content, NO_RESPONSE_PLACEHOLDER);
}

#[test]
fn test_server_error_becomes_assistant_message() {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server),
    );

    let mut chat = http_surface(&runtime, &server);
    chat.send("hello").unwrap();
    assert!(chat.wait_for_completion(WAIT));

    assert_eq!(
        chat.messages()[1].content,
        "Sorry, I encountered an error: HTTP error! status: 500. Please try again."
    );
    assert!(!chat.is_loading());
}

#[test]
fn test_network_error_keeps_session() {
    let runtime = Runtime::new().unwrap();
    let backend = FakeBackend::new();
    backend.push_chat(Ok(chat_reply("hi there", Some("abc123"))));
    backend.push_chat(Err(ParleyError::HttpError("Failed to fetch".to_string())));

    let mut chat = ChatSurface::new(backend.clone(), runtime.handle().clone(), 4000);

    chat.send("hello").unwrap();
    assert!(chat.wait_for_completion(WAIT));

    chat.send("again").unwrap();
    assert!(chat.wait_for_completion(WAIT));

    let last = chat.messages().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.contains("Failed to fetch"));
    assert_eq!(chat.session_id(), Some("abc123"));
    assert!(!chat.is_loading());
    assert_eq!(backend.chat_requests.lock()[1].session_id, "abc123");
}

#[test]
fn test_unreachable_backend_reports_error() {
    let runtime = Runtime::new().unwrap();
    let config = BackendConfig {
        // Nothing listens on the discard port
        base_url: "http://127.0.0.1:9".to_string(),
        ..BackendConfig::default()
    };
    let backend = HttpBackend::new(&config, "file").unwrap();
    let mut chat = ChatSurface::new(Arc::new(backend), runtime.handle().clone(), 4000);

    chat.send("anyone there?").unwrap();
    assert!(chat.wait_for_completion(Duration::from_secs(30)));

    let last = chat.messages().last().unwrap();
    assert!(last.content.starts_with("Sorry, I encountered an error: "));
    assert!(!chat.is_loading());
}

#[test]
fn test_rejected_input_is_not_sent() {
    let runtime = Runtime::new().unwrap();
    let backend = FakeBackend::new();
    let mut chat = ChatSurface::new(backend.clone(), runtime.handle().clone(), 4000);

    assert_eq!(chat.send("   "), Err(ParleyError::EmptyMessage));
    assert_eq!(
        chat.send(&"x".repeat(4001)),
        Err(ParleyError::MessageTooLong { max: 4000 })
    );
    assert!(chat.messages().is_empty());
    assert!(!chat.wait_for_completion(Duration::from_millis(100)));
    assert!(backend.chat_requests.lock().is_empty());
}

#[test]
fn test_reply_after_reset_is_dropped() {
    let runtime = Runtime::new().unwrap();
    let backend = FakeBackend::new();
    backend.push_chat(Ok(chat_reply("late", Some("zzz"))));
    let mut chat = ChatSurface::new(backend, runtime.handle().clone(), 4000);

    chat.send("hello").unwrap();
    chat.reset();

    assert!(!chat.wait_for_completion(WAIT));
    assert!(chat.messages().is_empty());
    assert_eq!(chat.session_id(), None);
    assert!(!chat.is_loading());
}
