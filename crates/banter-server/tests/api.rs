//! End-to-end tests: real client crate against a real server instance,
//! with the model runtime deliberately absent.

use std::sync::Arc;
use std::time::Duration;

use banter_chat::{
    BackendConfig, ChatService, CompletionBackend, HttpBackend, Responder, ResponderConfig,
    SessionStore,
};
use banter_common::{Role, WireMessage};
use banter_server::ollama::OllamaClient;
use banter_server::routes::{router, AppState};

/// Start a server on an ephemeral port, pointed at a port where nothing
/// listens, so every completion hits the unreachable-runtime path.
async fn spawn_server_with_dead_runtime() -> String {
    let dead = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_port = dead.local_addr().unwrap().port();
    drop(dead);

    let state = Arc::new(AppState {
        ollama: OllamaClient::new(format!("http://127.0.0.1:{dead_port}"), "llama3.1:8b"),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn completion_soft_error_reaches_the_client_as_content() {
    let base_url = spawn_server_with_dead_runtime().await;
    let backend = HttpBackend::new(BackendConfig::new(base_url));

    let reply = backend
        .complete(&[WireMessage {
            role: Role::User,
            content: "hello".into(),
        }])
        .await
        .unwrap();

    assert!(reply.content.contains("ollama serve"), "got: {}", reply.content);
}

#[tokio::test]
async fn health_round_trips_through_the_client() {
    let base_url = spawn_server_with_dead_runtime().await;
    let backend = HttpBackend::new(BackendConfig::new(base_url));

    let health = backend.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.service, "banter-server");
    assert_eq!(health.provider, "ollama");
    assert!(!health.ollama_running);
    assert!(health.available_models.is_empty());
}

#[tokio::test]
async fn full_turn_ends_with_a_readable_reply() {
    let base_url = spawn_server_with_dead_runtime().await;
    let backend = HttpBackend::new(BackendConfig::new(base_url));
    let responder = Responder::new(
        Box::new(backend),
        ResponderConfig {
            panel_delay: Duration::ZERO,
            response_timeout: Duration::from_secs(10),
        },
    );
    let service = ChatService::new(SessionStore::new(), responder);

    let id = service.send(None, "Hello").await.unwrap();

    let messages = service.store().messages(&id).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    // The server's operator hint arrives verbatim, rendered like a reply.
    let text = messages[1].content.as_text().unwrap();
    assert!(text.contains("ollama serve"), "got: {text}");
}
