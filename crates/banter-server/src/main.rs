//! banter-server: chat-completion proxy for a local Ollama runtime.
//!
//! The runtime is probed lazily per request; the server itself starts
//! fine with Ollama down.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use banter_server::ollama::{OllamaClient, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use banter_server::routes::{router, AppState};

#[derive(Parser)]
#[command(name = "banter-server", about = "Chat API proxy for a local Ollama runtime")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 3001)]
    port: u16,

    /// Base URL of the Ollama runtime.
    #[arg(long, default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Model name. Falls back to $OLLAMA_MODEL, then the default.
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter_server=info".into()),
        )
        .init();

    let args = Args::parse();
    let model = args
        .model
        .or_else(|| std::env::var("OLLAMA_MODEL").ok())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let state = Arc::new(AppState {
        ollama: OllamaClient::new(args.ollama_url.clone(), model.clone()),
    });

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind TCP listener");

    tracing::info!("banter-server listening on {}", addr);
    tracing::info!(model = %model, ollama = %args.ollama_url, "Using Ollama runtime");

    axum::serve(listener, router(state))
        .await
        .expect("server error");
}
