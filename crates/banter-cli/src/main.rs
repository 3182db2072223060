//! banter: terminal chat client.
//!
//! Drives the conversation engine against a running banter-server. One
//! line of input is one turn; slash commands manage chats.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use banter_chat::{
    BackendConfig, ChatService, HttpBackend, Responder, ResponderConfig, SessionStore, TurnError,
};
use banter_common::{ChatId, MessageContent, Role};

#[derive(Parser)]
#[command(name = "banter", about = "Terminal chat client for banter-server")]
struct Args {
    /// Base URL of the chat API server.
    #[arg(long, default_value = "http://localhost:3001")]
    backend: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=warn".into()),
        )
        .init();

    let args = Args::parse();

    let backend = HttpBackend::new(BackendConfig::new(args.backend.clone()));
    let responder = Responder::new(Box::new(backend), ResponderConfig::default());
    let service = ChatService::new(SessionStore::new(), responder);

    let status = HttpBackend::new(BackendConfig::new(args.backend.clone()));
    match status.health().await {
        Ok(health) if health.ollama_running => {
            println!("connected to {} (model: {})", args.backend, health.model);
        }
        Ok(_) => {
            println!(
                "connected to {}, but the model runtime is down - replies will fail",
                args.backend
            );
        }
        Err(_) => {
            println!(
                "warning: no chat server at {} - start banter-server first",
                args.backend
            );
        }
    }
    println!("commands: /new  /chats  /open <n>  /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let _ = stdout.write_all(b"> ").await;
        let _ = stdout.flush().await;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("stdin error: {e}");
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/q" => break,
            "/new" => {
                service.store().deselect_chat().await;
                println!("(new conversation)");
            }
            "/chats" => {
                let chats = service.store().chats().await;
                if chats.is_empty() {
                    println!("(no chats yet)");
                }
                for (i, chat) in chats.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, chat.title);
                }
            }
            _ if input.starts_with("/open") => {
                match parse_open(input, &service.store().chats().await.iter().map(|c| c.id.clone()).collect::<Vec<_>>()) {
                    Some(id) => match service.store().select_chat(&id).await {
                        Ok(()) => print_history(&service, &id).await,
                        Err(e) => println!("error: {e}"),
                    },
                    None => println!("usage: /open <n>  (see /chats)"),
                }
            }
            _ if input.starts_with('/') => {
                println!("unknown command: {input}");
            }
            text => {
                let current = service.store().current().await;
                match service.send(current.as_ref(), text).await {
                    Ok(id) => {
                        let messages = service.store().messages(&id).await;
                        if let Some(reply) = messages.iter().rev().find(|m| m.role == Role::Assistant) {
                            print_content(&reply.content);
                        }
                    }
                    Err(TurnError::ChatBusy(_)) => {
                        println!("(still waiting on the previous reply)");
                    }
                    Err(e) => println!("error: {e}"),
                }
            }
        }
    }
}

fn parse_open(input: &str, ids: &[ChatId]) -> Option<ChatId> {
    let index: usize = input.strip_prefix("/open")?.trim().parse().ok()?;
    ids.get(index.checked_sub(1)?).cloned()
}

async fn print_history(service: &ChatService, id: &ChatId) {
    for message in service.store().messages(id).await {
        match message.role {
            Role::User => print!("you: "),
            Role::Assistant => print!("assistant: "),
        }
        print_content(&message.content);
    }
}

fn print_content(content: &MessageContent) {
    match content {
        MessageContent::Text { value } => println!("{value}"),
        MessageContent::RichPanel { panel_id } => println!("[rich panel: {panel_id}]"),
    }
}
