//! Connects, prints a line on `connect`, and prints every `init-connection`
//! payload. The remote side is played by [`MemoryTransport`].
//!
//! ```text
//! RUST_LOG=evlink=debug cargo run --example connect_and_print
//! ```

use std::sync::Arc;
use std::time::Duration;

use evlink::{
    Client, ClientConfig, ConnectionState, HandlerFn, LogWriter, MemoryTransport, Payload,
    Subscribe, lifecycle,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = MemoryTransport::new();
    // The server is still booting for the first attempt.
    server.fail_next_opens(1, "server booting");

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let client = Client::builder(server.clone()).with_subscribers(subs).build();

    client
        .on(lifecycle::CONNECT, HandlerFn::arc(|_: Payload| async {
            println!("I'm connected!");
            Ok(())
        }))
        .await?;
    client
        .on("init-connection", HandlerFn::arc(|data: Payload| async move {
            println!("{data}");
            Ok(())
        }))
        .await?;

    let cfg = ClientConfig {
        backoff: evlink::BackoffPolicy {
            first: Duration::from_millis(200),
            ..Default::default()
        },
        ..ClientConfig::default()
    };
    client.start("mem://localhost:3000", cfg).await?;
    client.wait_for_state(ConnectionState::Connected).await;

    server
        .inject(json!(["init-connection", {"user": "bot-ai", "room": "lobby"}]).to_string())
        .await;

    // Let the handler run before shutting down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.stop().await;
    Ok(())
}
