//! Archabot - chat assistant session server
//!
//! A Rust backend driving a single chat session through a pure state
//! machine: login, conversation management and simulated assistant
//! replies, exposed as JSON endpoints plus an SSE stream.

mod api;
mod clock;
mod config;
mod identity;
mod responder;
mod runtime;
mod state_machine;
mod store;

use api::{create_router, AppState};
use clock::SystemClock;
use config::ServerConfig;
use identity::IdentityStore;
use runtime::SessionHandle;
use state_machine::SessionContext;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "archabot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ServerConfig::from_env()?;

    // Start the session runtime
    let identity = IdentityStore::demo();
    tracing::info!(users = identity.user_count(), "Identity store loaded");
    let context = SessionContext::new(identity, config.reply_delay, Arc::new(SystemClock));
    let state = AppState::new(SessionHandle::spawn(context));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("Archabot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
