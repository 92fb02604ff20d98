// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route assembly and the axum serve loop.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use partyline_chat::{ChatDirectory, ConnectionRegistry, FanoutDispatcher, InboxBuilder};
use partyline_core::error::ChatError;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{handlers, ws};

/// Listen address for the gateway. Mirrors the `[server]` section of
/// `partyline-config` so this crate does not depend on the config crate.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

/// Shared handler state: the chat components plus a little gateway bookkeeping.
#[derive(Clone)]
pub struct GatewayState {
    pub directory: Arc<ChatDirectory>,
    pub fanout: Arc<FanoutDispatcher>,
    pub inbox: Arc<InboxBuilder>,
    pub registry: Arc<ConnectionRegistry>,
    /// Outbound event queue depth for each WebSocket connection.
    pub fanout_buffer: usize,
    /// Set once at construction; `/health` reports uptime relative to it.
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(
        directory: Arc<ChatDirectory>,
        fanout: Arc<FanoutDispatcher>,
        inbox: Arc<InboxBuilder>,
        registry: Arc<ConnectionRegistry>,
        fanout_buffer: usize,
    ) -> Self {
        Self {
            directory,
            fanout,
            inbox,
            registry,
            fanout_buffer,
            started_at: Instant::now(),
        }
    }
}

/// Assembles the full route table over the given state.
pub fn build_router(state: GatewayState) -> Router {
    let api_routes = Router::new()
        .route("/api/chats", post(handlers::post_open_chat))
        .route(
            "/api/chats/{chat_id}/messages",
            post(handlers::post_send_message),
        )
        .route("/api/chats/user/{user_id}", get(handlers::get_user_inbox))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}

/// Binds the listen address and serves REST and WebSocket traffic until the
/// cancellation token fires, then drains in-flight requests and returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), ChatError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ChatError::Internal(format!("failed to bind {addr}: {e}")))?;
    info!(addr = %addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ChatError::Internal(format!("gateway server error: {e}")))?;
    info!("gateway stopped");
    Ok(())
}
