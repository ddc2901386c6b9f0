//! Liveness endpoint for uptime monitors. It runs on its own OS thread with a
//! private runtime, so it keeps answering while the Discord client blocks
//! `main`. Responses are static: connection state lives inside the bot's
//! event loop and is not observed here.

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;

pub fn create_health_router() -> Router {
    Router::new().route("/", get(health_check).head(health_check_head))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn health_check_head() -> StatusCode {
    StatusCode::OK
}

/// Bind synchronously so a taken port fails startup, then serve on a
/// background thread that is never joined.
pub fn start_health_server(port: u16) -> Result<JoinHandle<()>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .with_context(|| format!("failed to bind health server on {}", addr))?;
    listener.set_nonblocking(true)?;

    let handle = std::thread::Builder::new()
        .name("health-server".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("❌ Health server runtime failed to start: {:?}", e);
                    return;
                }
            };

            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(l) => l,
                    Err(e) => {
                        log::error!("❌ Health server listener error: {:?}", e);
                        return;
                    }
                };
                if let Err(e) = axum::serve(listener, create_health_router()).await {
                    log::error!("❌ Health server stopped: {:?}", e);
                }
            });
        })
        .context("failed to spawn health server thread")?;

    log::info!("🌐 Health check server listening on {}", addr);
    Ok(handle)
}
