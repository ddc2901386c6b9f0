mod app;
mod config;
mod discord;
mod error;
mod handlers;
#[cfg(feature = "health-server")]
mod health; // Liveness endpoint for uptime monitors
mod models;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so RUST_LOG from it applies
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("🚀 Starting Lifelog Discord Bot...");

    let config = Config::from_env()?;

    #[cfg(feature = "health-server")]
    {
        log::info!("🌐 Starting health check server on port {}...", config.port);
        health::start_health_server(config.port)?;
    }

    let app = Arc::new(App::from_config(&config)?);
    log::info!(
        "✅ Command table ready: {}",
        app.command_table
            .iter()
            .map(|c| format!("/{}", c.name))
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Some(prefix) = &app.command_prefix {
        log::info!("⌨️ Prefix commands enabled: {}ping", prefix);
    }

    let result = discord::run(&config.discord_token, app).await;
    if let Err(e) = &result {
        log::error!("❌ Discord bot encountered a fatal error: {:?}", e);
    }

    log::info!("🛑 Discord bot is shutting down.");
    result
}
