use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::handlers::{command_table, CommandHandler, CommandSpec};
use crate::services::{GeminiService, HttpImageFetcher};

/// Everything the event handler needs, built once in `main`.
pub struct App {
    /// `None` when no model API key is configured.
    pub commands: Option<CommandHandler>,
    pub command_table: Vec<CommandSpec>,
    pub command_prefix: Option<String>,
}

impl App {
    pub fn from_config(config: &Config) -> Result<Self> {
        let commands = match &config.gemini_api_key {
            Some(api_key) => {
                let client = reqwest::Client::builder()
                    .timeout(config.http_timeout)
                    .build()
                    .context("failed to build HTTP client")?;

                let gemini = GeminiService::new(
                    api_key.clone(),
                    config.gemini_model.clone(),
                    config.gemini_base_url.clone(),
                    client.clone(),
                );
                log::info!("✅ Gemini service initialized with model: {}", config.gemini_model);

                Some(CommandHandler::new(
                    Arc::new(HttpImageFetcher::new(client)),
                    Arc::new(gemini),
                    config.prompt_style,
                ))
            }
            None => {
                log::warn!("⚠️ GEMINI_API_KEY not set, only /ping will be available");
                None
            }
        };

        Ok(Self {
            command_table: command_table(commands.is_some()),
            commands,
            command_prefix: config.command_prefix.clone(),
        })
    }
}
