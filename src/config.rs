use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::services::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::services::PromptStyle;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Without a key only `ping` is offered.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub port: u16,
    pub prompt_style: PromptStyle,
    /// Plain-message commands such as `>ping`; `None` disables them.
    pub command_prefix: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Older deployments export the token as TOKEN
        let discord_token = get("DISCORD_BOT_TOKEN")
            .or_else(|| get("TOKEN"))
            .context("DISCORD_BOT_TOKEN (or TOKEN) must be set")?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let prompt_style = match get("MEAL_PROMPT_STYLE") {
            Some(raw) => raw.parse()?,
            None => PromptStyle::default(),
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be a positive integer, got '{}'", raw))?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            discord_token,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            port,
            prompt_style,
            command_prefix: lookup("COMMAND_PREFIX").filter(|p| !p.is_empty()),
            http_timeout,
        })
    }
}
