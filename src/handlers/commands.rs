use std::sync::Arc;
use std::time::Duration;

use crate::error::DownloadError;
use crate::models::{ContentBlock, MealRequest, Prompt};
use crate::services::prompt::{build_prompt, PromptStyle};
use crate::services::{ImageFetcher, ModelGateway};

pub const HELLO_FAILURE_REPLY: &str = "An error occurred while calling the API. Please try again later.";

/// Turns parsed slash commands into reply text. Holds no per-user state, so
/// one instance serves every concurrent invocation.
pub struct CommandHandler {
    fetcher: Arc<dyn ImageFetcher>,
    gateway: Arc<dyn ModelGateway>,
    style: PromptStyle,
}

impl CommandHandler {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        gateway: Arc<dyn ModelGateway>,
        style: PromptStyle,
    ) -> Self {
        Self {
            fetcher,
            gateway,
            style,
        }
    }

    pub async fn hello(&self, prompt: &str) -> String {
        log::info!("💬 /hello prompt: {}", prompt);

        match self.gateway.complete(Prompt::Text(prompt.to_string())).await {
            Ok(text) => {
                log::debug!("📄 Gemini reply preview: {}", preview(&text, 100));
                format!(
                    "**Your prompt:**\n> {}\n\n**Gemini response:**\n{}",
                    prompt, text
                )
            }
            Err(e) => {
                log::error!("❌ /hello model call failed: {:?}", anyhow::Error::from(e));
                HELLO_FAILURE_REPLY.to_string()
            }
        }
    }

    pub async fn meal(&self, request: &MealRequest) -> String {
        if let Err(e) = request.validate() {
            log::info!("🚫 /meal rejected: {}", e);
            return e.to_string();
        }

        match self.analyze_meal(request).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("❌ /meal failed: {:?}", e);
                self.style.failure_reply().to_string()
            }
        }
    }

    async fn analyze_meal(&self, request: &MealRequest) -> anyhow::Result<String> {
        let prompt_text = build_prompt(
            self.style,
            request.description.as_deref(),
            request.images.len(),
        );

        let mut blocks = Vec::with_capacity(request.images.len() + 1);
        blocks.push(ContentBlock::text(prompt_text));

        log::info!("📸 Processing {} images for meal analysis", request.images.len());
        for (i, image) in request.images.iter().enumerate() {
            log::info!("📥 Downloading image {}: {}", i + 1, image.filename);
            let data = self
                .fetcher
                .fetch_as_base64(&image.url)
                .await
                .map_err(|e: DownloadError| {
                    anyhow::Error::from(e).context(format!("image {} ({})", i + 1, image.filename))
                })?;
            blocks.push(ContentBlock::image(image.mime_type(), data));
        }

        let text = self.gateway.complete(Prompt::Blocks(blocks)).await?;
        log::info!("✅ Meal analysis received");
        Ok(text)
    }
}

/// `ping` has no failure path; an unmeasured heartbeat reads as 0ms.
pub fn format_pong(latency: Option<Duration>) -> String {
    let millis = latency
        .map(|l| (l.as_secs_f64() * 1000.0).round() as u64)
        .unwrap_or(0);
    format!("Pong! ({}ms)", millis)
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
