use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::models::{ContentBlock, Prompt};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Anything that can turn a prompt into model text.
#[async_trait::async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, prompt: Prompt) -> Result<String, UpstreamError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageData },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl From<ContentBlock> for ContentPart {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => ContentPart::Text { text },
            ContentBlock::Image { mime_type, data } => ContentPart::ImageUrl {
                image_url: ImageData {
                    url: format!("data:{};base64,{}", mime_type, data),
                },
            },
        }
    }
}

impl From<Prompt> for MessageContent {
    fn from(prompt: Prompt) -> Self {
        match prompt {
            Prompt::Text(text) => MessageContent::Text(text),
            Prompt::Blocks(blocks) => {
                MessageContent::Parts(blocks.into_iter().map(ContentPart::from).collect())
            }
        }
    }
}

/// Gemini through its OpenAI-compatible chat-completions endpoint.
pub struct GeminiService {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(api_key: String, model: String, base_url: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, prompt: Prompt) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.into(),
            }],
        }
    }
}

#[async_trait::async_trait]
impl ModelGateway for GeminiService {
    async fn complete(&self, prompt: Prompt) -> Result<String, UpstreamError> {
        let request = self.build_request(prompt);

        log::info!("🤖 Sending request to Gemini with model: {}", self.model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await?;
            log::error!("❌ Gemini API error response ({}): {}", status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&response_text)?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(UpstreamError::EmptyResponse)?;

        log::info!("✅ Received {} chars from Gemini", content.chars().count());
        Ok(content)
    }
}
