pub mod gemini; // Gemini chat completions (OpenAI-compatible)
pub mod image_fetcher;
pub mod prompt;

pub use gemini::{GeminiService, ModelGateway};
pub use image_fetcher::{HttpImageFetcher, ImageFetcher};
pub use prompt::PromptStyle;
