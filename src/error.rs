use thiserror::Error;

/// Input rejected before any network call. `Display` is the user-facing reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("❌ Please provide either a meal description or at least one image.")]
    MissingInput,
    #[error("❌ Unsupported image format: {filename}. Please use JPG, PNG, or WebP.")]
    UnsupportedFormat { filename: String },
    #[error("❌ Too many images: {count}. Please attach at most {max}.")]
    TooManyImages { count: usize, max: usize },
}

/// Failure while downloading an image attachment.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to download image {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to download image")]
    Transport(#[from] reqwest::Error),
}

/// Failure reported by the model provider or the transport in front of it.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("model API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("model API request failed")]
    Transport(#[from] reqwest::Error),
    #[error("model API returned malformed JSON")]
    Decode(#[from] serde_json::Error),
    #[error("model API returned no message content")]
    EmptyResponse,
}
