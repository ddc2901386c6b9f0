use base64::{engine::general_purpose, Engine};

use crate::error::DownloadError;

/// Downloads attachments so they can be inlined into a model request.
#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_as_base64(&self, url: &str) -> Result<String, DownloadError>;
}

pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_as_base64(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            log::warn!("⚠️ Image download returned HTTP {}: {}", status, url);
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let encoded = general_purpose::STANDARD.encode(&bytes);
        log::debug!("📊 Downloaded {} bytes ({} base64)", bytes.len(), encoded.len());

        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_encodes_body() {
        let base = serve(Router::new().route("/meal.png", get(|| async { "hello" }))).await;
        let fetcher = HttpImageFetcher::new(reqwest::Client::new());

        let encoded = fetcher.fetch_as_base64(&format!("{}/meal.png", base)).await.unwrap();

        assert_eq!(encoded, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_200() {
        let base = serve(Router::new().route(
            "/gone.png",
            get(|| async { (StatusCode::NOT_FOUND, "missing") }),
        ))
        .await;
        let fetcher = HttpImageFetcher::new(reqwest::Client::new());

        let err = fetcher
            .fetch_as_base64(&format!("{}/gone.png", base))
            .await
            .unwrap_err();

        match err {
            DownloadError::Status { status, .. } => assert_eq!(status, 404),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_treats_other_success_codes_as_failure() {
        let base = serve(Router::new().route(
            "/empty.png",
            get(|| async { StatusCode::NO_CONTENT }),
        ))
        .await;
        let fetcher = HttpImageFetcher::new(reqwest::Client::new());

        let err = fetcher
            .fetch_as_base64(&format!("{}/empty.png", base))
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Status { status: 204, .. }));
    }
}
