//! OpenAI embedding provider implementation.
//!
//! Thin client around `POST {base}/v1/embeddings`, non-streaming.
//!
//! Constructor validation:
//! - the API key must be non-empty
//! - the endpoint must start with http:// or https://

use crate::config::PopulateConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::PopulateError;

use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI embedding provider (async).
#[derive(Debug)]
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    model: String,
    url_embeddings: String,
}

impl OpenAiEmbedder {
    /// Constructs a new embedder from the run configuration.
    ///
    /// Builds a preconfigured `reqwest::Client` with bearer auth headers and
    /// a request timeout.
    ///
    /// # Errors
    /// Returns `PopulateError::Config` when the API key is empty or the
    /// endpoint scheme is invalid, `PopulateError::Http` when the HTTP
    /// client cannot be built.
    pub fn new(cfg: &PopulateConfig) -> Result<Self, PopulateError> {
        if cfg.openai_api_key.trim().is_empty() {
            return Err(PopulateError::Config("openai_api_key is empty".into()));
        }

        let endpoint = cfg.openai_api_base.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(PopulateError::Config(format!(
                "invalid embeddings endpoint: {endpoint}"
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.openai_api_key))
                .map_err(|e| PopulateError::Config(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        let url_embeddings = format!("{}/v1/embeddings", endpoint.trim_end_matches('/'));

        info!(
            model = %cfg.embedding_model,
            endpoint = %endpoint,
            "OpenAiEmbedder initialized"
        );

        Ok(Self {
            client,
            model: cfg.embedding_model.clone(),
            url_embeddings,
        })
    }

    async fn request_embedding(&self, input: &str) -> Result<Vec<f32>, PopulateError> {
        let body = EmbeddingsRequest {
            model: &self.model,
            input: [input],
        };

        debug!(
            model = %self.model,
            input_len = input.len(),
            "POST {}", self.url_embeddings
        );

        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(%status, %snippet, model = %self.model, "embeddings request failed");
            return Err(PopulateError::Embedding(format!(
                "HTTP {status} from {}: {snippet}",
                self.url_embeddings
            )));
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            PopulateError::Embedding(format!("decode error: {e}; expected `data[0].embedding`"))
        })?;

        let first = out.data.into_iter().next().ok_or_else(|| {
            PopulateError::Embedding("empty `data` in embeddings response".into())
        })?;

        Ok(first.embedding)
    }
}

impl EmbeddingsProvider for OpenAiEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<f32>, PopulateError>> + Send + 'a>,
    > {
        Box::pin(self.request_embedding(text))
    }
}

/// Trims a response body down to a log-friendly snippet.
fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let cut = trimmed
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(MAX);
        format!("{}…", &trimmed[..cut])
    }
}

/// Request body for `/v1/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

/// Response body for `/v1/embeddings` (only the fields we need).
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DistanceKind, PopulateConfig};

    fn test_cfg() -> PopulateConfig {
        PopulateConfig {
            qdrant_url: "http://localhost:6334".into(),
            qdrant_api_key: None,
            collection: "test".into(),
            distance: DistanceKind::Cosine,
            vector_size: 4,
            openai_api_key: "sk-test".into(),
            openai_api_base: "https://api.openai.com".into(),
            embedding_model: "text-embedding-ada-002".into(),
            input_file: "records.json".into(),
            batch_size: None,
        }
    }

    #[test]
    fn constructor_rejects_empty_key() {
        let mut cfg = test_cfg();
        cfg.openai_api_key = "  ".into();
        assert!(matches!(
            OpenAiEmbedder::new(&cfg),
            Err(PopulateError::Config(_))
        ));
    }

    #[test]
    fn constructor_rejects_bad_scheme() {
        let mut cfg = test_cfg();
        cfg.openai_api_base = "ftp://api.openai.com".into();
        assert!(matches!(
            OpenAiEmbedder::new(&cfg),
            Err(PopulateError::Config(_))
        ));
    }

    #[test]
    fn endpoint_url_strips_trailing_slash() {
        let mut cfg = test_cfg();
        cfg.openai_api_base = "https://api.openai.com/".into();
        let e = OpenAiEmbedder::new(&cfg).unwrap();
        assert_eq!(e.url_embeddings, "https://api.openai.com/v1/embeddings");
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(500);
        assert!(make_snippet(&long).chars().count() <= 201);
        assert_eq!(make_snippet(" short "), "short");
    }
}
