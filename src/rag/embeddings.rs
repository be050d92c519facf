//! Dense embeddings served over HTTP.
//!
//! Two backends share one client: Ollama's `/api/embed` endpoint and the
//! OpenAI `/embeddings` endpoint (or any compatible server).

use crate::types::{AppError, Result};
use crate::utils::toml_config::EmbeddingConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Texts sent per embedding request.
const BATCH_SIZE: usize = 32;

/// Turns text into vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Embedding("Empty embedding response".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Backend {
    Ollama,
    OpenAI { api_key: String },
}

/// HTTP embedding client for Ollama or OpenAI-compatible servers.
pub struct HttpEmbedder {
    client: Client,
    backend: Backend,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct OpenAIEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OpenAIEmbedResponse {
    data: Vec<OpenAIEmbedding>,
}

#[derive(Deserialize)]
struct OpenAIEmbedding {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        match config {
            EmbeddingConfig::Ollama {
                base_url,
                model,
                timeout_secs,
            } => Self::build(
                Backend::Ollama,
                base_url,
                model,
                Duration::from_secs(*timeout_secs),
            ),
            EmbeddingConfig::OpenAI {
                api_key_env,
                api_base,
                model,
                timeout_secs,
            } => {
                let api_key = std::env::var(api_key_env).map_err(|_| {
                    AppError::Configuration(format!(
                        "Environment variable '{}' for OpenAI embeddings is not set",
                        api_key_env
                    ))
                })?;
                Self::build(
                    Backend::OpenAI { api_key },
                    api_base,
                    model,
                    Duration::from_secs(*timeout_secs),
                )
            }
        }
    }

    fn build(backend: Backend, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Embedding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            backend,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    async fn embed_ollama(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&OllamaEmbedRequest {
                model: &self.model,
                input: texts,
                truncate: true,
            })
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Ollama embed request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "Ollama embed returned {}: {}",
                status, body
            )));
        }

        let body: OllamaEmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Invalid Ollama embed response: {}", e)))?;
        Ok(body.embeddings)
    }

    async fn embed_openai(&self, api_key: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(api_key)
            .json(&OpenAIEmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("OpenAI embed request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "OpenAI embeddings returned {}: {}",
                status, body
            )));
        }

        let body: OpenAIEmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Invalid OpenAI embed response: {}", e)))?;
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let embedded = match &self.backend {
                Backend::Ollama => self.embed_ollama(batch).await?,
                Backend::OpenAI { api_key } => self.embed_openai(api_key, batch).await?,
            };

            if embedded.len() != batch.len() {
                return Err(AppError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embedded.len()
                )));
            }
            vectors.extend(embedded);
        }

        tracing::debug!(model = %self.model, count = vectors.len(), "Embedded texts");
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn ollama(base_url: &str, model: &str, timeout: Duration) -> Result<HttpEmbedder> {
        HttpEmbedder::build(Backend::Ollama, base_url, model, timeout)
    }

    #[tokio::test]
    async fn test_ollama_embed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_partial_json(json!({"model": "nomic-embed-text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]
            })))
            .mount(&server)
            .await;

        let embedder = ollama(&server.uri(), "nomic-embed-text", TIMEOUT).unwrap();
        let vectors = embedder
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], vec![0.4, 0.5, 0.6]);
    }

    #[tokio::test]
    async fn test_openai_embed_single() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [1.0, 0.0]}]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::build(
            Backend::OpenAI {
                api_key: "sk-test".to_string(),
            },
            &format!("{}/v1", server.uri()),
            "text-embedding-3-small",
            TIMEOUT,
        )
        .unwrap();

        assert_eq!(embedder.embed("hello").await.unwrap(), vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [[0.1]]
            })))
            .mount(&server)
            .await;

        let embedder = ollama(&server.uri(), "nomic-embed-text", TIMEOUT).unwrap();
        let err = embedder
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_embedding_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not found"))
            .mount(&server)
            .await;

        let embedder = ollama(&server.uri(), "missing", TIMEOUT).unwrap();
        let err = embedder.embed("x").await.unwrap_err();
        assert!(err.to_string().contains("model not found"));
    }

    #[tokio::test]
    async fn test_slow_server_hits_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(json!({"embeddings": [[0.1]]})),
            )
            .mount(&server)
            .await;

        let embedder =
            ollama(&server.uri(), "nomic-embed-text", Duration::from_millis(200))
                .unwrap();
        let err = embedder.embed("x").await.unwrap_err();
        assert!(matches!(err, AppError::Embedding(_)));
    }

    #[test]
    fn test_from_config_uses_configured_timeout() {
        let embedder = HttpEmbedder::from_config(&EmbeddingConfig::Ollama {
            base_url: "http://localhost:11434/".to_string(),
            model: "nomic-embed-text".to_string(),
            timeout_secs: 3,
        })
        .unwrap();
        assert_eq!(embedder.base_url, "http://localhost:11434");
        assert_eq!(embedder.backend, Backend::Ollama);
    }
}
