//! Mock implementations for testing.
//!
//! This module provides mock LLM clients, factories and embedders that can be
//! used across different test files without duplication.

use async_trait::async_trait;
use concierge::llm::{LLMClient, LLMClientFactoryTrait, Provider};
use concierge::rag::Embedder;
use concierge::types::{AppError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mock LLM client for testing with configurable responses.
///
/// Every prompt it receives is recorded so tests can assert on what the
/// pipeline sent.
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    fn reply(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.reply(prompt)
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock LLM factory for tests requiring complete isolation from external services.
///
/// This factory always hands out clones of one `MockLLMClient`, so prompts
/// recorded across turns land in the same place.
pub struct MockLLMFactory {
    provider: Provider,
    client: MockLLMClient,
}

impl MockLLMFactory {
    /// Create a new mock factory that returns the given mock client.
    pub fn new(client: MockLLMClient) -> Self {
        Self {
            provider: Provider::Ollama {
                base_url: "http://localhost:11434".to_string(),
                model: "mock".to_string(),
                timeout: Duration::from_secs(1),
            },
            client,
        }
    }
}

#[async_trait]
impl LLMClientFactoryTrait for MockLLMFactory {
    fn default_provider(&self) -> &Provider {
        &self.provider
    }

    async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
        Ok(Box::new(self.client.clone()))
    }
}

/// Deterministic embedder: one axis per keyword, so texts sharing a keyword
/// are close.
///
/// The size of every batch it is asked to embed is recorded, failed calls
/// included.
pub struct MockEmbedder {
    should_fail: bool,
    fail_next: AtomicBool,
    calls: Arc<Mutex<Vec<usize>>>,
}

const KEYWORDS: &[&str] = &[
    "refund", "return", "shipping", "warranty", "coupon", "exchange", "battery", "price",
];

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            fail_next: AtomicBool::new(false),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// Fails the first call, then embeds normally.
    pub fn failing_first() -> Self {
        Self {
            fail_next: AtomicBool::new(true),
            ..Self::new()
        }
    }

    /// Batch sizes seen so far, oldest first.
    pub fn calls(&self) -> Arc<Mutex<Vec<usize>>> {
        self.calls.clone()
    }

    fn vector(text: &str) -> Vec<f32> {
        let text = text.to_lowercase();
        KEYWORDS
            .iter()
            .map(|k| if text.contains(k) { 1.0 } else { 0.01 })
            .collect()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.lock().push(texts.len());
        if self.should_fail || self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::Embedding("Mock embedding failure".to_string()));
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}
