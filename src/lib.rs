//! # Concierge - Customer Service Chatbot Server
//!
//! A customer-service assistant that routes each message by keyword to a
//! specialized agent: store FAQ answers, document Q&A, complaint filing,
//! order tracking and complaint escalation. The same server hosts the small
//! support REST API the agents file complaints and escalations against.
//!
//! ## Overview
//!
//! Concierge can be used in two ways:
//!
//! 1. **As a standalone server** - Run `concierge serve`, or `concierge chat`
//!    for an interactive terminal session
//! 2. **As a library** - Build an [`AppState`] and mount [`api::routes::app_router`]
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use concierge::{AppState, ConfigManager, types::ChatRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config_manager = Arc::new(ConfigManager::new("concierge.toml")?);
//!     let state = AppState::from_config(config_manager)?;
//!
//!     let reply = state.engine.run(ChatRequest {
//!         message: "track my order".to_string(),
//!         session_id: None,
//!         order_id: Some("ORD123".to_string()),
//!         document_path: None,
//!     }).await?;
//!     println!("{}", reply.response);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `openai` | OpenAI and OpenAI-compatible APIs (default) |
//! | `pdf` | PDF text extraction for document Q&A (default) |
//! | `swagger-ui` | Interactive API documentation |
//!
//! ## Modules
//!
//! - [`agents`] - Intent router and the per-intent agents
//! - [`api`] - REST API handlers, routes and the support API client
//! - [`db`] - In-memory complaint, order and escalation store
//! - [`llm`] - LLM client implementations
//! - [`memory`] - Chat sessions
//! - [`rag`] - Document loading, embeddings and retrieval QA
//! - [`workflows`] - Intent-to-agent dispatch
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Chat agents and intent routing.
pub mod agents;
/// HTTP API handlers, routes and client.
pub mod api;
/// Terminal interface: argument parsing, output and the chat loop.
pub mod cli;
/// In-memory support data store.
pub mod db;
/// LLM provider clients and abstractions.
pub mod llm;
/// Chat session memory.
pub mod memory;
/// Retrieval Augmented Generation (RAG) components.
pub mod rag;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;
/// Workflow engine for agent dispatch.
pub mod workflows;

// Re-export commonly used types
pub use api::client::SupportApiClient;
pub use db::SupportStore;
pub use llm::{LLMClient, LLMClientFactory, LLMClientFactoryTrait, Provider};
pub use memory::SessionStore;
pub use rag::{DocumentQa, Embedder, FaqKnowledgeBase, HttpEmbedder};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConciergeConfig, ConfigManager};
pub use workflows::WorkflowEngine;

use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration with hot-reload support
    pub config_manager: Arc<ConfigManager>,
    /// Complaints, orders and escalations
    pub store: Arc<SupportStore>,
    /// Chat sessions
    pub sessions: Arc<SessionStore>,
    /// The single loaded document, if any
    pub documents: Arc<DocumentQa>,
    /// Intent dispatch for chat messages
    pub engine: Arc<WorkflowEngine>,
}

impl AppState {
    /// Build the state with providers taken from configuration.
    pub fn from_config(config_manager: Arc<ConfigManager>) -> Result<Self> {
        let config = config_manager.config();
        let llm_factory: Arc<dyn LLMClientFactoryTrait> =
            Arc::new(LLMClientFactory::from_config(&config.llm)?);
        let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::from_config(&config.embeddings)?);

        let provider = llm_factory.default_provider();
        tracing::info!(provider = provider.name(), model = provider.model(), "Using LLM provider");

        Self::with_providers(config_manager, llm_factory, embedder)
    }

    /// Build the state around the given LLM factory and embedder.
    pub fn with_providers(
        config_manager: Arc<ConfigManager>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let config = config_manager.config();

        let support_api = SupportApiClient::new(
            config.support_api.base_url.clone(),
            Duration::from_secs(config.support_api.timeout_secs),
        )
        .map_err(|e| AppError::Configuration(format!("Failed to build support API client: {}", e)))?;

        let sessions = Arc::new(SessionStore::new(
            config.chat.history_window,
            config.chat.max_sessions,
        ));
        let documents = Arc::new(DocumentQa::new(
            config_manager.clone(),
            embedder.clone(),
            llm_factory.clone(),
        ));
        let knowledge_base = Arc::new(FaqKnowledgeBase::new(
            config_manager.clone(),
            embedder,
            llm_factory.clone(),
        ));

        let engine = Arc::new(WorkflowEngine::with_default_agents(
            config_manager.clone(),
            sessions.clone(),
            llm_factory,
            knowledge_base,
            documents.clone(),
            support_api,
        ));

        Ok(Self {
            config_manager,
            store: Arc::new(SupportStore::new()),
            sessions,
            documents,
            engine,
        })
    }
}
