//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the language model behind the
//! FAQ, document Q&A and summarization paths. Provider-specific details stay
//! behind the [`LLMClient`] trait.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`LLMClientFactoryTrait`] - Creates clients; mocked in tests
//! - [`LLMClientFactory`] - Creates clients from the `[llm]` config section
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server
//! - `openai` - OpenAI API and OpenAI-compatible endpoints
//!
//! # Example
//!
//! ```ignore
//! use concierge::llm::{LLMClientFactory, LLMClientFactoryTrait};
//!
//! let factory = LLMClientFactory::from_config(&config.llm)?;
//! let client = factory.create_default().await?;
//! let answer = client.generate("What is your return policy?").await?;
//! ```

/// Core LLM client trait, provider enum and factory.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, LLMClientFactory, LLMClientFactoryTrait, Provider};
