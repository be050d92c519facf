//! Retrieval Augmented Generation (RAG) Pipeline
//!
//! Answers questions from the store FAQ and from a user-supplied document.
//!
//! # Module Structure
//!
//! - [`loader`] - CSV, PDF and text loaders
//! - [`chunker`] - Character chunking with overlap
//! - [`embeddings`] - HTTP embedding clients (Ollama, OpenAI-compatible)
//! - [`index`] - In-memory HNSW index built on `ares-vector`
//! - [`qa`] - Retrieve top-k chunks and "stuff" them into one prompt
//! - [`knowledge_base`] - The FAQ index, built once per process
//! - [`document_qa`] - Load, query and clear a single document
//!
//! # Pipeline
//!
//! 1. **Loading** - A file becomes one or more source documents
//! 2. **Chunking** - Documents are split into overlapping chunks
//! 3. **Indexing** - Chunks are embedded and stored in a vector index
//! 4. **Retrieval** - The question is embedded and the top-k chunks fetched
//! 5. **Generation** - The LLM answers from the retrieved context
//!
//! # Example
//!
//! ```ignore
//! use concierge::rag::DocumentQa;
//!
//! let documents = DocumentQa::new(config_manager, embedder, llm_factory);
//! documents.load("manuals/warranty.pdf").await?;
//! let answer = documents.ask("How long is the warranty?").await?;
//! ```

pub mod chunker;
pub mod document_qa;
pub mod embeddings;
pub mod index;
pub mod knowledge_base;
pub mod loader;
pub mod qa;

pub use document_qa::DocumentQa;
pub use embeddings::{Embedder, HttpEmbedder};
pub use knowledge_base::FaqKnowledgeBase;
pub use qa::RetrievalQa;
