use crate::llm::LLMClientFactoryTrait;
use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::Embedder;
use crate::rag::loader;
use crate::rag::qa::RetrievalQa;
use crate::types::{AppError, DocumentError, DocumentStatus, LoadDocumentResponse, Result};
use crate::utils::ConfigManager;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct LoadedDocument {
    path: PathBuf,
    qa: Arc<RetrievalQa>,
}

impl LoadedDocument {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Question answering over a single user-supplied document.
///
/// At most one document is loaded at a time. A failed load leaves the
/// previously loaded document in place.
pub struct DocumentQa {
    config: Arc<ConfigManager>,
    embedder: Arc<dyn Embedder>,
    llm_factory: Arc<dyn LLMClientFactoryTrait>,
    current: RwLock<Option<LoadedDocument>>,
}

impl DocumentQa {
    pub fn new(
        config: Arc<ConfigManager>,
        embedder: Arc<dyn Embedder>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
    ) -> Self {
        Self {
            config,
            embedder,
            llm_factory,
            current: RwLock::new(None),
        }
    }

    /// Load, chunk and index the file at `path`, replacing any loaded document.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<LoadDocumentResponse> {
        let path = path.as_ref().to_path_buf();
        let rag = self.config.config().rag.clone();

        let load_path = path.clone();
        let documents = tokio::task::spawn_blocking(move || loader::load_document(&load_path))
            .await
            .map_err(|e| DocumentError::Load(e.to_string()))??;

        let chunker = TextChunker::new(rag.chunk_size, rag.chunk_overlap)?;
        let qa = RetrievalQa::from_documents(&documents, &chunker, self.embedder.clone(), rag.top_k)
            .await
            .map_err(|e| match e {
                AppError::Document(inner) => AppError::Document(inner),
                other => DocumentError::Load(other.to_string()).into(),
            })?;
        let chunks = qa.chunk_count();

        let loaded = LoadedDocument {
            path: path.clone(),
            qa: Arc::new(qa),
        };
        let name = loaded.name();
        *self.current.write() = Some(loaded);

        tracing::info!(document = %path.display(), chunks, "Document loaded");
        Ok(LoadDocumentResponse {
            message: format!("Document '{}' loaded successfully!", name),
            document: path.display().to_string(),
            chunks,
        })
    }

    /// Answer a question from the loaded document.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let qa = self
            .current
            .read()
            .as_ref()
            .map(|doc| doc.qa.clone())
            .ok_or(DocumentError::NotLoaded)?;

        let llm = self.llm_factory.create_default().await?;
        qa.ask(question, llm.as_ref()).await
    }

    pub fn status(&self) -> DocumentStatus {
        let current = self.current.read();
        DocumentStatus {
            is_loaded: current.is_some(),
            current_document: current.as_ref().map(LoadedDocument::name),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn clear(&self) {
        if let Some(doc) = self.current.write().take() {
            tracing::info!(document = %doc.path.display(), "Document cleared");
        }
    }
}
