use crate::llm::LLMClientFactoryTrait;
use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::Embedder;
use crate::rag::loader;
use crate::rag::qa::RetrievalQa;
use crate::types::{DocumentError, Result};
use crate::utils::ConfigManager;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Store FAQ backed by the CSV at `rag.faq_path`.
///
/// The index is built on the first question and reused afterwards. If the
/// build fails the next question tries again.
pub struct FaqKnowledgeBase {
    config: Arc<ConfigManager>,
    embedder: Arc<dyn Embedder>,
    llm_factory: Arc<dyn LLMClientFactoryTrait>,
    qa: OnceCell<Arc<RetrievalQa>>,
}

impl FaqKnowledgeBase {
    pub fn new(
        config: Arc<ConfigManager>,
        embedder: Arc<dyn Embedder>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
    ) -> Self {
        Self {
            config,
            embedder,
            llm_factory,
            qa: OnceCell::new(),
        }
    }

    pub async fn answer(&self, question: &str) -> Result<String> {
        let qa = self.qa.get_or_try_init(|| self.build()).await?;
        let llm = self.llm_factory.create_default().await?;
        qa.ask(question, llm.as_ref()).await
    }

    async fn build(&self) -> Result<Arc<RetrievalQa>> {
        let rag = self.config.config().rag.clone();
        let path = rag.faq_path.clone();

        let documents = tokio::task::spawn_blocking(move || loader::load_document(&path))
            .await
            .map_err(|e| DocumentError::Load(e.to_string()))??;

        let chunker = TextChunker::new(rag.chunk_size, rag.chunk_overlap)?;
        let qa =
            RetrievalQa::from_documents(&documents, &chunker, self.embedder.clone(), rag.top_k)
                .await?;

        tracing::info!(
            path = %rag.faq_path.display(),
            chunks = qa.chunk_count(),
            "FAQ knowledge base indexed"
        );
        Ok(Arc::new(qa))
    }
}
