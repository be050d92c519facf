use crate::llm::LLMClient;
use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::Embedder;
use crate::rag::index::VectorIndex;
use crate::types::{Result, RetrievedChunk, SourceDocument};
use std::sync::Arc;

const STUFF_INSTRUCTIONS: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Render the "stuff" prompt: every retrieved chunk goes into one completion.
///
/// Context and question are inserted verbatim, so braces in document text
/// are never treated as placeholders.
pub fn build_prompt(question: &str, chunks: &[RetrievedChunk]) -> String {
    let context = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\n{}\n\nQuestion: {}\nHelpful Answer:",
        STUFF_INSTRUCTIONS, context, question
    )
}

/// Retrieval-augmented question answering over one vector index.
pub struct RetrievalQa {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl RetrievalQa {
    pub fn new(index: VectorIndex, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Chunk, embed and index `documents`.
    pub async fn from_documents(
        documents: &[SourceDocument],
        chunker: &TextChunker,
        embedder: Arc<dyn Embedder>,
        top_k: usize,
    ) -> Result<Self> {
        let chunks = chunker.chunk_documents(documents);
        let index = VectorIndex::build(&chunks, embedder.as_ref()).await?;
        Ok(Self::new(index, embedder, top_k))
    }

    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedChunk>> {
        let query = self.embedder.embed(question).await?;
        self.index.search(&query, self.top_k).await
    }

    /// Answer `question` from the top-k chunks.
    pub async fn ask(&self, question: &str, llm: &dyn LLMClient) -> Result<String> {
        let chunks = self.retrieve(question).await?;
        tracing::debug!(retrieved = chunks.len(), model = llm.model_name(), "Answering from context");

        let prompt = build_prompt(question, &chunks);
        let answer = llm.generate(&prompt).await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_joins_context() {
        let chunks = vec![
            RetrievedChunk {
                content: "Returns accepted within 30 days.".to_string(),
                source: "faq.csv".to_string(),
                score: 0.9,
            },
            RetrievedChunk {
                content: "Refunds go to the original payment method.".to_string(),
                source: "faq.csv".to_string(),
                score: 0.8,
            },
        ];

        let prompt = build_prompt("Can I return shoes?", &chunks);
        assert!(prompt.starts_with("Use the following pieces of context"));
        assert!(prompt.contains(
            "Returns accepted within 30 days.\n\nRefunds go to the original payment method."
        ));
        assert!(prompt.ends_with("Question: Can I return shoes?\nHelpful Answer:"));
    }

    #[test]
    fn test_build_prompt_keeps_placeholder_text_in_context() {
        let chunks = vec![RetrievedChunk {
            content: "Literal braces: {question} and {context}".to_string(),
            source: "notes.txt".to_string(),
            score: 1.0,
        }];

        let prompt = build_prompt("SECRET?", &chunks);
        assert!(prompt.contains("Literal braces: {question} and {context}"));
        assert_eq!(prompt.matches("SECRET?").count(), 1);
    }

    #[test]
    fn test_build_prompt_without_context() {
        let prompt = build_prompt("Hello?", &[]);
        assert!(prompt.contains("\n\n\n\nQuestion: Hello?"));
    }
}
