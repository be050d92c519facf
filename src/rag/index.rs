//! In-memory vector index over document chunks, backed by `ares-vector`.

use crate::rag::chunker::Chunk;
use crate::rag::embeddings::Embedder;
use crate::types::{AppError, DocumentError, Result, RetrievedChunk};
use ares_vector::types::MetadataValue;
use ares_vector::{Config, DistanceMetric, VectorDb, VectorMetadata};

const COLLECTION: &str = "chunks";

/// A searchable set of embedded chunks.
///
/// Each index owns its own in-memory database, so replacing a document
/// means building a new index and dropping the old one.
pub struct VectorIndex {
    db: VectorDb,
    len: usize,
}

impl VectorIndex {
    /// Embed `chunks` and insert them into a fresh index.
    pub async fn build(chunks: &[Chunk], embedder: &dyn Embedder) -> Result<Self> {
        if chunks.is_empty() {
            return Err(DocumentError::Empty.into());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let dimensions = embeddings
            .first()
            .map(Vec::len)
            .filter(|d| *d > 0)
            .ok_or_else(|| AppError::Embedding("Embedding model returned no vectors".to_string()))?;

        let db = VectorDb::open(Config::memory())
            .await
            .map_err(|e| AppError::Internal(format!("Failed to open vector index: {}", e)))?;
        db.create_collection(COLLECTION, dimensions, DistanceMetric::Cosine)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create collection: {}", e)))?;

        let ids: Vec<String> = (0..chunks.len()).map(|i| format!("chunk-{}", i)).collect();
        let entries = ids
            .iter()
            .zip(chunks)
            .zip(&embeddings)
            .map(|((id, chunk), embedding)| {
                let meta = VectorMetadata::from_pairs([
                    ("content", MetadataValue::String(chunk.content.clone())),
                    ("source", MetadataValue::String(chunk.source.clone())),
                ]);
                (id.as_str(), embedding.as_slice(), Some(meta))
            });

        let len = db
            .insert_batch(COLLECTION, entries)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to index chunks: {}", e)))?;

        tracing::debug!(chunks = len, dimensions, "Built vector index");
        Ok(Self { db, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the `k` chunks most similar to `query`, best first.
    pub async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        let results = self
            .db
            .search(COLLECTION, query, k)
            .await
            .map_err(|e| AppError::Internal(format!("Search failed: {}", e)))?;

        let mut chunks: Vec<RetrievedChunk> = results
            .into_iter()
            .filter_map(|result| {
                let meta = result.metadata?;
                Some(RetrievedChunk {
                    content: meta.get_string("content")?.to_string(),
                    source: meta.get_string("source").unwrap_or_default().to_string(),
                    score: result.score,
                })
            })
            .collect();

        chunks.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(chunks)
    }
}
