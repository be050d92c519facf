use crate::types::{AppError, Result, SourceDocument};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

/// A piece of a source document sized for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    pub source: String,
}

/// Character-based chunker with overlap.
pub struct TextChunker {
    splitter: TextSplitter<Characters>,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| AppError::Configuration(format!("Invalid chunk settings: {}", e)))?;

        Ok(Self {
            splitter: TextSplitter::new(config),
        })
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.splitter.chunks(text).map(str::to_string).collect()
    }

    pub fn chunk_documents(&self, documents: &[SourceDocument]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| {
                self.chunk(&doc.content).into_iter().map(|content| Chunk {
                    content,
                    source: doc.source.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        let chunks = chunker.chunk("Shipping takes 3-5 business days.");
        assert_eq!(chunks, vec!["Shipping takes 3-5 business days.".to_string()]);
    }

    #[test]
    fn test_long_text_respects_chunk_size() {
        let chunker = TextChunker::new(100, 20).unwrap();
        let text = "Our warranty covers manufacturing defects. ".repeat(20);
        let chunks = chunker.chunk(&text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        assert!(TextChunker::new(100, 100).is_err());
    }

    #[test]
    fn test_chunk_documents_keeps_source() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        let docs = vec![
            SourceDocument {
                content: "question: a\nanswer: b".to_string(),
                source: "faq.csv".to_string(),
                row: Some(0),
            },
            SourceDocument {
                content: "question: c\nanswer: d".to_string(),
                source: "faq.csv".to_string(),
                row: Some(1),
            },
        ];

        let chunks = chunker.chunk_documents(&docs);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.source == "faq.csv"));
    }
}
