//! Document loaders for CSV, PDF and plain-text files.
//!
//! CSV files yield one [`SourceDocument`] per row, rendered as `header: value`
//! lines. PDF and text files yield a single document with the full text.

use crate::types::{DocumentError, SourceDocument};
use std::path::Path;

/// File types accepted for document Q&A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Csv,
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detect the kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(DocumentKind::Csv),
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("txt") => Ok(DocumentKind::Text),
            _ => Err(DocumentError::UnsupportedType),
        }
    }
}

/// Load a file into source documents.
///
/// This does blocking I/O; async callers should run it on the blocking pool.
pub fn load_document(path: &Path) -> Result<Vec<SourceDocument>, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::FileNotFound(path.display().to_string()));
    }

    let kind = DocumentKind::from_path(path)?;
    let source = path.display().to_string();

    let docs = match kind {
        DocumentKind::Csv => load_csv(path, &source)?,
        DocumentKind::Pdf => load_pdf(path, &source)?,
        DocumentKind::Text => load_text(path, &source)?,
    };

    let docs: Vec<SourceDocument> = docs
        .into_iter()
        .filter(|d| !d.content.trim().is_empty())
        .collect();

    if docs.is_empty() {
        return Err(DocumentError::Empty);
    }

    tracing::debug!(source = %source, documents = docs.len(), ?kind, "Loaded document");
    Ok(docs)
}

fn load_csv(path: &Path, source: &str) -> Result<Vec<SourceDocument>, DocumentError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DocumentError::Load(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| DocumentError::Load(e.to_string()))?
        .clone();

    let mut docs = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DocumentError::Load(e.to_string()))?;
        let content = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        docs.push(SourceDocument {
            content,
            source: source.to_string(),
            row: Some(row),
        });
    }

    Ok(docs)
}

#[cfg(feature = "pdf")]
fn load_pdf(path: &Path, source: &str) -> Result<Vec<SourceDocument>, DocumentError> {
    let content = pdf_extract::extract_text(path).map_err(|e| DocumentError::Load(e.to_string()))?;
    Ok(vec![SourceDocument {
        content,
        source: source.to_string(),
        row: None,
    }])
}

#[cfg(not(feature = "pdf"))]
fn load_pdf(_path: &Path, _source: &str) -> Result<Vec<SourceDocument>, DocumentError> {
    Err(DocumentError::Load(
        "PDF support is not compiled in; enable the 'pdf' feature".to_string(),
    ))
}

fn load_text(path: &Path, source: &str) -> Result<Vec<SourceDocument>, DocumentError> {
    let bytes = std::fs::read(path).map_err(|e| DocumentError::Load(e.to_string()))?;
    Ok(vec![SourceDocument {
        content: String::from_utf8_lossy(&bytes).into_owned(),
        source: source.to_string(),
        row: None,
    }])
}
