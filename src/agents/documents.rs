use crate::agents::{Agent, DocumentCommand, Turn};
use crate::rag::DocumentQa;
use crate::types::{AppError, DocumentError, Intent, Result};
use async_trait::async_trait;
use std::sync::Arc;

const LOAD_HINT: &str =
    "To load a document, say 'load document' or mention a file type (PDF, CSV, TXT).";

/// Loads, inspects, clears and answers questions about the user's document.
pub struct DocumentAgent {
    documents: Arc<DocumentQa>,
}

impl DocumentAgent {
    pub fn new(documents: Arc<DocumentQa>) -> Self {
        Self { documents }
    }

    fn status_message(&self) -> String {
        match self.documents.status().current_document {
            Some(name) => format!(
                "📄 Currently loaded document: {}\nYou can ask any questions about this document!",
                name
            ),
            None => "📄 No document is currently loaded. Use 'load document' to load a new document."
                .to_string(),
        }
    }

    async fn load(&self, turn: &Turn) -> Result<String> {
        let Some(path) = turn.document_path.as_ref() else {
            return Ok(
                "Please provide the path to your document (CSV, PDF, or TXT).".to_string(),
            );
        };

        match self.documents.load(path).await {
            Ok(loaded) => Ok(loaded.message),
            Err(AppError::Document(e)) => Ok(e.to_string()),
            Err(e) => Err(e),
        }
    }

    /// Answers always come back as a reply; failures carry the load hint.
    async fn ask(&self, question: &str) -> String {
        match self.documents.ask(question).await {
            Ok(answer) => answer,
            Err(AppError::Document(DocumentError::NotLoaded)) => {
                format!("{}\n\n{}", DocumentError::NotLoaded, LOAD_HINT)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Document question failed");
                format!("Error processing question: {}\n\n{}", e, LOAD_HINT)
            }
        }
    }
}

#[async_trait]
impl Agent for DocumentAgent {
    async fn execute(&self, turn: &mut Turn) -> Result<String> {
        let command = DocumentCommand::parse(&turn.message);
        tracing::debug!(?command, session_id = %turn.session_id, "Document command");

        match command {
            DocumentCommand::Status => Ok(self.status_message()),
            DocumentCommand::Clear => {
                self.documents.clear();
                Ok("Document cleared.".to_string())
            }
            DocumentCommand::Load => self.load(turn).await,
            DocumentCommand::Ask => Ok(self.ask(&turn.message).await),
        }
    }

    fn intent(&self) -> Intent {
        Intent::Rag
    }
}
