//! Chat agents, one per [`Intent`], plus the keyword router and a summarizer.
//!
//! Agents never surface errors to the user directly. The workflow engine
//! turns an `Err` from [`Agent::execute`] into the agent's
//! [`Agent::recover`] message.

pub mod complaint;
pub mod documents;
pub mod escalation;
pub mod faq;
pub mod router;
pub mod summarizer;
pub mod tracking;

use crate::types::{AppError, Intent, Result};
use async_trait::async_trait;
use std::path::PathBuf;

pub use complaint::ComplaintAgent;
pub use documents::DocumentAgent;
pub use escalation::EscalationAgent;
pub use faq::FaqAgent;
pub use router::{classify, needs_order_id, DocumentCommand};
pub use summarizer::Summarizer;
pub use tracking::TrackingAgent;

/// Everything an agent sees for one user message.
#[derive(Debug, Clone, Default)]
pub struct Turn {
    pub session_id: String,
    pub message: String,
    pub order_id: Option<String>,
    /// Complaint filed earlier in this session
    pub active_complaint_id: Option<String>,
    /// File to load when the message asks to load a document
    pub document_path: Option<PathBuf>,
    /// Set by the complaint agent when a complaint was filed
    pub filed_complaint_id: Option<String>,
}

impl Turn {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
            ..Default::default()
        }
    }
}

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Handle one message and produce the reply text.
    async fn execute(&self, turn: &mut Turn) -> Result<String>;

    /// The intent this agent serves.
    fn intent(&self) -> Intent;

    /// Reply shown to the user when `execute` fails.
    fn recover(&self, error: &AppError) -> String {
        format!("Sorry, I encountered an error: {}", error)
    }
}
