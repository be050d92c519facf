use crate::agents::{Agent, Turn};
use crate::rag::FaqKnowledgeBase;
use crate::types::{AppError, Intent, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub const FAQ_FALLBACK: &str = "I'd be happy to help you! I can assist with returns, refunds, shipping, exchanges, coupons, and warranty questions. Please contact customer service at support@company.com for other inquiries.";

/// Answers store policy questions from the FAQ knowledge base.
pub struct FaqAgent {
    knowledge_base: Arc<FaqKnowledgeBase>,
}

impl FaqAgent {
    pub fn new(knowledge_base: Arc<FaqKnowledgeBase>) -> Self {
        Self { knowledge_base }
    }
}

#[async_trait]
impl Agent for FaqAgent {
    async fn execute(&self, turn: &mut Turn) -> Result<String> {
        self.knowledge_base.answer(&turn.message).await
    }

    fn intent(&self) -> Intent {
        Intent::Faq
    }

    fn recover(&self, _error: &AppError) -> String {
        FAQ_FALLBACK.to_string()
    }
}
