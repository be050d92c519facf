use crate::llm::LLMClientFactoryTrait;
use crate::types::{AppError, Result};
use std::sync::Arc;

/// Summarizes what the user has said in a session.
pub struct Summarizer {
    llm_factory: Arc<dyn LLMClientFactoryTrait>,
}

impl Summarizer {
    pub fn new(llm_factory: Arc<dyn LLMClientFactoryTrait>) -> Self {
        Self { llm_factory }
    }

    pub fn prompt(user_messages: &[String]) -> String {
        format!("Summarize this conversation:\n{}", user_messages.join("\n"))
    }

    pub async fn summarize(&self, user_messages: &[String]) -> Result<String> {
        if user_messages.is_empty() {
            return Err(AppError::InvalidInput(
                "Nothing to summarize yet".to_string(),
            ));
        }

        let llm = self.llm_factory.create_default().await?;
        let summary = llm.generate(&Self::prompt(user_messages)).await?;
        Ok(summary.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_user_messages() {
        let prompt = Summarizer::prompt(&[
            "I want to file a complaint".to_string(),
            "please escalate".to_string(),
        ]);
        assert_eq!(
            prompt,
            "Summarize this conversation:\nI want to file a complaint\nplease escalate"
        );
    }
}
