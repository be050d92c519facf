//! Workflow Engine
//!
//! Routes each chat message to the agent registered for its intent and keeps
//! the session up to date.

use crate::agents::{
    classify, Agent, ComplaintAgent, DocumentAgent, EscalationAgent, FaqAgent, Summarizer,
    TrackingAgent, Turn,
};
use crate::api::client::SupportApiClient;
use crate::llm::LLMClientFactoryTrait;
use crate::memory::SessionStore;
use crate::rag::{DocumentQa, FaqKnowledgeBase};
use crate::types::{AppError, ChatRequest, ChatResponse, Intent, Result};
use crate::utils::ConfigManager;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Dispatch table from intent to agent.
pub struct WorkflowEngine {
    agents: HashMap<Intent, Arc<dyn Agent>>,
    sessions: Arc<SessionStore>,
    summarizer: Summarizer,
    config: Arc<ConfigManager>,
}

impl WorkflowEngine {
    /// Create an engine with no agents registered.
    pub fn new(
        config: Arc<ConfigManager>,
        sessions: Arc<SessionStore>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
    ) -> Self {
        Self {
            agents: HashMap::new(),
            sessions,
            summarizer: Summarizer::new(llm_factory),
            config,
        }
    }

    /// Create an engine with the standard agent for every intent.
    pub fn with_default_agents(
        config: Arc<ConfigManager>,
        sessions: Arc<SessionStore>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
        knowledge_base: Arc<FaqKnowledgeBase>,
        documents: Arc<DocumentQa>,
        support_api: SupportApiClient,
    ) -> Self {
        Self::new(config, sessions, llm_factory)
            .register(Arc::new(FaqAgent::new(knowledge_base)))
            .register(Arc::new(DocumentAgent::new(documents)))
            .register(Arc::new(ComplaintAgent::new(support_api.clone())))
            .register(Arc::new(TrackingAgent::new(support_api.clone())))
            .register(Arc::new(EscalationAgent::new(support_api)))
    }

    /// Register an agent for its intent, replacing any previous one.
    pub fn register(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(agent.intent(), agent);
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Handle one chat message end to end.
    pub async fn run(&self, request: ChatRequest) -> Result<ChatResponse> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
        }

        let started = Instant::now();
        let session_id = self.sessions.get_or_create(request.session_id.as_deref());
        let intent = classify(message);

        let agent = self.agents.get(&intent).cloned().ok_or_else(|| {
            AppError::Internal(format!("No agent registered for intent '{}'", intent))
        })?;

        let mut turn = Turn::new(session_id.clone(), message);
        turn.document_path = request.document_path;
        match intent {
            Intent::Complaint | Intent::Track => {
                turn.order_id = request
                    .order_id
                    .filter(|id| !id.trim().is_empty())
                    .or_else(|| self.config.config().chat.default_order_id.clone());
            }
            Intent::Escalate => {
                turn.active_complaint_id = self.sessions.active_complaint(&session_id);
            }
            Intent::Faq | Intent::Rag => {}
        }

        let response = match agent.execute(&mut turn).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(%intent, session_id = %session_id, error = %e, "Agent failed, sending recovery reply");
                agent.recover(&e)
            }
        };

        self.sessions.record_turn(
            &session_id,
            message,
            &response,
            turn.filed_complaint_id.as_deref(),
        );

        tracing::info!(
            %intent,
            session_id = %session_id,
            duration_ms = started.elapsed().as_millis() as u64,
            "Chat turn handled"
        );

        Ok(ChatResponse {
            response,
            intent,
            session_id,
            complaint_id: turn.filed_complaint_id,
        })
    }

    /// Summarize the user's side of a session.
    pub async fn summarize(&self, session_id: &str) -> Result<String> {
        if !self.sessions.exists(session_id) {
            return Err(AppError::NotFound(format!(
                "Session '{}' not found",
                session_id
            )));
        }
        let messages = self.sessions.user_messages(session_id);
        self.summarizer.summarize(&messages).await
    }
}
