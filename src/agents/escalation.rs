use crate::agents::{Agent, Turn};
use crate::api::client::SupportApiClient;
use crate::types::{AppError, EscalationRequest, Intent, Result, SupportApiError};
use async_trait::async_trait;

/// Escalates the session's active complaint through the support API.
pub struct EscalationAgent {
    api: SupportApiClient,
}

impl EscalationAgent {
    pub fn new(api: SupportApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Agent for EscalationAgent {
    async fn execute(&self, turn: &mut Turn) -> Result<String> {
        let Some(complaint_id) = turn.active_complaint_id.clone() else {
            return Ok("No complaint ID found. Please submit a complaint first.".to_string());
        };

        let request = EscalationRequest {
            id: None,
            complaint_id,
            reason: turn.message.clone(),
        };
        let created = self.api.create_escalation(&request).await?;
        tracing::info!(
            complaint_id = %request.complaint_id,
            escalation_id = %created.escalation_id,
            "Complaint escalated"
        );

        Ok(format!(
            "Complaint escalated successfully! Escalation ID: {}",
            created.escalation_id
        ))
    }

    fn intent(&self) -> Intent {
        Intent::Escalate
    }

    fn recover(&self, error: &AppError) -> String {
        match error {
            AppError::SupportApi(SupportApiError::Status { status, .. }) => {
                format!("Error escalating complaint: {}", status)
            }
            AppError::SupportApi(e) => format!("Error connecting to escalation system: {}", e),
            other => format!("Sorry, I encountered an error: {}", other),
        }
    }
}
