use crate::agents::{Agent, Turn};
use crate::api::client::SupportApiClient;
use crate::types::{AppError, Complaint, Intent, Result, SupportApiError};
use async_trait::async_trait;

/// Files a complaint against an order through the support API.
pub struct ComplaintAgent {
    api: SupportApiClient,
}

impl ComplaintAgent {
    pub fn new(api: SupportApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Agent for ComplaintAgent {
    async fn execute(&self, turn: &mut Turn) -> Result<String> {
        let Some(order_id) = turn.order_id.as_deref().filter(|id| !id.trim().is_empty()) else {
            return Ok(
                "Order ID is required to submit a complaint. Please provide a valid order ID."
                    .to_string(),
            );
        };

        let complaint = Complaint {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            issue: turn.message.clone(),
        };

        self.api.create_complaint(&complaint).await?;
        tracing::info!(complaint_id = %complaint.id, order_id, "Complaint filed");

        turn.filed_complaint_id = Some(complaint.id.clone());
        Ok(format!(
            "Complaint submitted successfully. Complaint ID: {}",
            complaint.id
        ))
    }

    fn intent(&self) -> Intent {
        Intent::Complaint
    }

    fn recover(&self, error: &AppError) -> String {
        match error {
            AppError::SupportApi(e @ SupportApiError::Status { .. }) => {
                format!("Error submitting complaint: {}", e)
            }
            AppError::SupportApi(e) => format!("Error connecting to complaint system: {}", e),
            other => format!("Sorry, I encountered an error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_rejected_complaint_reports_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/complaints"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let api = SupportApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let agent = ComplaintAgent::new(api);
        let mut turn = Turn::new("s-1", "my kettle leaks");
        turn.order_id = Some("ORD123".to_string());

        let err = agent.execute(&mut turn).await.unwrap_err();
        assert!(turn.filed_complaint_id.is_none());
        assert_eq!(agent.recover(&err), "Error submitting complaint: 500 - boom");
    }
}
