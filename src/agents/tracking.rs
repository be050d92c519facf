use crate::agents::{Agent, Turn};
use crate::api::client::SupportApiClient;
use crate::types::{AppError, Intent, Result, SupportApiError};
use async_trait::async_trait;

/// Looks up order status through the support API.
pub struct TrackingAgent {
    api: SupportApiClient,
}

impl TrackingAgent {
    pub fn new(api: SupportApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Agent for TrackingAgent {
    async fn execute(&self, turn: &mut Turn) -> Result<String> {
        let Some(order_id) = turn.order_id.as_deref().filter(|id| !id.trim().is_empty()) else {
            return Ok(
                "Order ID is required to track an order. Please provide a valid order ID."
                    .to_string(),
            );
        };

        let order = self.api.get_order(order_id).await?;
        Ok(format!(
            "Order Status: {} (estimated delivery: {})",
            order.status, order.estimated_delivery
        ))
    }

    fn intent(&self) -> Intent {
        Intent::Track
    }

    fn recover(&self, error: &AppError) -> String {
        match error {
            AppError::SupportApi(SupportApiError::Status { status, .. }) => {
                format!("Order not found or error: {}", status)
            }
            AppError::SupportApi(e) => {
                format!("Error connecting to order tracking system: {}", e)
            }
            other => format!("Sorry, I encountered an error: {}", other),
        }
    }
}
