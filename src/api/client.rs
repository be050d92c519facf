//! HTTP client for the support REST API (`/complaints`, `/orders`, `/escalations`).
//!
//! The chat agents go through this client rather than the in-process store so
//! the terminal chat can talk to a separately running server.

use crate::types::{
    Complaint, ComplaintCreated, EscalationCreated, EscalationRequest, Order, OrderResponse,
    SupportApiError,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

type ApiResult<T> = std::result::Result<T, SupportApiError>;

#[derive(Clone)]
pub struct SupportApiClient {
    client: Client,
    base_url: String,
}

impl SupportApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `POST /complaints`
    pub async fn create_complaint(&self, complaint: &Complaint) -> ApiResult<ComplaintCreated> {
        let response = self
            .client
            .post(format!("{}/complaints", self.base_url))
            .json(complaint)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// `GET /orders/{order_id}`
    pub async fn get_order(&self, order_id: &str) -> ApiResult<Order> {
        let mut url = reqwest::Url::parse(&format!("{}/orders/", self.base_url))
            .map_err(|e| SupportApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SupportApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(order_id);

        let response = self.client.get(url).send().await?;
        let body: OrderResponse = Self::parse(response).await?;
        Ok(body.order)
    }

    /// `POST /escalations`
    pub async fn create_escalation(
        &self,
        request: &EscalationRequest,
    ) -> ApiResult<EscalationCreated> {
        let response = self
            .client
            .post(format!("{}/escalations", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Support API returned an error");
            return Err(SupportApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
