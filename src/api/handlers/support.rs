//! Support REST API: complaints, order lookup and escalations.

use crate::{
    api::extract::AppJson,
    types::{
        Complaint, ComplaintCreated, EscalationCreated, EscalationRequest, OrderResponse, Result,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// File a complaint
#[utoipa::path(
    post,
    path = "/complaints",
    request_body = Complaint,
    responses(
        (status = 200, description = "Complaint created", body = ComplaintCreated),
        (status = 400, description = "Complaint already exists")
    ),
    tag = "support"
)]
pub async fn create_complaint(
    State(state): State<AppState>,
    AppJson(complaint): AppJson<Complaint>,
) -> Result<Json<ComplaintCreated>> {
    let complaint_id = state.store.create_complaint(complaint)?;

    Ok(Json(ComplaintCreated {
        message: "Complaint created successfully".to_string(),
        complaint_id,
    }))
}

/// Look up an order
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found")
    ),
    tag = "support"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>> {
    let order = state.store.get_order(&order_id)?;
    Ok(Json(OrderResponse { order }))
}

/// Escalate an existing complaint
#[utoipa::path(
    post,
    path = "/escalations",
    request_body = EscalationRequest,
    responses(
        (status = 200, description = "Escalation created", body = EscalationCreated),
        (status = 404, description = "Complaint not found")
    ),
    tag = "support"
)]
pub async fn create_escalation(
    State(state): State<AppState>,
    AppJson(request): AppJson<EscalationRequest>,
) -> Result<Json<EscalationCreated>> {
    let escalation = state.store.create_escalation(request)?;
    tracing::info!(
        escalation_id = %escalation.id,
        complaint_id = %escalation.complaint_id,
        "Escalation created"
    );

    Ok(Json(EscalationCreated {
        message: "Escalation created successfully".to_string(),
        escalation_id: escalation.id,
    }))
}
