use crate::api::handlers::{chat, documents, support};
use crate::types::{
    AskDocumentRequest, AskDocumentResponse, ChatRequest, ChatResponse, Complaint,
    ComplaintCreated, DocumentStatus, Escalation, EscalationCreated, EscalationRequest, Intent,
    LoadDocumentRequest, LoadDocumentResponse, Message, MessageResponse, MessageRole, Order,
    OrderResponse, SessionStatus, SummaryResponse,
};
use crate::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Concierge",
        description = "Customer service chatbot and support API"
    ),
    paths(
        support::create_complaint,
        support::get_order,
        support::create_escalation,
        chat::chat,
        chat::get_session,
        chat::clear_session,
        chat::summarize_session,
        documents::document_status,
        documents::load_document,
        documents::upload_document,
        documents::ask_document,
        documents::clear_document,
    ),
    components(schemas(
        Complaint,
        ComplaintCreated,
        Order,
        OrderResponse,
        EscalationRequest,
        Escalation,
        EscalationCreated,
        Intent,
        ChatRequest,
        ChatResponse,
        SessionStatus,
        SummaryResponse,
        Message,
        MessageRole,
        LoadDocumentRequest,
        LoadDocumentResponse,
        DocumentStatus,
        AskDocumentRequest,
        AskDocumentResponse,
        MessageResponse,
    )),
    tags(
        (name = "support", description = "Complaints, orders and escalations"),
        (name = "chat", description = "Chat sessions"),
        (name = "documents", description = "Document Q&A")
    )
)]
pub struct ApiDoc;

/// Routes served under `/api`.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route(
            "/chat/{session_id}",
            get(chat::get_session).delete(chat::clear_session),
        )
        .route("/chat/{session_id}/summary", post(chat::summarize_session))
        .route(
            "/documents",
            get(documents::document_status)
                .post(documents::load_document)
                .delete(documents::clear_document),
        )
        .route("/documents/upload", post(documents::upload_document))
        .route("/documents/ask", post(documents::ask_document))
}

/// Support routes served at the root, matching the paths the chat agents call.
pub fn support_router() -> Router<AppState> {
    Router::new()
        .route("/complaints", post(support::create_complaint))
        .route("/orders/{order_id}", get(support::get_order))
        .route("/escalations", post(support::create_escalation))
}

/// The full application router: support API, `/api`, health and OpenAPI.
pub fn app_router(state: AppState) -> Router {
    let router = Router::<AppState>::new()
        .route("/health", get(|| async { "OK" }))
        .merge(support_router())
        .nest("/api", create_router());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    );

    router.with_state(state)
}
