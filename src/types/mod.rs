use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

// ============= Support API Types =============

/// A customer complaint filed against an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Complaint {
    /// Client-supplied complaint identifier
    pub id: String,
    pub order_id: String,
    pub issue: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplaintCreated {
    pub message: String,
    pub complaint_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Order {
    pub status: String,
    pub estimated_delivery: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub order: Order,
}

/// Escalation request. Any client-supplied `id` is replaced by the server.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EscalationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub complaint_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Escalation {
    pub id: String,
    pub complaint_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EscalationCreated {
    pub message: String,
    pub escalation_id: String,
}

// ============= Chat Types =============

/// Classified purpose of a user message.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Faq,
    Rag,
    Complaint,
    Track,
    Escalate,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Faq => "faq",
            Intent::Rag => "rag",
            Intent::Complaint => "complaint",
            Intent::Track => "track",
            Intent::Escalate => "escalate",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Path of a document to load when the message asks to load one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub document_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    pub intent: Intent,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStatus {
    pub session_id: String,
    pub message_count: usize,
    pub active_complaint_id: Option<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub session_id: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

// ============= Document Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoadDocumentRequest {
    #[schema(value_type = String)]
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoadDocumentResponse {
    pub message: String,
    pub document: String,
    pub chunks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DocumentStatus {
    pub is_loaded: bool,
    pub current_document: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskDocumentRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskDocumentResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// A unit of text produced by a loader, before chunking.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub content: String,
    pub source: String,
    /// Row number for CSV sources
    pub row: Option<usize>,
}

/// A chunk returned by vector retrieval.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub content: String,
    pub source: String,
    pub score: f32,
}

// ============= Error Types =============

/// Document loading and question-answering failures.
///
/// The display strings are shown to chat users verbatim.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type. Please provide a CSV, PDF, or TXT file.")]
    UnsupportedType,

    #[error("The document appears to be empty or couldn't be loaded.")]
    Empty,

    #[error("No document loaded. Please load a document first.")]
    NotLoaded,

    #[error("Error loading document: {0}")]
    Load(String),
}

/// Failures talking to the support REST API.
#[derive(Debug, thiserror::Error)]
pub enum SupportApiError {
    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid support API URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Support API error: {0}")]
    SupportApi(#[from] SupportApiError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::LLM(_) | AppError::Embedding(_) | AppError::SupportApi(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Document(DocumentError::FileNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Document(DocumentError::Load(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Document(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match self {
            AppError::NotFound(msg) | AppError::InvalidInput(msg) => msg,
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
