//! Document Q&A handlers.
//!
//! One document is loaded per server. Each upload is written to its own
//! scratch directory under `server.upload_dir` (the system temp directory
//! when unset) so the original file name survives. The directory is removed
//! once the document has been indexed, whether or not loading succeeded.

use crate::{
    api::extract::AppJson,
    types::{
        AppError, AskDocumentRequest, AskDocumentResponse, DocumentStatus, LoadDocumentRequest,
        LoadDocumentResponse, MessageResponse, Result,
    },
    AppState,
};
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Current document status
#[utoipa::path(
    get,
    path = "/api/documents",
    responses(
        (status = 200, description = "Document status", body = DocumentStatus)
    ),
    tag = "documents"
)]
pub async fn document_status(State(state): State<AppState>) -> Json<DocumentStatus> {
    Json(state.documents.status())
}

/// Load a document from a path on the server
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = LoadDocumentRequest,
    responses(
        (status = 200, description = "Document loaded", body = LoadDocumentResponse),
        (status = 400, description = "Unsupported or empty document"),
        (status = 404, description = "File not found")
    ),
    tag = "documents"
)]
pub async fn load_document(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoadDocumentRequest>,
) -> Result<Json<LoadDocumentResponse>> {
    let loaded = state.documents.load(&payload.path).await?;
    Ok(Json(loaded))
}

/// Upload and load a document
#[utoipa::path(
    post,
    path = "/api/documents/upload",
    request_body(content_type = "multipart/form-data", description = "A `file` field with a CSV, PDF or TXT document"),
    responses(
        (status = 200, description = "Document loaded", body = LoadDocumentResponse),
        (status = 400, description = "Missing file or unsupported type")
    ),
    tag = "documents"
)]
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LoadDocumentResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .and_then(|name| Path::new(name).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::InvalidInput("Uploaded file has no name".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;

        let upload_dir = state.config_manager.config().server.upload_dir.clone();
        let (scratch, path) = save_upload(upload_dir, &file_name, &bytes).await?;
        tracing::info!(file = %file_name, bytes = bytes.len(), "Document uploaded");

        let loaded = state.documents.load(&path).await;
        if let Err(e) = scratch.close() {
            tracing::warn!(error = %e, "Failed to remove upload scratch directory");
        }
        return Ok(Json(loaded?));
    }

    Err(AppError::InvalidInput(
        "Multipart field 'file' is required".to_string(),
    ))
}

async fn save_upload(
    upload_dir: Option<PathBuf>,
    file_name: &str,
    bytes: &[u8],
) -> Result<(TempDir, PathBuf)> {
    let parent = upload_dir.unwrap_or_else(std::env::temp_dir);
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;

    let scratch = tempfile::Builder::new()
        .prefix("concierge-upload-")
        .tempdir_in(&parent)
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;

    let path = scratch.path().join(file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save upload: {}", e)))?;
    Ok((scratch, path))
}

/// Ask a question about the loaded document
#[utoipa::path(
    post,
    path = "/api/documents/ask",
    request_body = AskDocumentRequest,
    responses(
        (status = 200, description = "Answer", body = AskDocumentResponse),
        (status = 400, description = "No document loaded or empty question")
    ),
    tag = "documents"
)]
pub async fn ask_document(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AskDocumentRequest>,
) -> Result<Json<AskDocumentResponse>> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(AppError::InvalidInput(
            "Question cannot be empty".to_string(),
        ));
    }

    let answer = state.documents.ask(question).await?;
    Ok(Json(AskDocumentResponse { answer }))
}

/// Clear the loaded document
#[utoipa::path(
    delete,
    path = "/api/documents",
    responses(
        (status = 200, description = "Document cleared", body = MessageResponse)
    ),
    tag = "documents"
)]
pub async fn clear_document(State(state): State<AppState>) -> Json<MessageResponse> {
    state.documents.clear();
    Json(MessageResponse {
        message: "Document cleared.".to_string(),
    })
}
