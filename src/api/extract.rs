//! Request extractors whose rejections render as `{"error": ...}` bodies.

use crate::types::AppError;
use axum::extract::{rejection::JsonRejection, FromRequest};

/// `axum::Json` with rejections reported through [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}
