//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework,
//! plus the client the chat agents use to reach the support endpoints.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and OpenAPI document
//! - [`api::client`](crate::api::client) - HTTP client for the support endpoints
//!
//! # API Endpoints
//!
//! ## Support
//! - `POST /complaints` - File a complaint
//! - `GET /orders/{order_id}` - Look up an order
//! - `POST /escalations` - Escalate a complaint
//!
//! ## Chat (`/api/chat`)
//! - `POST /api/chat` - Send a message and receive the assistant's reply
//! - `GET /api/chat/{session_id}` - Session history
//! - `DELETE /api/chat/{session_id}` - Clear a session
//! - `POST /api/chat/{session_id}/summary` - Summarize a session
//!
//! ## Documents (`/api/documents`)
//! - `GET /api/documents` - Loaded document status
//! - `POST /api/documents` - Load a document by path
//! - `POST /api/documents/upload` - Upload and load a document
//! - `POST /api/documents/ask` - Ask about the loaded document
//! - `DELETE /api/documents` - Clear the loaded document
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`. When the
//! `swagger-ui` feature is enabled, interactive documentation is available
//! at `/swagger-ui/`.

/// HTTP client for the support REST API.
pub mod client;
/// JSON extraction with `{"error": ...}` rejections.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
