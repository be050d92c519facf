//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Chat session handlers.
pub mod chat;
/// Document Q&A handlers.
pub mod documents;
/// Complaint, order and escalation handlers.
pub mod support;
