//! Keyword intent routing.
//!
//! Matching is case-insensitive substring search, evaluated in a fixed order
//! where the first matching rule wins.

use crate::types::Intent;

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Classify a user message into the intent that handles it.
pub fn classify(message: &str) -> Intent {
    let text = message.to_lowercase();

    if contains_any(&text, &["complaint", "complain"]) && contains_any(&text, &["submit", "file"]) {
        Intent::Complaint
    } else if contains_any(&text, &["return", "exchange"])
        && contains_any(&text, &["want", "can i", "how to", "need to"])
    {
        Intent::Complaint
    } else if contains_any(&text, &["track", "status"]) && text.contains("order") {
        Intent::Track
    } else if contains_any(&text, &["escalate", "escalation"]) {
        Intent::Escalate
    } else if contains_any(
        &text,
        &["document", "file", "pdf", "csv", "txt", "upload", "load"],
    ) {
        Intent::Rag
    } else {
        Intent::Faq
    }
}

/// Whether the terminal chat should ask for an order id before handling
/// `message`.
pub fn needs_order_id(message: &str) -> bool {
    let text = message.to_lowercase();

    (text.contains("track") && text.contains("order"))
        || (text.contains("return") && contains_any(&text, &["want", "can i", "need to"]))
        || (text.contains("complaint") && contains_any(&text, &["file", "submit"]))
}

/// What the user wants done with the document Q&A session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentCommand {
    Status,
    Clear,
    Load,
    Ask,
}

impl DocumentCommand {
    pub fn parse(message: &str) -> Self {
        let text = message.to_lowercase();

        if text.contains("document status") || (text.contains("status") && text.contains("document"))
        {
            DocumentCommand::Status
        } else if text.contains("clear document") {
            DocumentCommand::Clear
        } else if contains_any(
            &text,
            &["load document", "upload document", "add document", "new document"],
        ) || (contains_any(&text, &["load", "upload"])
            && contains_any(&text, &["file", "pdf", "csv", "txt"]))
        {
            DocumentCommand::Load
        } else {
            DocumentCommand::Ask
        }
    }
}
