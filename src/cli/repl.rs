//! Interactive terminal chat.
//!
//! One session is kept for the whole run, so a complaint filed early in the
//! conversation can be escalated later.

use crate::agents::{classify, needs_order_id, DocumentCommand};
use crate::cli::output::Output;
use crate::types::{ChatRequest, Intent};
use crate::workflows::WorkflowEngine;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

const EXIT_WORDS: &[&str] = &["exit", "quit", "bye", "goodbye"];

pub fn is_exit_command(input: &str) -> bool {
    EXIT_WORDS.contains(&input.trim().to_lowercase().as_str())
}

/// The typed order id, or `default` when the user just pressed Enter.
pub fn resolve_order_id(input: &str, default: Option<&str>) -> Option<String> {
    match input.trim() {
        "" => default.map(str::to_string),
        typed => Some(typed.to_string()),
    }
}

fn order_prompt(default: Option<&str>) -> String {
    match default {
        Some(id) => format!("📦 Order ID (press Enter for {}):", id),
        None => "📦 Order ID:".to_string(),
    }
}

fn print_help(output: &Output) {
    output.header("Available services");
    output.list_item("Order tracking: 'track my order' or 'order status'");
    output.list_item("Returns/complaints: 'I want to return' or 'file a complaint'");
    output.list_item(
        "Document Q&A: 'load document', 'ask about document', 'document status', 'clear document'",
    );
    output.list_item("General FAQ: ask any question");
    output.list_item("Escalation: 'escalate my complaint'");
    output.hint("Type 'exit' or 'quit' to stop the chat");
}

/// Run the chat loop on stdin until an exit word or end of input.
pub async fn run(
    engine: &WorkflowEngine,
    output: &Output,
    default_order_id: Option<&str>,
) -> std::io::Result<()> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    run_with(lines, engine, output, default_order_id).await
}

/// Run the chat loop over any line source.
pub async fn run_with<R>(
    mut lines: Lines<R>,
    engine: &WorkflowEngine,
    output: &Output,
    default_order_id: Option<&str>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    output.banner();
    print_help(output);

    let session_id = engine.sessions().get_or_create(None);
    tracing::debug!(session_id = %session_id, "Started terminal chat session");

    loop {
        output.prompt("\n👤 You:");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if is_exit_command(input) {
            output.assistant("Thank you for using our customer service! Have a great day!");
            break;
        }
        if input.is_empty() {
            output.assistant("Please enter your question or concern.");
            continue;
        }

        let mut order_id = None;
        if needs_order_id(input) {
            output.prompt(&order_prompt(default_order_id));
            let typed = lines.next_line().await?.unwrap_or_default();
            order_id = resolve_order_id(&typed, default_order_id);
        }

        let mut document_path = None;
        if classify(input) == Intent::Rag && DocumentCommand::parse(input) == DocumentCommand::Load {
            output.info("Please provide the path to your document (CSV, PDF, or TXT):");
            output.prompt("Enter document path:");
            let typed = lines.next_line().await?.unwrap_or_default();
            let typed = typed.trim();
            if !typed.is_empty() {
                document_path = Some(PathBuf::from(typed));
            }
        }

        output.assistant("Processing your request...");
        let request = ChatRequest {
            message: input.to_string(),
            session_id: Some(session_id.clone()),
            order_id,
            document_path,
        };

        match engine.run(request).await {
            Ok(reply) => output.assistant(&reply.response),
            Err(e) => output.error(&e.to_string()),
        }
    }

    Ok(())
}
