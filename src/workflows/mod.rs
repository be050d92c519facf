//! Workflow Engine Module
//!
//! A chat turn flows through a fixed pipeline:
//!
//! 1. resolve or create the session
//! 2. classify the message with the keyword router
//! 3. fill in the order id or active complaint id the agent needs
//! 4. run the agent, replacing any failure with the agent's recovery reply
//! 5. record the exchange in the session
//!
//! # Usage
//!
//! ```ignore
//! let engine = WorkflowEngine::with_default_agents(
//!     config_manager, sessions, llm_factory, knowledge_base, documents, support_api,
//! );
//! let reply = engine.run(ChatRequest {
//!     message: "track my order".into(),
//!     session_id: None,
//!     order_id: Some("ORD456".into()),
//!     document_path: None,
//! }).await?;
//! println!("{}", reply.response);
//! ```

pub mod engine;

pub use engine::WorkflowEngine;
