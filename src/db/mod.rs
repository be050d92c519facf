//! Storage for the support REST API.
//!
//! Complaints, orders and escalations live in process memory only.

pub mod support_store;

pub use support_store::{SupportStore, SEEDED_ORDERS};
