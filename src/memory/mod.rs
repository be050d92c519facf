//! Chat session memory.
//!
//! Sessions live in process memory only. Each holds a bounded window of
//! recent messages plus the id of the last complaint filed in that session,
//! which is what a later "escalate" message refers to. The number of
//! sessions is capped; the least recently active one is evicted first.

use crate::types::{Message, MessageRole, SessionStatus};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Default number of recent messages kept per session.
pub const DEFAULT_HISTORY_WINDOW: usize = 50;

/// Default number of sessions kept in memory.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
    pub active_complaint_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            active_complaint_id: None,
            created_at: now,
            last_active: now,
        }
    }
}

/// Truncates conversation history to a window of recent messages.
pub fn truncate_history(history: &[Message], window_size: usize) -> Vec<Message> {
    if history.len() <= window_size {
        history.to_vec()
    } else {
        history[history.len() - window_size..].to_vec()
    }
}

/// In-memory store of chat sessions keyed by session id.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    history_window: usize,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_SESSIONS)
    }
}

/// Insert a fresh session, evicting the least recently active one if the
/// store is full.
fn insert_session<'a>(
    sessions: &'a mut HashMap<String, Session>,
    id: &str,
    max_sessions: usize,
) -> &'a mut Session {
    if !sessions.contains_key(id) && sessions.len() >= max_sessions {
        let oldest = sessions
            .values()
            .min_by_key(|s| s.last_active)
            .map(|s| s.id.clone());
        if let Some(oldest) = oldest {
            sessions.remove(&oldest);
            tracing::debug!(session_id = %oldest, "Evicted idle chat session");
        }
    }

    sessions.entry(id.to_string()).or_insert_with(|| {
        tracing::debug!(session_id = %id, "Created chat session");
        Session::new(id.to_string())
    })
}

impl SessionStore {
    pub fn new(history_window: usize, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_window: history_window.max(1),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Return `session_id` if given (creating it when unknown), otherwise a
    /// fresh UUID-keyed session.
    pub fn get_or_create(&self, session_id: Option<&str>) -> String {
        let id = match session_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        insert_session(&mut self.sessions.write(), &id, self.max_sessions);
        id
    }

    pub fn exists(&self, session_id: &str) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    pub fn active_complaint(&self, session_id: &str) -> Option<String> {
        self.sessions
            .read()
            .get(session_id)
            .and_then(|s| s.active_complaint_id.clone())
    }

    /// Append one user/assistant exchange. A filed complaint becomes the
    /// session's active complaint.
    pub fn record_turn(
        &self,
        session_id: &str,
        user: &str,
        assistant: &str,
        complaint_id: Option<&str>,
    ) {
        let mut sessions = self.sessions.write();
        let session = insert_session(&mut sessions, session_id, self.max_sessions);

        session.last_active = Utc::now();
        session.messages.push(Message::user(user));
        session.messages.push(Message::assistant(assistant));
        if session.messages.len() > self.history_window {
            session.messages = truncate_history(&session.messages, self.history_window);
        }

        if let Some(id) = complaint_id {
            session.active_complaint_id = Some(id.to_string());
        }
    }

    /// Contents of the user's messages, oldest first.
    pub fn user_messages(&self, session_id: &str) -> Vec<String> {
        self.sessions
            .read()
            .get(session_id)
            .map(|s| {
                s.messages
                    .iter()
                    .filter(|m| m.role == MessageRole::User)
                    .map(|m| m.content.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn status(&self, session_id: &str) -> Option<SessionStatus> {
        self.sessions.read().get(session_id).map(|s| SessionStatus {
            session_id: s.id.clone(),
            message_count: s.messages.len(),
            active_complaint_id: s.active_complaint_id.clone(),
            messages: s.messages.clone(),
        })
    }

    /// Remove a session. Returns false if it did not exist.
    pub fn clear(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_history() {
        let history: Vec<Message> = (0..5).map(|i| Message::user(i.to_string())).collect();
        let truncated = truncate_history(&history, 2);
        assert_eq!(truncated.len(), 2);
        assert_eq!(truncated[0].content, "3");
        assert_eq!(truncate_history(&history, 10).len(), 5);
    }

    #[test]
    fn test_get_or_create_generates_id() {
        let store = SessionStore::default();
        let id = store.get_or_create(None);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert!(store.exists(&id));

        assert_eq!(store.get_or_create(Some(&id)), id);
        assert_eq!(store.len(), 1);

        assert_eq!(store.get_or_create(Some("custom")), "custom");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_complaint_id_persists_across_turns() {
        let store = SessionStore::default();
        let id = store.get_or_create(None);

        store.record_turn(&id, "I want to file a complaint", "Filed", Some("c-1"));
        store.record_turn(&id, "what is your refund policy", "30 days", None);

        assert_eq!(store.active_complaint(&id).as_deref(), Some("c-1"));
        assert_eq!(
            store.user_messages(&id),
            vec!["I want to file a complaint", "what is your refund policy"]
        );
    }

    #[test]
    fn test_history_window() {
        let store = SessionStore::new(4, DEFAULT_MAX_SESSIONS);
        let id = store.get_or_create(None);
        for i in 0..5 {
            store.record_turn(&id, &format!("q{}", i), &format!("a{}", i), None);
        }

        let status = store.status(&id).unwrap();
        assert_eq!(status.message_count, 4);
        assert_eq!(status.messages[0].content, "q3");
    }

    #[test]
    fn test_clear() {
        let store = SessionStore::default();
        let id = store.get_or_create(None);
        assert!(store.clear(&id));
        assert!(!store.clear(&id));
        assert!(store.status(&id).is_none());
    }

    #[test]
    fn test_least_recently_active_session_evicted_at_capacity() {
        let store = SessionStore::new(DEFAULT_HISTORY_WINDOW, 2);
        store.get_or_create(Some("first"));
        store.get_or_create(Some("second"));
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.record_turn("first", "track my order", "Shipped", None);

        store.get_or_create(Some("third"));

        assert_eq!(store.len(), 2);
        assert!(store.exists("first"));
        assert!(!store.exists("second"));
        assert!(store.exists("third"));

        // Existing sessions never trigger eviction.
        store.get_or_create(Some("third"));
        assert!(store.exists("first"));
    }
}
