//! In-memory store behind the support REST API.
//!
//! Holds complaints keyed by their client-supplied id, a fixed set of seeded
//! orders, and the append-only list of escalations. Nothing is persisted.

use crate::types::{AppError, Complaint, Escalation, EscalationRequest, Order, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Orders present at startup: (order id, status, estimated delivery).
pub const SEEDED_ORDERS: &[(&str, &str, &str)] = &[
    ("ORD123", "Shipped", "2025-07-20"),
    ("ORD456", "Processing", "2025-07-25"),
];

pub struct SupportStore {
    complaints: RwLock<HashMap<String, Complaint>>,
    orders: RwLock<HashMap<String, Order>>,
    escalations: RwLock<Vec<Escalation>>,
}

impl Default for SupportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SupportStore {
    /// Create a store seeded with [`SEEDED_ORDERS`].
    pub fn new() -> Self {
        let orders = SEEDED_ORDERS
            .iter()
            .map(|(id, status, delivery)| {
                (
                    id.to_string(),
                    Order {
                        status: status.to_string(),
                        estimated_delivery: delivery.to_string(),
                    },
                )
            })
            .collect();

        Self {
            complaints: RwLock::new(HashMap::new()),
            orders: RwLock::new(orders),
            escalations: RwLock::new(Vec::new()),
        }
    }

    /// Record a complaint. Fails if a complaint with the same id exists.
    pub fn create_complaint(&self, complaint: Complaint) -> Result<String> {
        let mut complaints = self.complaints.write();
        if complaints.contains_key(&complaint.id) {
            return Err(AppError::AlreadyExists("Complaint already exists".to_string()));
        }

        let id = complaint.id.clone();
        complaints.insert(id.clone(), complaint);
        Ok(id)
    }

    pub fn get_complaint(&self, id: &str) -> Option<Complaint> {
        self.complaints.read().get(id).cloned()
    }

    pub fn complaint_count(&self) -> usize {
        self.complaints.read().len()
    }

    pub fn get_order(&self, order_id: &str) -> Result<Order> {
        self.orders
            .read()
            .get(order_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Escalate an existing complaint, assigning a fresh escalation id.
    pub fn create_escalation(&self, request: EscalationRequest) -> Result<Escalation> {
        // Hold the complaints read guard while appending so the complaint
        // cannot be observed missing between the check and the insert.
        let complaints = self.complaints.read();
        if !complaints.contains_key(&request.complaint_id) {
            return Err(AppError::NotFound("Complaint not found".to_string()));
        }

        let escalation = Escalation {
            id: Uuid::new_v4().to_string(),
            complaint_id: request.complaint_id,
            reason: request.reason,
        };
        self.escalations.write().push(escalation.clone());

        Ok(escalation)
    }

    pub fn escalations_for(&self, complaint_id: &str) -> Vec<Escalation> {
        self.escalations
            .read()
            .iter()
            .filter(|e| e.complaint_id == complaint_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(id: &str) -> Complaint {
        Complaint {
            id: id.to_string(),
            order_id: "ORD123".to_string(),
            issue: "Item arrived damaged".to_string(),
        }
    }

    #[test]
    fn test_seeded_orders() {
        let store = SupportStore::new();

        let order = store.get_order("ORD123").unwrap();
        assert_eq!(order.status, "Shipped");
        assert_eq!(order.estimated_delivery, "2025-07-20");

        let order = store.get_order("ORD456").unwrap();
        assert_eq!(order.status, "Processing");
        assert_eq!(order.estimated_delivery, "2025-07-25");
    }

    #[test]
    fn test_unknown_order() {
        let store = SupportStore::new();
        assert!(matches!(store.get_order("ORD999"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_complaint_rejected() {
        let store = SupportStore::new();
        assert_eq!(store.create_complaint(complaint("c-1")).unwrap(), "c-1");

        let result = store.create_complaint(complaint("c-1"));
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
        assert_eq!(store.complaint_count(), 1);
    }

    #[test]
    fn test_escalation_requires_complaint() {
        let store = SupportStore::new();
        let result = store.create_escalation(EscalationRequest {
            id: None,
            complaint_id: "missing".to_string(),
            reason: "No response".to_string(),
        });
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_escalation_overwrites_client_id() {
        let store = SupportStore::new();
        store.create_complaint(complaint("c-2")).unwrap();

        let escalation = store
            .create_escalation(EscalationRequest {
                id: Some("client-chosen".to_string()),
                complaint_id: "c-2".to_string(),
                reason: "Still waiting".to_string(),
            })
            .unwrap();

        assert_ne!(escalation.id, "client-chosen");
        assert!(Uuid::parse_str(&escalation.id).is_ok());
        assert_eq!(store.escalations_for("c-2"), vec![escalation]);
    }
}
