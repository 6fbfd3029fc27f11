//! In-memory, concurrency-safe mapping from request-id to pending review
//! state. The only mutable shared resource in the engine — everything goes
//! through the mutex. No eviction, no TTL: entries live until reconciled.

use std::collections::HashMap;
use std::sync::Mutex;

use leafline_core::model::PendingReview;

#[derive(Default)]
pub struct ReviewStore {
    inner: Mutex<HashMap<String, PendingReview>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, review: PendingReview) {
        let mut guard = self.inner.lock().expect("review store mutex poisoned");
        guard.insert(review.request_id.clone(), review);
    }

    /// Returns a clone so callers never hold a reference into the store
    /// across a subsequent `delete`.
    pub fn get(&self, request_id: &str) -> Option<PendingReview> {
        let guard = self.inner.lock().expect("review store mutex poisoned");
        guard.get(request_id).cloned()
    }

    pub fn delete(&self, request_id: &str) -> Option<PendingReview> {
        let mut guard = self.inner.lock().expect("review store mutex poisoned");
        guard.remove(request_id)
    }

    pub fn has(&self, request_id: &str) -> bool {
        let guard = self.inner.lock().expect("review store mutex poisoned");
        guard.contains_key(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafline_core::model::{ConfidentItem, UncertainItem};

    fn sample(id: &str) -> PendingReview {
        PendingReview {
            request_id: id.to_string(),
            confident_items: vec![ConfidentItem {
                name: "Greek Salad".to_string(),
                price: 9.50,
                confidence: 0.95,
                reasoning: None,
            }],
            uncertain_items: vec![UncertainItem {
                name: "Mushroom Risotto".to_string(),
                price: 14.00,
                confidence: 0.55,
                evidence: vec![],
            }],
            partial_sum: 9.50,
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = ReviewStore::new();
        store.put(sample("req-1"));
        assert!(store.has("req-1"));
        let fetched = store.get("req-1").unwrap();
        assert_eq!(fetched.partial_sum, 9.50);
    }

    #[test]
    fn delete_removes_entry_permanently() {
        let store = ReviewStore::new();
        store.put(sample("req-2"));
        assert!(store.delete("req-2").is_some());
        assert!(!store.has("req-2"));
        assert!(store.get("req-2").is_none());
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = ReviewStore::new();
        assert!(store.get("nope").is_none());
    }
}
