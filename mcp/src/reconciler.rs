//! Merges human corrections with a stored pending review into a Final
//! envelope. Fails only on `ReviewNotFound`.

use std::collections::HashMap;

use leafline_core::error::CoreError;
use leafline_core::model::{normalize_name, round2, ConfidentItem, Correction, FinalEnvelope};

use crate::review_store::ReviewStore;

/// Reconcile `corrections` against the pending review stored under
/// `request_id`. Deletes the pending review on success.
pub fn reconcile(
    store: &ReviewStore,
    request_id: &str,
    corrections: &[Correction],
) -> Result<FinalEnvelope, CoreError> {
    let pending = store.get(request_id).ok_or_else(|| CoreError::ReviewNotFound {
        request_id: request_id.to_string(),
    })?;

    let corrections_map: HashMap<String, bool> = corrections
        .iter()
        .map(|c| (normalize_name(&c.name), c.is_vegetarian))
        .collect();

    let mut result: Vec<ConfidentItem> = Vec::with_capacity(pending.confident_items.len());

    for item in &pending.confident_items {
        result.push(ConfidentItem {
            name: item.name.clone(),
            price: item.price,
            confidence: item.confidence,
            reasoning: Some(
                item.reasoning
                    .clone()
                    .unwrap_or_else(|| "Previously classified with high confidence".to_string()),
            ),
        });
    }

    for item in &pending.uncertain_items {
        match corrections_map.get(&normalize_name(&item.name)) {
            Some(true) => result.push(ConfidentItem {
                name: item.name.clone(),
                price: item.price,
                confidence: 1.0,
                reasoning: Some("Confirmed vegetarian by human review".to_string()),
            }),
            Some(false) | None => {}
        }
    }

    let total_sum = round2(result.iter().map(|i| i.price).sum());

    store.delete(request_id);

    Ok(FinalEnvelope {
        vegetarian_items: result,
        total_sum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafline_core::model::{PendingReview, UncertainItem};

    fn store_with_pending(request_id: &str) -> ReviewStore {
        let store = ReviewStore::new();
        store.put(PendingReview {
            request_id: request_id.to_string(),
            confident_items: vec![],
            uncertain_items: vec![UncertainItem {
                name: "Mushroom Risotto".to_string(),
                price: 14.00,
                confidence: 0.55,
                evidence: vec!["uncertain".to_string()],
            }],
            partial_sum: 0.00,
        });
        store
    }

    #[test]
    fn unknown_request_id_raises_review_not_found() {
        let store = ReviewStore::new();
        let err = reconcile(&store, "missing", &[]).unwrap_err();
        assert!(matches!(err, CoreError::ReviewNotFound { .. }));
    }

    #[test]
    fn scenario_5_confirming_uncertain_item_yields_final() {
        let store = store_with_pending("req-5");
        let corrections = vec![Correction {
            name: "Mushroom Risotto".to_string(),
            is_vegetarian: true,
        }];

        let result = reconcile(&store, "req-5", &corrections).unwrap();
        assert_eq!(result.vegetarian_items.len(), 1);
        assert_eq!(result.vegetarian_items[0].confidence, 1.0);
        assert_eq!(result.total_sum, 14.00);
    }

    #[test]
    fn rejected_correction_omits_the_item() {
        let store = store_with_pending("req-6");
        let corrections = vec![Correction {
            name: "Mushroom Risotto".to_string(),
            is_vegetarian: false,
        }];

        let result = reconcile(&store, "req-6", &corrections).unwrap();
        assert!(result.vegetarian_items.is_empty());
        assert_eq!(result.total_sum, 0.00);
    }

    #[test]
    fn absent_correction_defaults_conservatively_to_omitted() {
        let store = store_with_pending("req-7");
        let result = reconcile(&store, "req-7", &[]).unwrap();
        assert!(result.vegetarian_items.is_empty());
    }

    #[test]
    fn repeat_submission_after_success_raises_review_not_found() {
        let store = store_with_pending("req-8");
        reconcile(&store, "req-8", &[]).unwrap();
        let err = reconcile(&store, "req-8", &[]).unwrap_err();
        assert!(matches!(err, CoreError::ReviewNotFound { .. }));
    }
}
