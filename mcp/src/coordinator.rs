//! Combines Vector Index, LLM Client, and Keyword Engine signals into one
//! verdict per dish, then routes the batch into a Final or NeedsReview
//! envelope.

use std::sync::Arc;

use leafline_core::model::{
    round2, ClassifyOutcome, ConfidentItem, Evidence, FinalEnvelope, KeywordLabel, MenuItem,
    Method, NeedsReviewEnvelope, PendingReview, UncertainItem, Verdict,
};
use uuid::Uuid;

use crate::keyword;
use crate::llm_client::LlmClient;
use crate::review_store::ReviewStore;
use crate::vector_index::VectorIndex;

pub struct Coordinator {
    vector_index: Arc<VectorIndex>,
    llm_client: Arc<LlmClient>,
    review_store: Arc<ReviewStore>,
    confidence_threshold: f64,
    vector_top_k: usize,
}

impl Coordinator {
    pub fn new(
        vector_index: Arc<VectorIndex>,
        llm_client: Arc<LlmClient>,
        review_store: Arc<ReviewStore>,
        confidence_threshold: f64,
        vector_top_k: usize,
    ) -> Self {
        Self {
            vector_index,
            llm_client,
            review_store,
            confidence_threshold,
            vector_top_k,
        }
    }

    /// Classify every item and route the batch. Items SHOULD be processed
    /// sequentially unless the LLM backend's concurrency is bounded — the
    /// LLM is typically the dominant cost and backends often serialize
    /// internally.
    pub async fn analyze(&self, items: &[MenuItem]) -> ClassifyOutcome {
        let mut verdicts = Vec::with_capacity(items.len());
        for item in items {
            verdicts.push(self.classify_item(item).await);
        }
        self.route(items, verdicts)
    }

    async fn classify_item(&self, item: &MenuItem) -> Verdict {
        let evidence = self
            .vector_index
            .search(&item.name, self.vector_top_k)
            .await;
        let llm_verdict = self
            .llm_client
            .classify(&item.name, item.description.as_deref(), &evidence)
            .await;
        let keyword_verdict = keyword::classify(&item.name, item.description.as_deref());

        combine(llm_verdict, &keyword_verdict.into(), &evidence)
    }

    fn route(&self, items: &[MenuItem], verdicts: Vec<Verdict>) -> ClassifyOutcome {
        let mut confident: Vec<ConfidentItem> = Vec::new();
        let mut uncertain: Vec<UncertainItem> = Vec::new();

        for (item, verdict) in items.iter().zip(verdicts.into_iter()) {
            let confident_enough = verdict.confidence >= self.confidence_threshold;

            if verdict.is_vegetarian && confident_enough {
                confident.push(ConfidentItem {
                    name: item.name.clone(),
                    price: item.price,
                    confidence: verdict.confidence,
                    reasoning: Some(verdict.reasoning),
                });
            } else if !confident_enough {
                uncertain.push(UncertainItem {
                    name: item.name.clone(),
                    price: item.price,
                    confidence: verdict.confidence,
                    evidence: vec![verdict.reasoning],
                });
            }
            // is_vegetarian = false && confident_enough: confident
            // non-vegetarian, discarded per the batch-routing rule.
        }

        let partial_sum = round2(confident.iter().map(|i| i.price).sum());

        if uncertain.is_empty() {
            ClassifyOutcome::Final(FinalEnvelope {
                vegetarian_items: confident,
                total_sum: partial_sum,
            })
        } else {
            let request_id = Uuid::now_v7().to_string();
            self.review_store.put(PendingReview {
                request_id: request_id.clone(),
                confident_items: confident.clone(),
                uncertain_items: uncertain.clone(),
                partial_sum,
            });

            ClassifyOutcome::NeedsReview(NeedsReviewEnvelope {
                status: "needs_review".to_string(),
                request_id,
                confident_items: confident,
                uncertain_items: uncertain,
                partial_sum,
            })
        }
    }
}

/// A keyword verdict lifted to the shape `combine` needs, keeping the
/// conversion out of the per-item hot path above.
struct KeywordSignal {
    label: KeywordLabel,
    confidence: f64,
    matched_keywords: Vec<String>,
}

impl From<leafline_core::model::KeywordVerdict> for KeywordSignal {
    fn from(v: leafline_core::model::KeywordVerdict) -> Self {
        Self {
            label: v.label,
            confidence: v.confidence,
            matched_keywords: v.matched_keywords,
        }
    }
}

fn combine(llm: Option<Verdict>, keyword: &KeywordSignal, evidence: &[Evidence]) -> Verdict {
    if let Some(llm) = llm {
        let keyword_is_vegetarian = match keyword.label {
            KeywordLabel::Vegetarian => Some(true),
            KeywordLabel::NonVegetarian => Some(false),
            KeywordLabel::Unknown => None,
        };

        if let Some(keyword_veg) = keyword_is_vegetarian {
            if keyword.confidence >= 0.8 && keyword_veg != llm.is_vegetarian {
                return Verdict {
                    is_vegetarian: llm.is_vegetarian,
                    confidence: llm.confidence.min(0.6),
                    reasoning: format!(
                        "{} (Note: keyword analysis suggests otherwise)",
                        llm.reasoning
                    ),
                    method: Method::Combined,
                };
            }
        }

        let mut confidence = llm.confidence;
        if let Some(top) = evidence.first() {
            if top.similarity_score > 0.7 && top.is_vegetarian == llm.is_vegetarian {
                confidence = (confidence + 0.1).min(1.0);
            }
        }

        return Verdict {
            is_vegetarian: llm.is_vegetarian,
            confidence: round2(confidence),
            reasoning: llm.reasoning,
            method: Method::LlmRag,
        };
    }

    match keyword.label {
        KeywordLabel::Vegetarian | KeywordLabel::NonVegetarian => Verdict {
            is_vegetarian: keyword.label == KeywordLabel::Vegetarian,
            confidence: keyword.confidence,
            reasoning: format!("Keyword match: {}", keyword.matched_keywords.join(", ")),
            method: Method::Keyword,
        },
        KeywordLabel::Unknown => {
            if let Some(top) = evidence.first() {
                if top.similarity_score > 0.8 {
                    return Verdict {
                        is_vegetarian: top.is_vegetarian,
                        confidence: round2(top.similarity_score * 0.8),
                        reasoning: format!("Similar to known dish: {}", top.dish_name),
                        method: Method::Rag,
                    };
                }
            }

            Verdict {
                is_vegetarian: false,
                confidence: 0.3,
                reasoning: "Unable to determine with confidence, defaulting to non-vegetarian"
                    .to_string(),
                method: Method::Default,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafline_core::model::KeywordVerdict;

    fn llm(is_vegetarian: bool, confidence: f64) -> Verdict {
        Verdict {
            is_vegetarian,
            confidence,
            reasoning: "llm reasoning".to_string(),
            method: Method::LlmRag,
        }
    }

    fn unknown_keyword() -> KeywordSignal {
        KeywordVerdict {
            label: KeywordLabel::Unknown,
            confidence: 0.0,
            matched_keywords: vec![],
        }
        .into()
    }

    #[test]
    fn llm_succeeds_no_evidence_no_conflict() {
        let v = combine(Some(llm(true, 0.95)), &unknown_keyword(), &[]);
        assert!(v.is_vegetarian);
        assert_eq!(v.confidence, 0.95);
        assert_eq!(v.method, Method::LlmRag);
    }

    #[test]
    fn agreeing_high_similarity_evidence_boosts_confidence() {
        let evidence = vec![Evidence {
            dish_name: "Garden Salad".to_string(),
            is_vegetarian: true,
            similarity_score: 0.85,
            description: None,
        }];
        let v = combine(Some(llm(true, 0.80)), &unknown_keyword(), &evidence);
        assert_eq!(v.confidence, 0.90);
    }

    #[test]
    fn confident_keyword_conflict_caps_llm_confidence() {
        let keyword: KeywordSignal = KeywordVerdict {
            label: KeywordLabel::NonVegetarian,
            confidence: 0.9,
            matched_keywords: vec!["chicken".to_string()],
        }
        .into();
        let v = combine(Some(llm(true, 0.95)), &keyword, &[]);
        assert!(v.is_vegetarian);
        assert_eq!(v.confidence, 0.6);
        assert_eq!(v.method, Method::Combined);
        assert!(v.reasoning.contains("keyword analysis suggests otherwise"));
    }

    #[test]
    fn llm_failed_keyword_definite_used_verbatim() {
        let keyword: KeywordSignal = KeywordVerdict {
            label: KeywordLabel::NonVegetarian,
            confidence: 0.9,
            matched_keywords: vec!["bacon".to_string()],
        }
        .into();
        let v = combine(None, &keyword, &[]);
        assert!(!v.is_vegetarian);
        assert_eq!(v.confidence, 0.9);
        assert_eq!(v.method, Method::Keyword);
        assert_eq!(v.reasoning, "Keyword match: bacon");
    }

    #[test]
    fn llm_failed_keyword_unknown_high_similarity_uses_rag() {
        let evidence = vec![Evidence {
            dish_name: "Tofu Scramble".to_string(),
            is_vegetarian: true,
            similarity_score: 0.9,
            description: None,
        }];
        let v = combine(None, &unknown_keyword(), &evidence);
        assert!(v.is_vegetarian);
        assert_eq!(v.confidence, 0.72);
        assert_eq!(v.method, Method::Rag);
    }

    #[test]
    fn everything_unavailable_defaults_to_non_vegetarian() {
        let v = combine(None, &unknown_keyword(), &[]);
        assert!(!v.is_vegetarian);
        assert_eq!(v.confidence, 0.3);
        assert_eq!(v.method, Method::Default);
    }
}
