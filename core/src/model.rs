use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalize a dish name for deduplication and correction lookup:
/// lowercase, trimmed, internal whitespace collapsed to single spaces.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Round a value to 2 decimal places (monetary scale).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a value to 3 decimal places (similarity score scale).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// A dish extracted from OCR text by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Provenance tag for a classification verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[serde(rename = "llm+rag")]
    LlmRag,
    Combined,
    Keyword,
    Rag,
    Default,
}

/// A single classification decision for one dish.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    pub is_vegetarian: bool,
    pub confidence: f64,
    pub reasoning: String,
    pub method: Method,
}

/// A labeled neighbour returned by the vector index, ranked by similarity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Evidence {
    pub dish_name: String,
    pub is_vegetarian: bool,
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tri-valued keyword-engine verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KeywordLabel {
    Vegetarian,
    NonVegetarian,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KeywordVerdict {
    pub label: KeywordLabel,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

/// A single line item inside a Final or NeedsReview envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfidentItem {
    pub name: String,
    pub price: f64,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// A line item parked under review, carrying its reasoning as `evidence`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UncertainItem {
    pub name: String,
    pub price: f64,
    pub confidence: f64,
    pub evidence: Vec<String>,
}

/// The response when every item was confidently classified.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinalEnvelope {
    pub vegetarian_items: Vec<ConfidentItem>,
    pub total_sum: f64,
}

/// The response when at least one item needs human review.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NeedsReviewEnvelope {
    pub status: String,
    pub request_id: String,
    pub confident_items: Vec<ConfidentItem>,
    pub uncertain_items: Vec<UncertainItem>,
    pub partial_sum: f64,
}

/// Either outcome of a classification batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ClassifyOutcome {
    NeedsReview(NeedsReviewEnvelope),
    Final(FinalEnvelope),
}

/// State parked in the Review Store while a request awaits human correction.
/// Created once, read at most once, deleted on successful reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReview {
    pub request_id: String,
    pub confident_items: Vec<ConfidentItem>,
    pub uncertain_items: Vec<UncertainItem>,
    pub partial_sum: f64,
}

/// A single human correction for one uncertain item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Correction {
    pub name: String,
    pub is_vegetarian: bool,
}

/// Body of a review-correction submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CorrectionInput {
    pub corrections: Vec<Correction>,
}
