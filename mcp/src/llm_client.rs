//! Chat-style LLM classifier, speaking an Ollama-compatible `/api/generate`
//! contract. Parse failures, timeouts, and transport errors all degrade to
//! `None` — never escalated, per the error-handling design.

use std::time::Duration;

use leafline_core::model::{Evidence, Method, Verdict};
use serde::{Deserialize, Serialize};

const RETRY_ATTEMPTS: u32 = 2;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

const SYSTEM_MESSAGE: &str =
    "You classify dishes. Always respond with valid JSON and nothing else.";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: &'a str,
    temperature: f64,
    format: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct LlmVerdictBody {
    is_vegetarian: bool,
    confidence: f64,
    reasoning: String,
}

pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Classify a dish. Returns `None` on any transport, timeout, or parse
    /// failure — callers fall through to keyword/RAG signals.
    pub async fn classify(
        &self,
        name: &str,
        description: Option<&str>,
        evidence: &[Evidence],
    ) -> Option<Verdict> {
        let prompt = build_prompt(name, description, evidence);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            system: SYSTEM_MESSAGE,
            temperature: 0.1,
            format: "json",
            stream: false,
        };

        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));

        // Transient network hiccups get a couple of quick retries; anything
        // else (bad status, unparsable body) degrades to None immediately.
        let response = leafline_mcp_runtime::retry_with_backoff(RETRY_ATTEMPTS, RETRY_BASE_DELAY, || {
            let request = &request;
            let url = url.clone();
            async move { self.client.post(url).json(request).send().await }
        })
        .await
        .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let body: GenerateResponse = response.json().await.ok()?;
        parse_verdict(&body.response)
    }
}

fn build_prompt(name: &str, description: Option<&str>, evidence: &[Evidence]) -> String {
    let mut prompt = format!("Dish name: {name}\n");
    if let Some(desc) = description {
        if !desc.is_empty() {
            prompt.push_str(&format!("Description: {desc}\n"));
        }
    }

    if !evidence.is_empty() {
        prompt.push_str("Similar known dishes:\n");
        for item in evidence.iter().take(3) {
            let label = if item.is_vegetarian { "vegetarian" } else { "non-vegetarian" };
            prompt.push_str(&format!(
                "- {} ({}, similarity: {:.2})\n",
                item.dish_name, label, item.similarity_score
            ));
        }
    }

    prompt.push_str(
        "Rules: no meat, poultry, fish, or seafood is vegetarian. Eggs and dairy are acceptable. \
         Prefer a conservative (non-vegetarian) answer when unsure. \
         Respond with JSON: {\"is_vegetarian\": bool, \"confidence\": number between 0 and 1, \"reasoning\": string}.",
    );
    prompt
}

fn parse_verdict(raw: &str) -> Option<Verdict> {
    let cleaned = strip_code_fence(raw);
    let body: LlmVerdictBody = serde_json::from_str(&cleaned).ok()?;

    if !(0.0..=1.0).contains(&body.confidence) {
        return None;
    }

    Some(Verdict {
        is_vegetarian: body.is_vegetarian,
        confidence: body.confidence,
        reasoning: body.reasoning,
        method: Method::LlmRag,
    })
}

fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    if !lines.is_empty() {
        lines.remove(0);
    }
    if lines.last().map(|l| l.trim() == "```").unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let v = parse_verdict(r#"{"is_vegetarian": true, "confidence": 0.95, "reasoning": "no meat"}"#).unwrap();
        assert!(v.is_vegetarian);
        assert_eq!(v.confidence, 0.95);
    }

    #[test]
    fn strips_triple_backtick_fence() {
        let raw = "```json\n{\"is_vegetarian\": false, \"confidence\": 0.9, \"reasoning\": \"has bacon\"}\n```";
        let v = parse_verdict(raw).unwrap();
        assert!(!v.is_vegetarian);
        assert_eq!(v.confidence, 0.9);
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        assert!(parse_verdict(r#"{"is_vegetarian": true, "confidence": 1.5, "reasoning": "x"}"#).is_none());
    }

    #[test]
    fn malformed_json_degrades_to_none() {
        assert!(parse_verdict("not json at all").is_none());
    }

    #[test]
    fn prompt_includes_top_three_evidence_items_only() {
        let evidence: Vec<Evidence> = (0..5)
            .map(|i| Evidence {
                dish_name: format!("Dish {i}"),
                is_vegetarian: true,
                similarity_score: 0.9,
                description: None,
            })
            .collect();
        let prompt = build_prompt("Query Dish", None, &evidence);
        assert!(prompt.contains("Dish 0"));
        assert!(prompt.contains("Dish 2"));
        assert!(!prompt.contains("Dish 3"));
    }
}
