use std::time::Duration;

/// Environment-driven configuration, read once at process startup.
///
/// Required variables fail fast with a descriptive panic message; everything
/// else falls back to a documented default so local/dev usage needs no setup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Minimum confidence for a verdict to be considered "confident" (§6).
    pub confidence_threshold: f64,
    /// Default number of evidence neighbours requested per vector-index query (§4.5).
    pub vector_top_k: usize,
    /// Filesystem path to the persistent vector-index store.
    pub vector_index_path: String,
    /// Filesystem path to the seed-dish JSON file (§6).
    pub vector_seed_path: String,
    /// Name of the local sentence-embedding model to load (§4.3).
    pub embedding_model: String,
    /// Base URL of the LLM server (Ollama-compatible `/api/generate`).
    pub llm_base_url: String,
    /// Model name passed to the LLM server.
    pub llm_model: String,
    /// Per-request timeout applied to both the LLM and vector-index calls.
    pub request_timeout: Duration,
    /// CORS allowed origins for the HTTP API.
    pub cors_origins: Vec<String>,
    /// Bind port for the HTTP API.
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            confidence_threshold: env_f64("LEAFLINE_CONFIDENCE_THRESHOLD", 0.70),
            vector_top_k: env_usize("LEAFLINE_VECTOR_TOP_K", 5),
            vector_index_path: std::env::var("LEAFLINE_VECTOR_INDEX_PATH")
                .unwrap_or_else(|_| "./data/vector_index.json".to_string()),
            vector_seed_path: std::env::var("LEAFLINE_VECTOR_SEED_PATH")
                .unwrap_or_else(|_| "./data/vegetarian_dishes.json".to_string()),
            embedding_model: std::env::var("LEAFLINE_EMBEDDING_MODEL")
                .unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string()),
            llm_base_url: std::env::var("LEAFLINE_LLM_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            llm_model: std::env::var("LEAFLINE_LLM_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            request_timeout: Duration::from_millis(env_u64("LEAFLINE_REQUEST_TIMEOUT_MS", 8_000)),
            cors_origins: std::env::var("LEAFLINE_CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            port: env_u64("PORT", 3000) as u16,
        }
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read a required environment variable, panicking with a remediation hint
/// if it is unset or empty. Mirrors the fail-fast pattern used for every
/// other required secret/config value in this codebase.
pub fn required_non_empty_env(name: &str, docs_hint: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => panic!("{name} must be set and non-empty. {docs_hint}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_when_unset() {
        // SAFETY: tests run single-threaded within this module for these vars.
        unsafe {
            std::env::remove_var("LEAFLINE_CONFIDENCE_THRESHOLD");
            std::env::remove_var("LEAFLINE_VECTOR_TOP_K");
        }
        let settings = Settings::from_env();
        assert_eq!(settings.confidence_threshold, 0.70);
        assert_eq!(settings.vector_top_k, 5);
    }
}
