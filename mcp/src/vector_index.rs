//! Persistent semantic-neighbour store, seeded once from a bundled JSON file.
//!
//! Shared read-mostly state: initialised once under a first-use guard that
//! tolerates retry (a failed seed attempt leaves the collection untouched and
//! is retried on the next query), then queried concurrently without further
//! mutation.

use std::path::PathBuf;
use std::sync::Arc;

use leafline_core::model::{round3, Evidence};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::embedder::{l2_distance, Embedder};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DishRecord {
    name: String,
    is_vegetarian: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct SeedDish {
    name: String,
    is_vegetarian: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    dishes: Vec<SeedDish>,
}

pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    index_path: PathBuf,
    seed_path: PathBuf,
    records: RwLock<Vec<DishRecord>>,
    seeded: RwLock<bool>,
}

impl VectorIndex {
    pub fn new(embedder: Arc<dyn Embedder>, index_path: impl Into<PathBuf>, seed_path: impl Into<PathBuf>) -> Self {
        Self {
            embedder,
            index_path: index_path.into(),
            seed_path: seed_path.into(),
            records: RwLock::new(Vec::new()),
            seeded: RwLock::new(false),
        }
    }

    /// Ensure the store is loaded from disk, seeding it from the bundled JSON
    /// file if and only if it is currently empty. Idempotent; safe to call
    /// before every query.
    async fn ensure_initialized(&self) {
        if *self.seeded.read().await {
            return;
        }

        let mut seeded = self.seeded.write().await;
        if *seeded {
            return;
        }

        if let Ok(bytes) = tokio::fs::read(&self.index_path).await {
            if let Ok(loaded) = serde_json::from_slice::<Vec<DishRecord>>(&bytes) {
                if !loaded.is_empty() {
                    *self.records.write().await = loaded;
                    *seeded = true;
                    return;
                }
            }
        }

        match self.seed_from_file().await {
            Ok(records) if !records.is_empty() => {
                let _ = self.persist(&records).await;
                *self.records.write().await = records;
                *seeded = true;
            }
            Ok(_) => {
                tracing::warn!("vector index seed file produced no records");
            }
            Err(err) => {
                tracing::warn!(error = %err, "vector index seeding failed, will retry on next query");
            }
        }
    }

    async fn seed_from_file(&self) -> Result<Vec<DishRecord>, std::io::Error> {
        let bytes = tokio::fs::read(&self.seed_path).await?;
        let seed: SeedFile = serde_json::from_slice(&bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let embedder = self.embedder.clone();
        let dishes = seed.dishes;

        // Seeding embeds every dish in the knowledge base at once; run it on
        // a blocking thread so one slow model load doesn't stall the runtime.
        tokio::task::spawn_blocking(move || {
            dishes
                .into_iter()
                .map(|d| {
                    let text = match &d.description {
                        Some(desc) if !desc.is_empty() => format!("{} - {}", d.name, desc),
                        _ => d.name.clone(),
                    };
                    DishRecord {
                        embedding: embedder.embed(&text),
                        name: d.name,
                        is_vegetarian: d.is_vegetarian,
                        description: d.description,
                    }
                })
                .collect()
        })
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    async fn persist(&self, records: &[DishRecord]) -> std::io::Result<()> {
        if let Some(parent) = self.index_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec(records)?;
        tokio::fs::write(&self.index_path, data).await
    }

    /// Nearest-neighbour search by dish name, returning up to `top_k`
    /// evidence entries ordered by descending similarity.
    pub async fn search(&self, query: &str, top_k: usize) -> Vec<Evidence> {
        self.ensure_initialized().await;

        let embedder = self.embedder.clone();
        let owned_query = query.to_string();
        let query_vec = tokio::task::spawn_blocking(move || embedder.embed(&owned_query))
            .await
            .unwrap_or_default();
        let records = self.records.read().await;

        // Brute-force scan: the knowledge base is a bundled seed list (tens
        // to low hundreds of dishes), not an externally-growing corpus, so
        // an index structure would add complexity without a measurable win.
        let mut scored: Vec<(f64, &DishRecord)> = records
            .iter()
            .map(|r| (l2_distance(&query_vec, &r.embedding), r))
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_k)
            .map(|(distance, record)| Evidence {
                dish_name: record.name.clone(),
                is_vegetarian: record.is_vegetarian,
                similarity_score: round3(1.0 / (1.0 + distance)),
                description: record.description.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic stand-in for `FastEmbedEmbedder` so these tests don't
    /// need to download ONNX weights: hashes the trimmed, lowercased text
    /// into a fixed-width bucket vector. Exercises `VectorIndex`'s seeding,
    /// persistence, and scan logic independently of the real model.
    struct StubEmbedder {
        dim: usize,
    }

    impl Embedder for StubEmbedder {
        fn dim(&self) -> usize {
            self.dim
        }

        fn embed(&self, text: &str) -> Vec<f32> {
            use std::hash::{Hash, Hasher};
            let mut vector = vec![0f32; self.dim];
            let normalized = text.trim().to_lowercase();
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            normalized.hash(&mut hasher);
            vector[(hasher.finish() as usize) % self.dim] = 1.0;
            vector
        }
    }

    fn temp_paths(tag: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("leafline-vector-index-test-{tag}"));
        (dir.join("index.json"), dir.join("seed.json"))
    }

    #[tokio::test]
    async fn search_without_seed_file_returns_empty() {
        let (index_path, seed_path) = temp_paths("no-seed");
        let embedder: Arc<dyn Embedder> = Arc::new(StubEmbedder { dim: 64 });
        let index = VectorIndex::new(embedder, index_path, seed_path);
        assert!(index.search("Greek Salad", 5).await.is_empty());
    }

    #[tokio::test]
    async fn seeds_and_finds_exact_match_with_similarity_one() {
        let (index_path, seed_path) = temp_paths("exact-match");
        tokio::fs::create_dir_all(seed_path.parent().unwrap()).await.unwrap();
        tokio::fs::write(
            &seed_path,
            serde_json::json!({
                "dishes": [
                    {"name": "Veggie Burger", "is_vegetarian": true},
                    {"name": "Bacon Cheeseburger", "is_vegetarian": false}
                ]
            })
            .to_string(),
        )
        .await
        .unwrap();

        let embedder: Arc<dyn Embedder> = Arc::new(StubEmbedder { dim: 64 });
        let index = VectorIndex::new(embedder, index_path, seed_path);
        let results = index.search("Veggie Burger", 1).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].dish_name, "Veggie Burger");
        assert_eq!(results[0].similarity_score, 1.0);
    }
}
