//! Text embedding behind a small trait, so the Vector Index is agnostic to
//! which model actually produces the vectors.
//!
//! The default implementation runs a local ONNX sentence-transformer via
//! `fastembed` — the same `all-MiniLM-L6-v2` model the original service
//! loads through `sentence-transformers`, just served in-process instead of
//! from a Python worker.

use std::str::FromStr;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

/// Turns text into a fixed-width dense vector.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// `all-MiniLM-L6-v2` dimensionality — fixed by the model, not configurable.
const MINILM_DIM: usize = 384;

/// Local ONNX sentence embedder. `fastembed::TextEmbedding::embed` takes
/// `&mut self`, so concurrent callers share the model behind a `Mutex`
/// rather than each holding their own copy of the loaded weights.
pub struct FastEmbedEmbedder {
    model: Mutex<TextEmbedding>,
}

impl FastEmbedEmbedder {
    /// Load `model_name` (an identifier `fastembed::EmbeddingModel` accepts,
    /// e.g. `"all-MiniLM-L6-v2"`). Downloads and caches the ONNX weights on
    /// first use, same as `sentence_transformers.SentenceTransformer(name)`.
    pub fn new(model_name: &str) -> Result<Self, String> {
        let model = EmbeddingModel::from_str(model_name)
            .map_err(|err| format!("unknown embedding model '{model_name}': {err}"))?;
        let options = TextInitOptions::new(model).with_show_download_progress(false);
        let model = TextEmbedding::try_new(options).map_err(|err| err.to_string())?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl Embedder for FastEmbedEmbedder {
    fn dim(&self) -> usize {
        MINILM_DIM
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut model = self.model.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        model
            .embed(vec![text.to_string()], None)
            .ok()
            .and_then(|mut vectors| vectors.pop())
            .unwrap_or_else(|| vec![0.0; MINILM_DIM])
    }
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = (*x - *y) as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_distance_of_identical_vectors_is_zero() {
        let v = vec![0.1f32, 0.2, 0.3];
        assert!(l2_distance(&v, &v) < 1e-9);
    }

    #[test]
    fn l2_distance_is_symmetric() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        assert_eq!(l2_distance(&a, &b), l2_distance(&b, &a));
    }

    #[test]
    fn unknown_model_name_is_rejected_before_any_download() {
        assert!(FastEmbedEmbedder::new("not-a-real-model").is_err());
    }

    // Downloads and runs the real ONNX model; needs network access on first
    // run (cached under the fastembed cache dir afterwards).
    #[test]
    #[ignore = "downloads the all-MiniLM-L6-v2 ONNX weights on first run"]
    fn embed_is_deterministic_and_dimension_matches() {
        let embedder = FastEmbedEmbedder::new("all-MiniLM-L6-v2").unwrap();
        let a = embedder.embed("Greek Salad");
        let b = embedder.embed("Greek Salad");
        assert_eq!(a, b);
        assert_eq!(a.len(), embedder.dim());
    }

    #[test]
    #[ignore = "downloads the all-MiniLM-L6-v2 ONNX weights on first run"]
    fn similar_dishes_are_closer_than_unrelated_ones() {
        let embedder = FastEmbedEmbedder::new("all-MiniLM-L6-v2").unwrap();
        let a = embedder.embed("Grilled Chicken Sandwich");
        let b = embedder.embed("Grilled Chicken Wrap");
        let c = embedder.embed("Chocolate Lava Cake");
        assert!(l2_distance(&a, &b) < l2_distance(&a, &c));
    }
}
