pub mod coordinator;
pub mod embedder;
pub mod keyword;
pub mod llm_client;
pub mod parser;
pub mod reconciler;
pub mod review_store;
pub mod vector_index;

use std::sync::Arc;

use leafline_core::config::Settings;

use coordinator::Coordinator;
use embedder::{Embedder, FastEmbedEmbedder};
use llm_client::LlmClient;
use review_store::ReviewStore;
use vector_index::VectorIndex;

/// The classification engine's process-wide singletons, constructed once at
/// startup and handed to callers explicitly (no ambient global state).
pub struct Engine {
    pub coordinator: Coordinator,
    pub review_store: Arc<ReviewStore>,
}

impl Engine {
    pub fn new(settings: &Settings) -> Self {
        let embedder: Arc<dyn Embedder> = Arc::new(
            FastEmbedEmbedder::new(&settings.embedding_model)
                .unwrap_or_else(|err| panic!("failed to load embedding model: {err}")),
        );
        let vector_index = Arc::new(VectorIndex::new(
            embedder,
            settings.vector_index_path.clone(),
            settings.vector_seed_path.clone(),
        ));
        let http_client = leafline_mcp_runtime::build_client(settings.request_timeout);
        let llm_client = Arc::new(LlmClient::new(
            http_client,
            settings.llm_base_url.clone(),
            settings.llm_model.clone(),
        ));
        let review_store = Arc::new(ReviewStore::new());

        let coordinator = Coordinator::new(
            vector_index,
            llm_client,
            review_store.clone(),
            settings.confidence_threshold,
            settings.vector_top_k,
        );

        Self {
            coordinator,
            review_store,
        }
    }
}
