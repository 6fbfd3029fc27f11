use std::sync::Arc;

use leafline_core::config::Settings;
use leafline_mcp::Engine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub settings: Arc<Settings>,
}
