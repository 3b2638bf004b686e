use std::sync::Arc;

use nr_core::config::ServerSettings;
use nr_core::SnapshotStorage;
use nr_inference::RecommendationEngine;

pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    /// Where `/api/retrain` reloads the corpus from
    pub storage: Arc<dyn SnapshotStorage>,
    pub settings: ServerSettings,
}

impl AppState {
    pub fn new(
        engine: Arc<RecommendationEngine>,
        storage: Arc<dyn SnapshotStorage>,
        settings: ServerSettings,
    ) -> Self {
        Self {
            engine,
            storage,
            settings,
        }
    }
}
