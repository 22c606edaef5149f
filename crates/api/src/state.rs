use std::sync::Arc;

use busmanifest_core::manifest::Manifest;
use busmanifest_core::sources::{BaselineSource, DraftStore, RosterGenerator};
use busmanifest_storage::{
    ExtractionFileGenerator, FileBaselineSource, FileDraftStore, HttpBaselineSource,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use crate::config::{BaselineLocation, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The lifecycle manager. One operation holds the lock at a time.
    pub manifest: Arc<Mutex<Manifest>>,
    pub config: Arc<ServerConfig>,
    pub baseline_source: Arc<dyn BaselineSource>,
    pub roster_generator: Arc<dyn RosterGenerator>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        baseline_source: Arc<dyn BaselineSource>,
        roster_generator: Arc<dyn RosterGenerator>,
        draft_store: Arc<dyn DraftStore>,
    ) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            manifest: Arc::new(Mutex::new(Manifest::new(draft_store, rng))),
            config: Arc::new(config),
            baseline_source,
            roster_generator,
        }
    }

    /// Wire the file and HTTP adapters named by `config`.
    pub fn from_config(config: ServerConfig) -> Self {
        let baseline_source: Arc<dyn BaselineSource> = match &config.baseline {
            BaselineLocation::Url(url) => Arc::new(HttpBaselineSource::new(url.clone())),
            BaselineLocation::Path(path) => Arc::new(FileBaselineSource::new(path.clone())),
        };
        let roster_generator = Arc::new(ExtractionFileGenerator::new(
            config.roster_source_path.clone(),
        ));
        let draft_store = Arc::new(FileDraftStore::new(config.draft_dir.clone()));

        Self::new(config, baseline_source, roster_generator, draft_store)
    }
}
