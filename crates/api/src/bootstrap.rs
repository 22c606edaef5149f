//! Background bootstrap task.
//!
//! The manifest lock is only held to install the result; the baseline fetch
//! and roster generation run without it so status requests stay responsive.

use busmanifest_core::bootstrap::establish_baseline;
use tokio::task::JoinHandle;

use crate::state::AppState;

/// Run [`run_bootstrap`] on a spawned task.
pub fn spawn_bootstrap(state: AppState) -> JoinHandle<()> {
    tokio::spawn(run_bootstrap(state))
}

/// Establish the baseline and move the manifest to `READY` or `ERROR`.
pub async fn run_bootstrap(state: AppState) {
    tracing::info!("Bootstrapping manifest");
    let result = establish_baseline(
        state.baseline_source.as_ref(),
        state.roster_generator.as_ref(),
    )
    .await;

    let mut manifest = state.manifest.lock().await;
    match result {
        Ok(baseline) => {
            manifest.complete_bootstrap(baseline).await;
            tracing::info!("Manifest ready");
        }
        Err(err) => manifest.fail_bootstrap(err.to_string()),
    }
}
