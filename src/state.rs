use std::sync::Arc;

use crate::services::blob::BlobStore;
use crate::services::jobs::Judge;
use crate::services::store::Store;
use crate::services::worker::TaskQueue;

/// Shared handles given to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub blobs: Arc<dyn BlobStore>,
    pub judge: Judge,
    pub tasks: TaskQueue,
    pub leaderboard_limit: u64,
}
