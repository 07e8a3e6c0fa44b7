//! HTTP request handlers.

/// JSON envelope shared by every endpoint.
pub mod envelope;
/// Recipe endpoints.
pub mod recipe;

use crate::AppState;
use recipebox_core::{AppError, Database, UploadStore};

/// Run storage work on the blocking pool so slow disk or SQLite calls only
/// stall the request that issued them.
pub(crate) async fn run_blocking<T, F>(state: &AppState, work: F) -> Result<T, AppError>
where
    F: FnOnce(&Database, &UploadStore) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    let uploads = state.uploads.clone();
    tokio::task::spawn_blocking(move || work(db.as_ref(), uploads.as_ref()))
        .await
        .map_err(|err| {
            tracing::error!("Storage task failed: {}", err);
            AppError::Internal
        })?
}
