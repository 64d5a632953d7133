use crate::errors::{AppError, StoreError};
use crate::storage::FileStore;
use crate::store::CheckInStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Every handler takes the lock for the whole operation, so each
/// read-modify-write on the store runs alone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<CheckInStore<FileStore>>>,
}

impl AppState {
    pub fn new(store: CheckInStore<FileStore>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs a mutating store operation on the blocking pool, since writes
    /// go through synchronous file I/O.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut CheckInStore<FileStore>) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || {
            let mut guard = store.blocking_lock();
            op(&mut guard)
        })
        .await
        .map_err(AppError::internal)?;
        result.map_err(AppError::from)
    }
}
