pub mod app;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod history;
pub mod models;
pub mod registry;
pub mod share;
pub mod storage;
pub mod store;
pub mod streak;
pub mod ui;
pub mod state;

pub use app::router;
pub use errors::StoreError;
pub use registry::{PrayerType, PrayerTypeRegistry};
pub use state::AppState;
pub use storage::{BlobStore, FileStore, MemoryStore, resolve_data_dir};
pub use store::CheckInStore;
