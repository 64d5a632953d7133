use crate::errors::StoreError;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::{BTreeSet, HashMap},
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, error};

/// Named-blob persistence the check-in store writes through.
pub trait BlobStore {
    /// `None` for a missing blob. Backends log and return `None` when a
    /// blob exists but cannot be read.
    fn get_blob(&self, key: &str) -> Option<String>;

    /// Replaces the whole blob stored under `key`.
    fn set_blob(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    fn clear_all(&mut self) -> Result<(), StoreError>;
}

/// Decodes the blob under `key`, falling back to `default` when it is
/// missing or unparsable.
pub fn get_json<T: DeserializeOwned>(backend: &impl BlobStore, key: &str, default: T) -> T {
    let Some(raw) = backend.get_blob(key) else {
        return default;
    };
    if raw.trim().is_empty() {
        return default;
    }
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            error!("failed to parse `{key}` blob, using default: {err}");
            default
        }
    }
}

pub fn set_json<T: Serialize + ?Sized>(
    backend: &mut impl BlobStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    backend.set_blob(key, payload)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get_blob(&self, key: &str) -> Option<String> {
        self.blobs.get(key).cloned()
    }

    fn set_blob(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.blobs.clear();
        Ok(())
    }
}

/// Stores each blob as `<key>.json` inside a data directory.
///
/// `clear_all` removes only the blobs for the keys the store was created
/// with plus any key it has written since; other files are left alone.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    keys: BTreeSet<String>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, keys: &[&str]) -> Self {
        Self {
            dir: dir.into(),
            keys: keys.iter().map(|key| key.to_string()).collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get_blob(&self, key: &str) -> Option<String> {
        let path = self.blob_path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                None
            }
        }
    }

    fn set_blob(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.blob_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        self.keys.insert(key.to_string());
        debug!("wrote {}", path.display());
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        for key in &self.keys {
            let path = self.blob_path(key);
            match fs::remove_file(&path) {
                Ok(()) => debug!("removed {}", path.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

pub fn resolve_data_dir() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data"))
}
