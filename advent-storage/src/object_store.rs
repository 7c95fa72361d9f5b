//! Object store abstraction and the in-memory implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::{StorageError, StorageResult};

/// Flat object storage addressed by `prefix/filename`.
///
/// Reads never fail: a missing or unreadable object is `None`, a missing
/// folder lists as empty.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ObjectStore {
    /// Store `content` at `prefix/filename`, overwriting any existing object.
    /// Returns the public URL of the object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object could not be written.
    async fn put(
        &self,
        prefix: &str,
        filename: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Fetch and parse the JSON object at `prefix/filename`.
    async fn get_json(&self, prefix: &str, filename: &str) -> Option<Value>;

    /// Names of the objects and folders directly under `prefix`.
    async fn list(&self, prefix: &str) -> Vec<String>;
}

/// Join a folder and object name, rejecting names that escape the folder.
pub(crate) fn object_path(prefix: &str, filename: &str) -> StorageResult<String> {
    let valid = |segment: &str| !segment.is_empty() && segment != "." && segment != "..";
    let prefix = prefix.trim_matches('/');
    if !filename.split('/').all(valid) || !prefix.split('/').all(valid) {
        return Err(StorageError::InvalidName(format!("{prefix}/{filename}")));
    }
    Ok(format!("{prefix}/{filename}"))
}

/// In-process object store.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes stored at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .ok()
            .and_then(|objects| objects.get(path).cloned())
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().map_or(0, |objects| objects.len())
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        prefix: &str,
        filename: &str,
        content: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = object_path(prefix, filename)?;
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StorageError::Status {
                status: 500,
                body: "memory store lock poisoned".to_string(),
            })?;
        objects.insert(path.clone(), content);
        Ok(format!("memory://{path}"))
    }

    async fn get_json(&self, prefix: &str, filename: &str) -> Option<Value> {
        let path = object_path(prefix, filename).ok()?;
        let bytes = self.get(&path)?;
        serde_json::from_slice(&bytes).ok()
    }

    async fn list(&self, prefix: &str) -> Vec<String> {
        let folder = format!("{}/", prefix.trim_matches('/'));
        let Ok(objects) = self.objects.read() else {
            return Vec::new();
        };
        let names: BTreeSet<String> = objects
            .keys()
            .filter_map(|key| key.strip_prefix(&folder))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_string)
            .collect();
        names.into_iter().collect()
    }
}
