//! Supabase Storage object store.
//!
//! Speaks the Storage REST API directly:
//! - upload: `POST /storage/v1/object/{bucket}/{path}` with `x-upsert`
//! - public read: `GET /storage/v1/object/public/{bucket}/{path}`
//! - list: `POST /storage/v1/object/list/{bucket}`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::object_store::{object_path, ObjectStore};
use crate::{StorageConfig, StorageError, StorageResult};

/// Maximum entries requested from one list call.
const LIST_LIMIT: u32 = 1000;

/// Placeholder object Supabase keeps in otherwise empty folders.
const EMPTY_FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

#[derive(Debug, Deserialize)]
struct ListEntry {
    name: String,
}

/// Object store backed by a Supabase Storage bucket.
#[derive(Debug, Clone)]
pub struct SupabaseObjectStore {
    http: Client,
    config: StorageConfig,
}

impl SupabaseObjectStore {
    /// Create a client for the configured project and bucket.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Http`] if the HTTP client fails to build.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Create a client from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `ADVENT_BUCKET`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotConfigured`] if credentials are missing.
    pub fn from_env() -> StorageResult<Self> {
        Self::new(StorageConfig::from_env()?)
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Public URL of the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidUrl`] if the base URL cannot hold a path.
    pub fn public_url(&self, path: &str) -> StorageResult<Url> {
        self.endpoint(&["public", self.config.bucket.as_str()], Some(path))
    }

    fn endpoint(&self, segments: &[&str], path: Option<&str>) -> StorageResult<Url> {
        let mut url = self.config.url.clone();
        {
            let mut parts = url.path_segments_mut().map_err(|()| {
                StorageError::InvalidUrl(format!("{} cannot be a base", self.config.url))
            })?;
            parts.pop_if_empty().extend(["storage", "v1", "object"]);
            parts.extend(segments);
            if let Some(path) = path {
                parts.extend(path.split('/'));
            }
        }
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    async fn fetch_json(&self, path: &str) -> StorageResult<Option<Value>> {
        let mut url = self.public_url(path)?;
        url.query_pairs_mut()
            .append_pair("t", &now_millis().to_string());

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            debug!("No object at {path}: {}", response.status());
            return Ok(None);
        }
        Ok(Some(response.json::<Value>().await?))
    }

    async fn fetch_list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let url = self.endpoint(&["list", self.config.bucket.as_str()], None)?;
        let body = json!({
            "prefix": prefix.trim_matches('/'),
            "limit": LIST_LIMIT,
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" }
        });
        let response = self
            .authorized(self.http.post(url))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let entries: Vec<ListEntry> = response.json().await?;
        Ok(entries
            .into_iter()
            .map(|entry| entry.name)
            .filter(|name| name != EMPTY_FOLDER_PLACEHOLDER)
            .collect())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ObjectStore for SupabaseObjectStore {
    async fn put(
        &self,
        prefix: &str,
        filename: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let path = object_path(prefix, filename)?;
        let url = self.endpoint(&[self.config.bucket.as_str()], Some(&path))?;
        let size = content.len();

        let response = self
            .authorized(self.http.post(url))
            .header("x-upsert", "true")
            .header("cache-control", "max-age=0")
            .header("content-type", content_type)
            .body(content)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Upload of {path} failed with {status}: {body}");
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Uploaded {size} bytes to {path}");
        Ok(self.public_url(&path)?.to_string())
    }

    async fn get_json(&self, prefix: &str, filename: &str) -> Option<Value> {
        let path = object_path(prefix, filename).ok()?;
        match self.fetch_json(&path).await {
            Ok(value) => value,
            Err(e) => {
                debug!("Fetching {path} failed: {e}");
                None
            }
        }
    }

    async fn list(&self, prefix: &str) -> Vec<String> {
        self.fetch_list(prefix).await.unwrap_or_else(|e| {
            warn!("Listing {prefix} failed: {e}");
            Vec::new()
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_millis() -> u128 {
    js_sys::Date::now() as u128
}
