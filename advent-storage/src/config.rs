//! Storage configuration.

use url::Url;

use crate::{StorageError, StorageResult};

/// Bucket used when `ADVENT_BUCKET` is unset.
pub const DEFAULT_BUCKET: &str = "calendars";

/// Connection settings for Supabase Storage.
#[derive(Clone)]
pub struct StorageConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: Url,
    /// Anonymous API key.
    pub anon_key: String,
    /// Storage bucket name.
    pub bucket: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl StorageConfig {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidUrl`] if `url` does not parse and
    /// [`StorageError::NotConfigured`] if the key is empty.
    pub fn new(
        url: impl AsRef<str>,
        anon_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> StorageResult<Self> {
        let url = Url::parse(url.as_ref()).map_err(|e| StorageError::InvalidUrl(e.to_string()))?;
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(StorageError::NotConfigured("SUPABASE_ANON_KEY"));
        }
        let bucket = bucket.into();
        Ok(Self {
            url,
            anon_key,
            bucket: if bucket.trim().is_empty() {
                DEFAULT_BUCKET.to_string()
            } else {
                bucket
            },
        })
    }

    /// Read `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `ADVENT_BUCKET`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotConfigured`] if a credential is missing.
    pub fn from_env() -> StorageResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`StorageConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotConfigured`] if a credential is missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StorageResult<Self> {
        let present = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());
        let url = present("SUPABASE_URL").ok_or(StorageError::NotConfigured("SUPABASE_URL"))?;
        let anon_key =
            present("SUPABASE_ANON_KEY").ok_or(StorageError::NotConfigured("SUPABASE_ANON_KEY"))?;
        let bucket = present("ADVENT_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        Self::new(url, anon_key, bucket)
    }
}
