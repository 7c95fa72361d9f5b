//! Calendar layout on top of an [`ObjectStore`].
//!
//! ```text
//! calendar/<token>/calendar.json          calendar manifest
//! calendar/<token>/day<N>/manifest.json   scene document of day N
//! calendar/<token>/day<N>/assets/<file>   uploaded images
//! ```

use std::fmt;
use std::str::FromStr;

use advent_core::SceneDocument;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{ObjectStore, StorageError, StorageResult};

/// Days in a calendar.
pub const DAYS: std::ops::RangeInclusive<u8> = 1..=24;

/// Name of the calendar manifest object.
pub const CALENDAR_FILE: &str = "calendar.json";

/// Name of a day's scene document object.
pub const DAY_MANIFEST_FILE: &str = "manifest.json";

const JSON: &str = "application/json";

/// Lowercase Crockford base32.
const TOKEN_ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Length of generated tokens.
pub const TOKEN_LEN: usize = 26;

/// URL-safe identifier of a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarToken(String);

impl CalendarToken {
    /// Generate a fresh random token.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn generate() -> Self {
        let mut bits = Uuid::new_v4().as_u128();
        let mut chars = [0u8; TOKEN_LEN];
        for slot in chars.iter_mut().rev() {
            *slot = TOKEN_ALPHABET[(bits & 0x1f) as usize];
            bits >>= 5;
        }
        Self(chars.iter().map(|&b| char::from(b)).collect())
    }

    /// Accept an existing token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidToken`] if the token is empty, longer
    /// than 64 characters, or has characters outside `[A-Za-z0-9_-]`.
    pub fn parse(token: &str) -> StorageResult<Self> {
        let valid = !token.is_empty()
            && token.len() <= 64
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(token.to_string()))
        } else {
            Err(StorageError::InvalidToken(token.to_string()))
        }
    }

    /// The token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folder holding everything of this calendar.
    #[must_use]
    pub fn folder(&self) -> String {
        format!("calendar/{}", self.0)
    }
}

impl fmt::Display for CalendarToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CalendarToken {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarToken {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarToken> for String {
    fn from(token: CalendarToken) -> Self {
        token.0
    }
}

/// Calendar-level settings entered before editing days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarManifest {
    /// Calendar title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// IANA timezone the unlock dates are evaluated in.
    pub timezone: String,
}

/// Folder of day `day`, validating the day number.
///
/// # Errors
///
/// Returns [`StorageError::InvalidDay`] outside 1..=24.
pub fn day_folder(token: &CalendarToken, day: u8) -> StorageResult<String> {
    if !DAYS.contains(&day) {
        return Err(StorageError::InvalidDay(day));
    }
    Ok(format!("{}/day{day}", token.folder()))
}

fn parse_day_folder(name: &str) -> Option<u8> {
    name.strip_prefix("day")
        .filter(|digits| !digits.starts_with('0'))
        .and_then(|digits| digits.parse().ok())
        .filter(|day| DAYS.contains(day))
}

/// Reads and writes calendars through an object store.
#[derive(Debug)]
pub struct CalendarRepository<S> {
    store: S,
}

impl<S: ObjectStore> CalendarRepository<S> {
    /// Wrap an object store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save the calendar manifest, returning its URL.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the upload fails.
    pub async fn save_calendar(
        &self,
        token: &CalendarToken,
        manifest: &CalendarManifest,
    ) -> StorageResult<String> {
        let body = serde_json::to_vec_pretty(manifest)?;
        let url = self
            .store
            .put(&token.folder(), CALENDAR_FILE, body, JSON)
            .await?;
        info!("Saved calendar {token}");
        Ok(url)
    }

    /// Load the calendar manifest; `None` if missing or unreadable.
    pub async fn load_calendar(&self, token: &CalendarToken) -> Option<CalendarManifest> {
        let value = self.store.get_json(&token.folder(), CALENDAR_FILE).await?;
        serde_json::from_value(value)
            .map_err(|e| warn!("Calendar {token} manifest is unreadable: {e}"))
            .ok()
    }

    /// Save the scene document of one day, returning its URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidDay`] outside 1..=24, or an error if
    /// encoding or the upload fails.
    pub async fn save_day(
        &self,
        token: &CalendarToken,
        day: u8,
        document: &SceneDocument,
    ) -> StorageResult<String> {
        let folder = day_folder(token, day)?;
        let body = document.to_json()?.into_bytes();
        let url = self
            .store
            .put(&folder, DAY_MANIFEST_FILE, body, JSON)
            .await?;
        info!(
            "Saved day {day} of calendar {token} ({} items)",
            document.items.len()
        );
        Ok(url)
    }

    /// Load the scene document of one day.
    ///
    /// A missing or undecodable document is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidDay`] outside 1..=24.
    pub async fn load_day(
        &self,
        token: &CalendarToken,
        day: u8,
    ) -> StorageResult<Option<SceneDocument>> {
        let folder = day_folder(token, day)?;
        let Some(value) = self.store.get_json(&folder, DAY_MANIFEST_FILE).await else {
            debug!("Day {day} of calendar {token} has no saved document");
            return Ok(None);
        };
        Ok(serde_json::from_value(value)
            .map_err(|e| warn!("Day {day} of calendar {token} is unreadable: {e}"))
            .ok())
    }

    /// Days that have a saved scene document, ascending.
    pub async fn saved_days(&self, token: &CalendarToken) -> Vec<u8> {
        let mut days: Vec<u8> = self
            .store
            .list(&token.folder())
            .await
            .iter()
            .filter_map(|name| parse_day_folder(name))
            .collect();
        days.sort_unstable();
        days.dedup();

        let mut saved = Vec::with_capacity(days.len());
        for day in days {
            let folder = format!("{}/day{day}", token.folder());
            if self
                .store
                .list(&folder)
                .await
                .iter()
                .any(|name| name == DAY_MANIFEST_FILE)
            {
                saved.push(day);
            }
        }
        saved
    }

    /// Upload an image for a day, returning its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidDay`] outside 1..=24,
    /// [`StorageError::InvalidName`] if `filename` is not a plain file name,
    /// or an error if the upload fails.
    pub async fn upload_asset(
        &self,
        token: &CalendarToken,
        day: u8,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let folder = day_folder(token, day)?;
        if filename.contains('/') {
            return Err(StorageError::InvalidName(filename.to_string()));
        }
        self.store
            .put(&format!("{folder}/assets"), filename, bytes, content_type)
            .await
    }
}
