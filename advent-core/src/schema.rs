//! Canonical serialized representation of one day's canvas.
//!
//! A [`SceneDocument`] is what gets written to `day<N>/manifest.json`. It holds
//! the background and the items in paint order; selection is editor-local and
//! is not persisted.

use serde::{Deserialize, Serialize};

use crate::{scene, Background, EditorError, EditorResult, Scene, SceneItem};

/// Current document format version.
pub const SCENE_DOCUMENT_VERSION: u32 = 1;

/// Canonical scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format version, see [`SCENE_DOCUMENT_VERSION`].
    #[serde(default = "SceneDocument::default_version")]
    pub version: u32,
    /// Active background.
    #[serde(default)]
    pub background: Background,
    /// Items in paint order (first paints at the bottom).
    #[serde(default)]
    pub items: Vec<SceneItem>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: SCENE_DOCUMENT_VERSION,
            background: Background::default(),
            items: Vec::new(),
        }
    }
}

impl SceneDocument {
    const fn default_version() -> u32 {
        SCENE_DOCUMENT_VERSION
    }

    /// Build a document from a runtime scene.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            version: SCENE_DOCUMENT_VERSION,
            background: scene.background().clone(),
            items: scene.items().to_vec(),
        }
    }

    /// Materialize the document as a scene with nothing selected.
    ///
    /// Undersized items are raised to their floor and repeated ids are
    /// dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnsupportedVersion`] for documents newer than
    /// this build understands, and [`EditorError::InvalidInput`] if the
    /// background or any item fails validation (see [`SceneItem::validate`]).
    pub fn into_scene(self) -> EditorResult<Scene> {
        if self.version == 0 || self.version > SCENE_DOCUMENT_VERSION {
            return Err(EditorError::UnsupportedVersion(self.version));
        }
        self.background.validate()?;
        for item in &self.items {
            item.validate()?;
        }
        Ok(scene::assemble(self.background, self.items))
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or does not describe a scene.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&Scene> for SceneDocument {
    fn from(scene: &Scene) -> Self {
        Self::from_scene(scene)
    }
}
