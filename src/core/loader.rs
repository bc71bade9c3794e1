//! Loading stories from script text, script files or a RON manifest.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::lexer::ParseError;
use crate::core::parser::parse_story;
use crate::core::story::{BuildError, InventoryListener, Story};
use crate::schema::event::InventoryUpdated;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("build error: {0}")]
    Build(#[from] BuildError),
    #[error("start passage not found: {0}")]
    StartNotFound(String),
    #[error("no story script was provided")]
    MissingScript,
}

/// Story configuration stored next to the script.
///
/// ```ron
/// (
///     script: "newburyport.twee",
///     start: Some("Newburyport"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryManifest {
    /// Script path, relative to the manifest file once loaded from disk.
    pub script: PathBuf,
    #[serde(default)]
    pub start: Option<String>,
    /// Overrides the `StoryTitle` block.
    #[serde(default)]
    pub title: Option<String>,
}

impl StoryManifest {
    /// Load a manifest from a RON file, resolving `script` against the
    /// manifest's directory.
    pub fn load_from_ron(path: &Path) -> Result<StoryManifest, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        let mut manifest = Self::parse_ron(&contents)?;
        if manifest.script.is_relative() {
            if let Some(dir) = path.parent() {
                manifest.script = dir.join(&manifest.script);
            }
        }
        Ok(manifest)
    }

    pub fn parse_ron(input: &str) -> Result<StoryManifest, LoadError> {
        Ok(ron::from_str(input)?)
    }
}

/// Builder for a playable [`Story`]. Obtained from [`Story::builder`].
///
/// Values given directly take precedence over those from a manifest.
#[derive(Default)]
pub struct StoryBuilder {
    script: Option<String>,
    script_path: Option<PathBuf>,
    manifest_path: Option<PathBuf>,
    manifest: Option<StoryManifest>,
    start: Option<String>,
    title: Option<String>,
    listeners: Vec<InventoryListener>,
}

impl StoryBuilder {
    /// Provide the script text directly.
    pub fn script(mut self, source: &str) -> Self {
        self.script = Some(source.to_string());
        self
    }

    pub fn script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    pub fn manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Provide an already loaded manifest (for testing without files).
    pub fn with_manifest(mut self, manifest: StoryManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn start(mut self, title: &str) -> Self {
        self.start = Some(title.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&InventoryUpdated) + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn build(self) -> Result<Story, LoadError> {
        let manifest = match (self.manifest, &self.manifest_path) {
            (Some(manifest), _) => Some(manifest),
            (None, Some(path)) => Some(StoryManifest::load_from_ron(path)?),
            (None, None) => None,
        };
        let (manifest_script, manifest_start, manifest_title) = match manifest {
            Some(m) => (Some(m.script), m.start, m.title),
            None => (None, None, None),
        };

        let source = match (self.script, self.script_path.or(manifest_script)) {
            (Some(source), _) => source,
            (None, Some(path)) => {
                debug!(path = %path.display(), "reading story script");
                std::fs::read_to_string(&path)?
            }
            (None, None) => return Err(LoadError::MissingScript),
        };

        let mut story = Story::from_raw(parse_story(&source)?)?;

        if let Some(title) = self.title.or(manifest_title) {
            story.set_title(title);
        }
        if let Some(start) = self.start.or(manifest_start) {
            if story.set_start(&start).is_err() {
                return Err(LoadError::StartNotFound(start));
            }
        }
        for listener in self.listeners {
            story.add_listener(listener);
        }

        debug!(title = %story.title(), "story loaded");
        Ok(story)
    }
}
