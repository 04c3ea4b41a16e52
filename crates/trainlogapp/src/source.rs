//! # Base Document Source
//!
//! Where the shared base document comes from when no imported replacement is
//! stored. The contract toward the rest of the crate is "a valid
//! [`BaseDocument`] or `Transport`": a file that does not parse, or whose ids
//! fail [`BaseDocument::validate`], is a transport failure.
//!
//! A failed fetch is terminal to a session: nothing else works without a base,
//! so there is no retry and no fallback to an empty document.

use crate::error::{Result, TrainlogError};
use crate::model::BaseDocument;
use std::fs;
use std::path::PathBuf;

pub trait BaseSource {
    fn fetch(&self) -> Result<BaseDocument>;

    /// Human-readable origin, for messages.
    fn describe(&self) -> String;
}

/// Reads the base document from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BaseSource for FileSource {
    fn fetch(&self) -> Result<BaseDocument> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            TrainlogError::Transport(format!("{}: {}", self.path.display(), e))
        })?;
        let doc = BaseDocument::from_json(&raw).map_err(|e| {
            TrainlogError::Transport(format!("{}: {}", self.path.display(), e))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            periods = doc.periods.len(),
            "loaded base document"
        );
        Ok(doc)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A source with no transport: either a fixed document or a fixed failure.
#[derive(Debug, Clone)]
pub struct StaticSource {
    outcome: std::result::Result<BaseDocument, String>,
}

impl StaticSource {
    pub fn new(doc: BaseDocument) -> Self {
        Self { outcome: Ok(doc) }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
        }
    }
}

impl BaseSource for StaticSource {
    fn fetch(&self) -> Result<BaseDocument> {
        self.outcome.clone().map_err(TrainlogError::Transport)
    }

    fn describe(&self) -> String {
        "built-in document".to_string()
    }
}

/// Used when no source is configured: every fetch fails with a pointer to the
/// setting.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredSource;

impl BaseSource for UnconfiguredSource {
    fn fetch(&self) -> Result<BaseDocument> {
        Err(TrainlogError::Transport(
            "no base document source configured (set `source` or TRAINLOG_SOURCE)".to_string(),
        ))
    }

    fn describe(&self) -> String {
        "unconfigured".to_string()
    }
}
