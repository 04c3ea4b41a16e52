use serde::Serialize;
use thiserror::Error;

/// Hierarchy level at which a lookup or mutation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Period,
    Block,
    Week,
    Day,
    Exercise,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Period => "period",
            Level::Block => "block",
            Level::Week => "week",
            Level::Day => "day",
            Level::Exercise => "exercise",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum TrainlogError {
    #[error("No such {level}: {path}")]
    NotFound { level: Level, path: String },

    #[error("A {level} with id '{id}' already exists")]
    DuplicateIdentifier { level: Level, id: String },

    #[error("Invalid {level} identifier: {reason}")]
    InvalidIdentifier { level: Level, reason: String },

    #[error("Stored overlay is malformed: {0}")]
    MalformedOverlay(String),

    #[error("Base document is malformed: {0}")]
    MalformedBaseImport(String),

    #[error("Could not load base document: {0}")]
    Transport(String),

    #[error("Write to '{key}' rejected: {size} bytes exceeds the {limit} byte limit")]
    OversizedWrite {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl TrainlogError {
    pub fn not_found(level: Level, path: impl Into<String>) -> Self {
        TrainlogError::NotFound {
            level,
            path: path.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TrainlogError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, TrainlogError>;
