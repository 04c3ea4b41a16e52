//! # Command Layer
//!
//! One submodule per user-facing operation. Each command takes a
//! [`Session`](crate::session::Session), does its work through it, and returns
//! a structured [`CmdResult`]; nothing here formats text for a terminal.
//!
//! ## What Commands Do NOT Do
//!
//! - **I/O**: no stdout/stderr, no exit codes
//! - **Argument parsing**: routes arrive already parsed (see [`crate::api`])
//! - **Prompts**: destructive commands just do what they are told
//!
//! ## Testing
//!
//! Command tests run against an in-memory store via
//! [`StoreFixture`](crate::store::memory::fixtures::StoreFixture).
//!
//! ## Command Modules
//!
//! - [`view`]: One resolved entry
//! - [`edit`]: Upsert an overlay patch
//! - [`revert`]: Drop one patch or the whole overlay
//! - [`history`]: One exercise across a period
//! - [`search`]: Substring search over resolved entries
//! - [`tree`]: Outline of the hierarchy
//! - [`structure`]: Add and remove nodes
//! - [`export`]: Merge the overlay into a new base document
//! - [`import`]: Replace the base document
//! - [`reset`]: Forget the stored base, back to the source

use crate::address::Selection;
use crate::error::Level;
use crate::model::BaseDocument;
use crate::resolve::ResolvedEntry;
use serde::Serialize;

pub mod edit;
pub mod export;
pub mod history;
pub mod import;
pub mod reset;
pub mod revert;
pub mod search;
pub mod structure;
pub mod tree;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// One line of a hierarchy outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineRow {
    pub level: Level,
    /// 0 for periods, 4 for exercises.
    pub depth: usize,
    pub label: String,
    pub route: String,
    /// Exercises only: whether an overlay patch applies.
    pub patched: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Entries the command touched or listed.
    pub entries: Vec<ResolvedEntry>,
    pub outline: Vec<OutlineRow>,
    /// Selection after the command ran, for commands that move it.
    pub selection: Option<Selection>,
    /// Exported document.
    pub document: Option<BaseDocument>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_entries(mut self, entries: Vec<ResolvedEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("1 {}", word)
    } else {
        format!("{} {}s", count, word)
    }
}
