//! # Entry Resolver
//!
//! Combines the hierarchy and the overlay into the only view consumers ever
//! see: a [`ResolvedEntry`]. Resolution is deterministic and side-effect free;
//! the ancestor context it carries (`periodName`, `blockId`, `week`, `day`) is
//! computed here and never stored.

use crate::address::Locator;
use crate::error::Result;
use crate::hierarchy::{locate, walk, EntryRef};
use crate::model::BaseDocument;
use crate::overlay::{apply_patch, Overlay, ResolvedFields};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntry {
    pub period_id: String,
    pub period_name: String,
    pub block_id: u32,
    pub week: u32,
    pub day: u32,
    pub day_label: String,
    pub exercise_id: String,
    pub name: String,
    pub work: String,
    pub videos: Vec<String>,
    pub lifter_comment: String,
    pub coach_comment: String,
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether any overlay patch contributed to this view.
    pub patched: bool,
}

impl ResolvedEntry {
    pub fn locator(&self) -> Locator {
        Locator::new(
            self.period_id.clone(),
            self.block_id,
            self.week,
            self.day,
            self.exercise_id.clone(),
        )
    }

    fn build(entry: EntryRef<'_>, overlay: &Overlay) -> Self {
        let patch = overlay.get(&entry.locator().key());
        let fields = match patch {
            Some(patch) => apply_patch(entry.exercise, patch),
            None => ResolvedFields::from_base(entry.exercise),
        };
        Self {
            period_id: entry.period.id.clone(),
            period_name: entry.period.name.clone(),
            block_id: entry.block.id,
            week: entry.week.week,
            day: entry.day.day,
            day_label: entry.day.label.clone(),
            exercise_id: entry.exercise.id.clone(),
            name: entry.exercise.name.clone(),
            work: fields.work,
            videos: fields.videos,
            lifter_comment: fields.lifter_comment,
            coach_comment: fields.coach_comment,
            updated_at: fields.updated_at,
            patched: patch.is_some(),
        }
    }

    /// Text searched by [`search`].
    fn haystack(&self) -> String {
        [
            self.period_name.as_str(),
            self.period_id.as_str(),
            self.block_id.to_string().as_str(),
            self.week.to_string().as_str(),
            self.day.to_string().as_str(),
            self.name.as_str(),
            self.work.as_str(),
            self.lifter_comment.as_str(),
            self.coach_comment.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

/// Base exercise at `locator` with its patch applied. `NotFound` iff the
/// hierarchy chain fails.
pub fn resolve(doc: &BaseDocument, overlay: &Overlay, locator: &Locator) -> Result<ResolvedEntry> {
    let entry = locate(doc, locator)?;
    Ok(ResolvedEntry::build(entry, overlay))
}

/// Every exercise named `exercise_name` within a period, ordered by
/// `(block, week, day)`. Names compare case-insensitively after trimming.
pub fn resolve_history(
    doc: &BaseDocument,
    overlay: &Overlay,
    period_id: &str,
    exercise_name: &str,
) -> Vec<ResolvedEntry> {
    let wanted = exercise_name.trim().to_lowercase();
    let mut entries: Vec<ResolvedEntry> = walk(doc)
        .filter(|e| e.period.id == period_id)
        .filter(|e| e.exercise.name.trim().to_lowercase() == wanted)
        .map(|e| ResolvedEntry::build(e, overlay))
        .collect();
    // sort_by_key is stable
    entries.sort_by_key(|e| (e.block_id, e.week, e.day));
    entries
}

/// Case-insensitive substring search over every exercise, in document order.
pub fn search(doc: &BaseDocument, overlay: &Overlay, query: &str) -> Vec<ResolvedEntry> {
    let needle = query.to_lowercase();
    walk(doc)
        .map(|e| ResolvedEntry::build(e, overlay))
        .filter(|e| e.haystack().contains(&needle))
        .collect()
}
