//! # Merge / Export
//!
//! Folds an overlay into a copy of the base document, producing a new
//! self-contained base. This is the only way overlay content becomes part of
//! a distributable document.
//!
//! Patches whose key does not decode, or whose locator no longer resolves in
//! the base, are not applied. [`merge_overlay_into_base`] skips them silently;
//! [`merge_with_report`] lists them so a caller can warn about stale edits.

use crate::address::decode;
use crate::hierarchy::exercise_mut;
use crate::model::BaseDocument;
use crate::overlay::{apply_patch, Overlay};

/// A merged document plus which overlay keys made it in.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    pub document: BaseDocument,
    pub applied: Vec<String>,
    pub dropped: Vec<String>,
}

/// New base document with every applicable patch written in. Pure: neither
/// input is modified.
pub fn merge_overlay_into_base(doc: &BaseDocument, overlay: &Overlay) -> BaseDocument {
    merge_with_report(doc, overlay).document
}

pub fn merge_with_report(doc: &BaseDocument, overlay: &Overlay) -> MergeReport {
    let mut document = doc.clone();
    let mut applied = Vec::new();
    let mut dropped = Vec::new();

    for (key, patch) in overlay.iter() {
        let target = decode(key).and_then(|loc| exercise_mut(&mut document, &loc));
        match target {
            Some(exercise) => {
                apply_patch(exercise, patch).write_into(exercise);
                applied.push(key.to_string());
            }
            None => dropped.push(key.to_string()),
        }
    }

    if !dropped.is_empty() {
        tracing::warn!(
            dropped = dropped.len(),
            "overlay entries did not resolve against the base and were not merged"
        );
    }
    tracing::debug!(applied = applied.len(), "merged overlay into base");

    MergeReport {
        document,
        applied,
        dropped,
    }
}
