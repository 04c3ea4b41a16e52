//! # Overlay Store: Private Edits on Top of the Base
//!
//! The overlay maps entry keys (see [`crate::address::encode`]) to a [`Patch`].
//! A patch is sparse: each overlayable field is either present (`Some`) and
//! overrides the base value, or absent (`None`) and falls through to it.
//!
//! ## Write Rule
//!
//! [`Overlay::upsert`] merges the provided fields over the existing patch and
//! stamps `updatedAt` with the current time, every time. Patches are not a
//! history: the newest value of each field wins.
//!
//! ## Read Rule
//!
//! [`apply_patch`] overrides field by field. A `videos` patch replaces the base
//! list wholesale; nothing is appended.
//!
//! ## Stored Form
//!
//! ```json
//! { "serie-1-2026|1|1|1|squat": { "videos": ["https://youtu.be/abc123"], "updatedAt": "..." } }
//! ```
//!
//! When a stored overlay is read back, a field with the wrong JSON shape is
//! read as absent, and an entry that is not an object with a valid `updatedAt`
//! is skipped. A blob that is not a JSON object at all is `MalformedOverlay`.

use crate::address::{decode, Selection};
use crate::error::{Result, TrainlogError};
use crate::model::Exercise;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The overlayable fields of an exercise, each present or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchFields {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub work: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub videos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub lifter_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub coach_comment: Option<String>,
}

impl PatchFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work(mut self, work: impl Into<String>) -> Self {
        self.work = Some(work.into());
        self
    }

    pub fn with_videos(mut self, videos: Vec<String>) -> Self {
        self.videos = Some(videos);
        self
    }

    pub fn with_lifter_comment(mut self, comment: impl Into<String>) -> Self {
        self.lifter_comment = Some(comment.into());
        self
    }

    pub fn with_coach_comment(mut self, comment: impl Into<String>) -> Self {
        self.coach_comment = Some(comment.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.work.is_none()
            && self.videos.is_none()
            && self.lifter_comment.is_none()
            && self.coach_comment.is_none()
    }

    /// Fields present in `newer` replace ours; the rest are kept.
    fn merge_from(&mut self, newer: PatchFields) {
        if newer.work.is_some() {
            self.work = newer.work;
        }
        if newer.videos.is_some() {
            self.videos = newer.videos;
        }
        if newer.lifter_comment.is_some() {
            self.lifter_comment = newer.lifter_comment;
        }
        if newer.coach_comment.is_some() {
            self.coach_comment = newer.coach_comment;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    #[serde(flatten)]
    pub fields: PatchFields,
    pub updated_at: DateTime<Utc>,
}

/// Field values after applying an optional patch to a base exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFields {
    pub work: String,
    pub videos: Vec<String>,
    pub lifter_comment: String,
    pub coach_comment: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResolvedFields {
    pub fn from_base(base: &Exercise) -> Self {
        Self {
            work: base.work.clone(),
            videos: base.videos.clone(),
            lifter_comment: base.lifter_comment.clone(),
            coach_comment: base.coach_comment.clone(),
            updated_at: base.updated_at,
        }
    }

    /// Overwrites the overlayable fields of `exercise`.
    pub fn write_into(self, exercise: &mut Exercise) {
        exercise.work = self.work;
        exercise.videos = self.videos;
        exercise.lifter_comment = self.lifter_comment;
        exercise.coach_comment = self.coach_comment;
        exercise.updated_at = self.updated_at;
    }
}

/// Field-level override of `base` by `patch`.
pub fn apply_patch(base: &Exercise, patch: &Patch) -> ResolvedFields {
    let fields = &patch.fields;
    ResolvedFields {
        work: fields.work.clone().unwrap_or_else(|| base.work.clone()),
        videos: fields.videos.clone().unwrap_or_else(|| base.videos.clone()),
        lifter_comment: fields
            .lifter_comment
            .clone()
            .unwrap_or_else(|| base.lifter_comment.clone()),
        coach_comment: fields
            .coach_comment
            .clone()
            .unwrap_or_else(|| base.coach_comment.clone()),
        updated_at: Some(patch.updated_at),
    }
}

/// Entry key → patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Overlay {
    patches: BTreeMap<String, Patch>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Patch> {
        self.patches.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.patches.contains_key(key)
    }

    /// Merges `fields` over the existing patch for `key` and stamps it now.
    pub fn upsert(&mut self, key: impl Into<String>, fields: PatchFields) -> &Patch {
        self.upsert_at(key, fields, Utc::now())
    }

    pub fn upsert_at(
        &mut self,
        key: impl Into<String>,
        fields: PatchFields,
        now: DateTime<Utc>,
    ) -> &Patch {
        let patch = self.patches.entry(key.into()).or_insert_with(|| Patch {
            fields: PatchFields::default(),
            updated_at: now,
        });
        patch.fields.merge_from(fields);
        patch.updated_at = now;
        patch
    }

    /// Removes the patch for `key`. Returns whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.patches.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.patches.clear();
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.patches.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Patch)> {
        self.patches.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Deletes every patch whose key decodes to a locator under `selection`.
    /// Undecodable keys are left alone. Returns the removed keys.
    pub fn purge_under(&mut self, selection: &Selection) -> Vec<String> {
        let doomed: Vec<String> = self
            .patches
            .keys()
            .filter(|key| decode(key).is_some_and(|loc| selection.contains(&loc)))
            .cloned()
            .collect();
        for key in &doomed {
            self.patches.remove(key);
        }
        doomed
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a stored overlay. Individual entries that do not parse as a patch
    /// are skipped with a warning.
    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| TrainlogError::MalformedOverlay(e.to_string()))?;

        let mut patches = BTreeMap::new();
        for (key, value) in entries {
            match serde_json::from_value::<Patch>(value) {
                Ok(patch) => {
                    patches.insert(key, patch);
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "skipping malformed overlay entry");
                }
            }
        }
        Ok(Self { patches })
    }
}

/// Deserializes `T`, or yields `None` when the value has a different shape.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Locator;
    use chrono::TimeZone;

    fn base() -> Exercise {
        let mut ex = Exercise::new("Squat").with_work("5x5");
        ex.videos = vec!["https://youtu.be/base".into()];
        ex.coach_comment = "Brace".into();
        ex
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn upsert_then_get_returns_set_fields() {
        let mut overlay = Overlay::new();
        overlay.upsert("k", PatchFields::new().with_work("3x3"));
        let patch = overlay.get("k").unwrap();
        assert_eq!(patch.fields.work.as_deref(), Some("3x3"));
        assert_eq!(patch.fields.videos, None);
    }

    #[test]
    fn upsert_keeps_fields_not_provided() {
        let mut overlay = Overlay::new();
        overlay.upsert_at("k", PatchFields::new().with_work("3x3"), at(10));
        overlay.upsert_at("k", PatchFields::new().with_lifter_comment("felt heavy"), at(20));

        let patch = overlay.get("k").unwrap();
        assert_eq!(patch.fields.work.as_deref(), Some("3x3"));
        assert_eq!(patch.fields.lifter_comment.as_deref(), Some("felt heavy"));
        assert_eq!(patch.updated_at, at(20));
    }

    #[test]
    fn upsert_provided_field_wins() {
        let mut overlay = Overlay::new();
        overlay.upsert("k", PatchFields::new().with_work("3x3"));
        overlay.upsert("k", PatchFields::new().with_work("1x1"));
        assert_eq!(overlay.get("k").unwrap().fields.work.as_deref(), Some("1x1"));
    }

    #[test]
    fn upsert_stamps_even_when_empty() {
        let mut overlay = Overlay::new();
        overlay.upsert_at("k", PatchFields::new(), at(5));
        overlay.upsert_at("k", PatchFields::new(), at(6));
        assert_eq!(overlay.get("k").unwrap().updated_at, at(6));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut overlay = Overlay::new();
        overlay.upsert("k", PatchFields::new().with_work("x"));
        assert!(overlay.delete("k"));
        assert!(!overlay.delete("k"));
        assert!(overlay.is_empty());
    }

    #[test]
    fn apply_patch_overrides_per_field() {
        let patch = Patch {
            fields: PatchFields::new().with_videos(vec!["https://youtu.be/abc123".into()]),
            updated_at: at(100),
        };
        let resolved = apply_patch(&base(), &patch);
        assert_eq!(resolved.work, "5x5");
        assert_eq!(resolved.videos, vec!["https://youtu.be/abc123"]);
        assert_eq!(resolved.coach_comment, "Brace");
        assert_eq!(resolved.updated_at, Some(at(100)));
    }

    #[test]
    fn empty_videos_patch_replaces_base_list() {
        let patch = Patch {
            fields: PatchFields::new().with_videos(vec![]),
            updated_at: at(1),
        };
        assert!(apply_patch(&base(), &patch).videos.is_empty());
    }

    #[test]
    fn purge_under_removes_only_descendants() {
        let mut overlay = Overlay::new();
        let a = Locator::new("p", 1, 1, 1, "squat").key();
        let b = Locator::new("p", 1, 1, 2, "squat").key();
        let c = Locator::new("p", 2, 1, 1, "squat").key();
        for key in [&a, &b, &c] {
            overlay.upsert(key.clone(), PatchFields::new().with_work("x"));
        }
        overlay.upsert("not-a-key", PatchFields::new().with_work("x"));

        let removed = overlay.purge_under(&Selection::block("p", 1));
        assert_eq!(removed.len(), 2);
        assert!(!overlay.contains(&a));
        assert!(!overlay.contains(&b));
        assert!(overlay.contains(&c));
        assert!(overlay.contains("not-a-key"));
    }

    #[test]
    fn stored_round_trip() {
        let mut overlay = Overlay::new();
        overlay.upsert_at("k", PatchFields::new().with_coach_comment("Good"), at(42));
        let json = overlay.to_json().unwrap();
        assert!(json.contains("coachComment"));
        assert!(!json.contains("lifterComment"));
        assert_eq!(Overlay::from_json(&json).unwrap(), overlay);
    }

    #[test]
    fn wrong_shape_fields_read_as_absent() {
        let raw = r#"{"k": {"work": 5, "videos": "not-a-list", "coachComment": "ok",
                        "updatedAt": "2026-01-01T00:00:00Z"}}"#;
        let overlay = Overlay::from_json(raw).unwrap();
        let patch = overlay.get("k").unwrap();
        assert_eq!(patch.fields.work, None);
        assert_eq!(patch.fields.videos, None);
        assert_eq!(patch.fields.coach_comment.as_deref(), Some("ok"));
    }

    #[test]
    fn entries_without_timestamp_are_skipped() {
        let raw = r#"{"a": {"work": "1x1"}, "b": 7,
                      "c": {"work": "2x2", "updatedAt": "2026-01-01T00:00:00Z"}}"#;
        let overlay = Overlay::from_json(raw).unwrap();
        assert_eq!(overlay.len(), 1);
        assert!(overlay.contains("c"));
    }

    #[test]
    fn non_object_blob_is_malformed() {
        assert!(matches!(
            Overlay::from_json("[1,2,3]"),
            Err(TrainlogError::MalformedOverlay(_))
        ));
        assert!(matches!(
            Overlay::from_json("not json"),
            Err(TrainlogError::MalformedOverlay(_))
        ));
    }
}
