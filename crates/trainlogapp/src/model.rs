//! # Domain Model: The Base Document
//!
//! A base document is a strictly nested tree:
//!
//! ```text
//! BaseDocument
//! └── Period   { id: slug, name }
//!     └── Block    { id: n }
//!         └── Week     { week: n }
//!             └── Day      { day: n, label }
//!                 └── Exercise { id: slug, name, work, videos, comments, updatedAt }
//! ```
//!
//! Each level is unique within its parent: periods and exercises by slug,
//! blocks/weeks/days by number.
//!
//! ## Wire Format
//!
//! Documents are JSON with camelCase field names. Documents written by hand (or
//! by older tooling) are accepted leniently:
//!
//! - Block/week/day numbers may be JSON numbers or decimal strings (`1` or `"1"`).
//!   They are normalized to `u32` here, so nothing downstream compares text
//!   against numbers.
//! - Missing or `null` text fields become empty strings, a missing `videos`
//!   becomes an empty list and a missing `updatedAt` becomes `null`.
//!
//! On output numbers are always written as numbers.
//!
//! ## Slugs
//!
//! Period and exercise ids are slugs derived from display names via
//! [`slugify`]. A slug only ever contains `[a-z0-9-]`, which keeps the entry
//! key separator (see [`crate::address`]) out of every identifier.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseDocument {
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(deserialize_with = "numeric_id")]
    pub id: u32,
    #[serde(default)]
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    #[serde(deserialize_with = "numeric_id")]
    pub week: u32,
    #[serde(default)]
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    #[serde(deserialize_with = "numeric_id")]
    pub day: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub label: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub work: String,
    #[serde(default, deserialize_with = "nullable_videos")]
    pub videos: Vec<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub lifter_comment: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub coach_comment: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BaseDocument {
    pub fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    /// Parses and [`validate`](Self::validate)s a document.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let doc: Self = serde_json::from_str(raw)?;
        doc.validate().map_err(serde_json::Error::custom)?;
        Ok(doc)
    }

    /// Checks the identifier rules entry keys depend on: period and exercise
    /// ids are slugs, numbers are positive, and no two siblings share an id.
    pub fn validate(&self) -> Result<(), String> {
        check_siblings("period", "document", self.periods.iter().map(|p| p.id.as_str()), |id| {
            is_slug(id)
        })?;
        for period in &self.periods {
            let at = format!("p/{}", period.id);
            check_siblings("block", &at, period.blocks.iter().map(|b| b.id), |n| *n > 0)?;
            for block in &period.blocks {
                let at = format!("{}/b/{}", at, block.id);
                check_siblings("week", &at, block.weeks.iter().map(|w| w.week), |n| *n > 0)?;
                for week in &block.weeks {
                    let at = format!("{}/w/{}", at, week.week);
                    check_siblings("day", &at, week.days.iter().map(|d| d.day), |n| *n > 0)?;
                    for day in &week.days {
                        let at = format!("{}/d/{}", at, day.day);
                        check_siblings(
                            "exercise",
                            &at,
                            day.exercises.iter().map(|e| e.id.as_str()),
                            |id| is_slug(id),
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Total number of exercises in the document.
    pub fn exercise_count(&self) -> usize {
        crate::hierarchy::walk(self).count()
    }
}

impl Period {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

impl Block {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            weeks: Vec::new(),
        }
    }

    pub fn with_weeks(mut self, weeks: Vec<Week>) -> Self {
        self.weeks = weeks;
        self
    }
}

impl Week {
    pub fn new(week: u32) -> Self {
        Self {
            week,
            days: Vec::new(),
        }
    }

    pub fn with_days(mut self, days: Vec<Day>) -> Self {
        self.days = days;
        self
    }
}

impl Day {
    pub fn new(day: u32, label: impl Into<String>) -> Self {
        Self {
            day,
            label: label.into(),
            exercises: Vec::new(),
        }
    }

    pub fn with_exercises(mut self, exercises: Vec<Exercise>) -> Self {
        self.exercises = exercises;
        self
    }
}

impl Exercise {
    /// A new exercise with empty content. The id is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            work: String::new(),
            videos: Vec::new(),
            lifter_comment: String::new(),
            coach_comment: String::new(),
            updated_at: None,
        }
    }

    pub fn with_work(mut self, work: impl Into<String>) -> Self {
        self.work = work.into();
        self
    }
}

/// Derives a URL-safe identifier from display text.
///
/// Lowercases ASCII alphanumerics and collapses every run of other characters
/// into a single `-`. Leading and trailing dashes are dropped, so a name made
/// only of punctuation yields an empty slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Whether `id` is already in [`slugify`] form (and non-empty).
pub fn is_slug(id: &str) -> bool {
    !id.is_empty() && slugify(id) == id
}

fn check_siblings<T, I, F>(level: &str, parent: &str, ids: I, valid: F) -> Result<(), String>
where
    T: Eq + Hash + fmt::Display,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> bool,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !valid(&id) {
            return Err(format!("invalid {} id '{}' in {}", level, id, parent));
        }
        let text = id.to_string();
        if !seen.insert(id) {
            return Err(format!("duplicate {} id '{}' in {}", level, text, parent));
        }
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

/// Accepts `1` or `"1"` and normalizes to `u32`.
fn numeric_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => u32::try_from(n)
            .map_err(|_| D::Error::custom(format!("identifier {} out of range", n))),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| D::Error::custom(format!("identifier '{}' is not a number", s))),
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_videos<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Back Squat"), "back-squat");
        assert_eq!(slugify("  Série 1 / 2026 "), "s-rie-1-2026");
        assert_eq!(slugify("RDL (paused)"), "rdl-paused");
    }

    #[test]
    fn slugify_punctuation_only_is_empty() {
        assert_eq!(slugify("  --- !! "), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slugify_never_emits_separator() {
        assert!(!slugify("a|b|c").contains('|'));
    }

    #[test]
    fn numeric_ids_accept_numbers_and_strings() {
        let raw = r#"{"periods":[{"id":"p","name":"P","blocks":[
            {"id":"2","weeks":[{"week":3,"days":[{"day":" 4 ","exercises":[]}]}]}
        ]}]}"#;
        let doc = BaseDocument::from_json(raw).unwrap();
        let block = &doc.periods[0].blocks[0];
        assert_eq!(block.id, 2);
        assert_eq!(block.weeks[0].week, 3);
        assert_eq!(block.weeks[0].days[0].day, 4);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let raw = r#"{"periods":[{"id":"p","name":"P","blocks":[{"id":"one"}]}]}"#;
        assert!(BaseDocument::from_json(raw).is_err());
    }

    #[test]
    fn missing_exercise_fields_default() {
        let raw = r#"{"periods":[{"id":"p","name":"P","blocks":[{"id":1,"weeks":[{"week":1,"days":[
            {"day":1,"exercises":[{"id":"squat","name":"Squat","work":null}]}
        ]}]}]}]}"#;
        let doc = BaseDocument::from_json(raw).unwrap();
        let ex = &doc.periods[0].blocks[0].weeks[0].days[0].exercises[0];
        assert_eq!(ex.work, "");
        assert!(ex.videos.is_empty());
        assert_eq!(ex.lifter_comment, "");
        assert_eq!(ex.updated_at, None);
        assert_eq!(doc.periods[0].blocks[0].weeks[0].days[0].label, "");
    }

    #[test]
    fn numbers_are_written_as_numbers() {
        let doc = BaseDocument::new(vec![Period::new("p", "P").with_blocks(vec![Block::new(7)])]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["periods"][0]["blocks"][0]["id"], serde_json::json!(7));
    }

    #[test]
    fn exercise_serializes_camel_case() {
        let ex = Exercise::new("Bench Press");
        let json = serde_json::to_value(&ex).unwrap();
        assert_eq!(json["id"], "bench-press");
        assert!(json.get("lifterComment").is_some());
        assert!(json.get("coachComment").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn slug_check() {
        assert!(is_slug("serie-1-2026"));
        assert!(!is_slug(""));
        assert!(!is_slug("Squat"));
        assert!(!is_slug("a|1"));
        assert!(!is_slug("a--b"));
        assert!(!is_slug("-a"));
    }

    fn one_exercise(period: &str, block: &str, exercises: &str) -> String {
        format!(
            r#"{{"periods":[{{"id":"{}","name":"P","blocks":[{{"id":{},"weeks":[{{"week":1,"days":[
                {{"day":1,"exercises":[{}]}}
            ]}}]}}]}}]}}"#,
            period, block, exercises
        )
    }

    #[test]
    fn ids_must_keep_entry_keys_distinct() {
        let squat = r#"{"id":"squat","name":"Squat"}"#;
        assert!(BaseDocument::from_json(&one_exercise("p", "1", squat)).is_ok());

        let err = BaseDocument::from_json(&one_exercise("a|1", "1", squat)).unwrap_err();
        assert!(err.to_string().contains("invalid period id 'a|1'"));
        assert!(BaseDocument::from_json(&one_exercise("p", "1", r#"{"id":"1|x"}"#)).is_err());
        assert!(BaseDocument::from_json(&one_exercise("p", "1", r#"{"id":""}"#)).is_err());
        assert!(BaseDocument::from_json(&one_exercise("p", "0", squat)).is_err());

        let twice = format!("{},{}", squat, squat);
        let err = BaseDocument::from_json(&one_exercise("p", "1", &twice)).unwrap_err();
        assert!(err.to_string().contains("duplicate exercise id 'squat' in p/p/b/1/w/1/d/1"));
    }

    #[test]
    fn duplicate_numbers_are_rejected() {
        let raw = r#"{"periods":[{"id":"p","name":"P","blocks":[{"id":1},{"id":"1"}]}]}"#;
        let err = BaseDocument::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate block id '1' in p/p"));
    }

    #[test]
    fn fixtures_are_valid() {
        assert!(crate::test_utils::sample_document().validate().is_ok());
        assert!(crate::test_utils::scenario_document().validate().is_ok());
    }

    #[test]
    fn document_requires_periods_array() {
        assert!(BaseDocument::from_json("{}").is_err());
        assert!(BaseDocument::from_json(r#"{"periods":{}}"#).is_err());
        assert!(BaseDocument::from_json(r#"{"periods":[]}"#)
            .unwrap()
            .periods
            .is_empty());
    }
}
