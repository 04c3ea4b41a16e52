//! # Structure Mutator
//!
//! Inserts and removals at every level of the base document.
//!
//! ## Inserts
//!
//! Every insert follows the same steps, and touches nothing unless all pass:
//!
//! 1. **Validate** the candidate identifier: names must slugify to something
//!    non-empty (periods, exercises), numbers must be positive (blocks, weeks,
//!    days). Failure is `InvalidIdentifier`.
//! 2. **Locate** the parent. Failure is `NotFound`.
//! 3. **Reject duplicates** at the target level with `DuplicateIdentifier`.
//! 4. **Insert and order**: periods keep insertion order, blocks/weeks/days
//!    sort ascending, exercises sort by name (case-insensitive).
//!
//! ## Removals
//!
//! Removing a node first purges every overlay patch whose key decodes to a
//! locator under it, then drops the node. A patch must never outlive its
//! entry: re-creating an exercise with the same id would otherwise revive
//! stale edits.
//!
//! ## Selection Fallback
//!
//! After any structural change the caller runs [`reconcile_selection`], the one
//! place that decides what is selected next (first child wins, placeholders
//! fill empty levels).

use crate::address::{Locator, Selection};
use crate::error::{Level, Result, TrainlogError};
use crate::hierarchy::{
    check_selection, find_block_mut, find_day_mut, find_period_mut, find_week_mut,
};
use crate::model::{slugify, BaseDocument, Block, Day, Exercise, Period, Week};
use crate::overlay::Overlay;

fn valid_slug(level: Level, name: &str) -> Result<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(TrainlogError::InvalidIdentifier {
            level,
            reason: format!("name '{}' has no usable characters", name.trim()),
        });
    }
    Ok(slug)
}

fn valid_number(level: Level, n: i64) -> Result<u32> {
    match u32::try_from(n) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TrainlogError::InvalidIdentifier {
            level,
            reason: format!("{} must be a positive integer, got {}", level, n),
        }),
    }
}

fn duplicate(level: Level, id: impl ToString) -> TrainlogError {
    TrainlogError::DuplicateIdentifier {
        level,
        id: id.to_string(),
    }
}

fn period_mut<'a>(doc: &'a mut BaseDocument, period_id: &str) -> Result<&'a mut Period> {
    find_period_mut(doc, period_id)
        .ok_or_else(|| TrainlogError::not_found(Level::Period, Selection::period(period_id).to_string()))
}

fn block_mut<'a>(doc: &'a mut BaseDocument, period_id: &str, block_id: u32) -> Result<&'a mut Block> {
    let path = Selection::block(period_id, block_id).to_string();
    find_block_mut(period_mut(doc, period_id)?, block_id)
        .ok_or_else(|| TrainlogError::not_found(Level::Block, path))
}

fn week_mut<'a>(
    doc: &'a mut BaseDocument,
    period_id: &str,
    block_id: u32,
    week: u32,
) -> Result<&'a mut Week> {
    let path = Selection::week(period_id, block_id, week).to_string();
    find_week_mut(block_mut(doc, period_id, block_id)?, week)
        .ok_or_else(|| TrainlogError::not_found(Level::Week, path))
}

fn day_mut<'a>(doc: &'a mut BaseDocument, at: &Selection) -> Result<&'a mut Day> {
    let (Some(period_id), Some(block_id), Some(week), Some(day)) =
        (at.period.as_deref(), at.block, at.week, at.day)
    else {
        return Err(TrainlogError::Api(format!(
            "'{}' does not name a day",
            at
        )));
    };
    let path = at.truncated(4).to_string();
    find_day_mut(week_mut(doc, period_id, block_id, week)?, day)
        .ok_or_else(|| TrainlogError::not_found(Level::Day, path))
}

/// Appends a period named `name`. Returns its slug id.
pub fn add_period(doc: &mut BaseDocument, name: &str) -> Result<String> {
    let id = valid_slug(Level::Period, name)?;
    if doc.periods.iter().any(|p| p.id == id) {
        return Err(duplicate(Level::Period, id));
    }
    doc.periods.push(Period::new(id.clone(), name.trim()));
    tracing::info!(period = %id, "added period");
    Ok(id)
}

/// Changes a period's display name. The id (and so every entry key) is unchanged.
pub fn rename_period(doc: &mut BaseDocument, period_id: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TrainlogError::InvalidIdentifier {
            level: Level::Period,
            reason: "name must not be empty".to_string(),
        });
    }
    period_mut(doc, period_id)?.name = name.trim().to_string();
    Ok(())
}

pub fn add_block(doc: &mut BaseDocument, period_id: &str, block: i64) -> Result<u32> {
    let id = valid_number(Level::Block, block)?;
    let period = period_mut(doc, period_id)?;
    if period.blocks.iter().any(|b| b.id == id) {
        return Err(duplicate(Level::Block, id));
    }
    period.blocks.push(Block::new(id));
    period.blocks.sort_by_key(|b| b.id);
    tracing::info!(period = %period_id, block = id, "added block");
    Ok(id)
}

pub fn add_week(doc: &mut BaseDocument, period_id: &str, block_id: u32, week: i64) -> Result<u32> {
    let n = valid_number(Level::Week, week)?;
    let block = block_mut(doc, period_id, block_id)?;
    if block.weeks.iter().any(|w| w.week == n) {
        return Err(duplicate(Level::Week, n));
    }
    block.weeks.push(Week::new(n));
    block.weeks.sort_by_key(|w| w.week);
    tracing::info!(period = %period_id, block = block_id, week = n, "added week");
    Ok(n)
}

pub fn add_day(
    doc: &mut BaseDocument,
    period_id: &str,
    block_id: u32,
    week: u32,
    day: i64,
    label: &str,
) -> Result<u32> {
    let n = valid_number(Level::Day, day)?;
    let parent = week_mut(doc, period_id, block_id, week)?;
    if parent.days.iter().any(|d| d.day == n) {
        return Err(duplicate(Level::Day, n));
    }
    parent.days.push(Day::new(n, label.trim()));
    parent.days.sort_by_key(|d| d.day);
    tracing::info!(period = %period_id, block = block_id, week, day = n, "added day");
    Ok(n)
}

/// Adds an empty exercise named `name` to the day selected by `at`.
pub fn add_exercise(doc: &mut BaseDocument, at: &Selection, name: &str) -> Result<Locator> {
    let id = valid_slug(Level::Exercise, name)?;
    let day = day_mut(doc, at)?;
    if day.exercises.iter().any(|e| e.id == id) {
        return Err(duplicate(Level::Exercise, id));
    }
    day.exercises.push(Exercise::new(name.trim()));
    day.exercises.sort_by_cached_key(|e| e.name.to_lowercase());

    let mut selection = at.truncated(4);
    selection.exercise = Some(id);
    let locator = selection
        .locator()
        .ok_or_else(|| TrainlogError::Api(format!("'{}' does not name a day", at)))?;
    tracing::info!(entry = %locator, "added exercise");
    Ok(locator)
}

/// Summary of a removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    /// Overlay keys purged along with the node.
    pub purged_keys: Vec<String>,
}

/// Removes the node named by `target` (its depth picks the level) together
/// with every overlay patch beneath it.
pub fn remove(doc: &mut BaseDocument, overlay: &mut Overlay, target: &Selection) -> Result<Removal> {
    if target.is_empty() {
        return Err(TrainlogError::Api("Nothing selected to remove".to_string()));
    }
    check_selection(doc, target)?;

    let purged_keys = overlay.purge_under(target);

    match target.depth() {
        1 => doc.periods.retain(|p| Some(&p.id) != target.period.as_ref()),
        depth => {
            let parent = target.truncated(depth - 1);
            remove_child(doc, &parent, target)?;
        }
    }

    tracing::info!(
        node = %target,
        purged = purged_keys.len(),
        "removed node"
    );
    Ok(Removal { purged_keys })
}

fn remove_child(doc: &mut BaseDocument, parent: &Selection, target: &Selection) -> Result<()> {
    let period_id = parent.period.as_deref().unwrap_or_default();
    match target.depth() {
        2 => period_mut(doc, period_id)?
            .blocks
            .retain(|b| Some(b.id) != target.block),
        3 => block_mut(doc, period_id, parent.block.unwrap_or_default())?
            .weeks
            .retain(|w| Some(w.week) != target.week),
        4 => week_mut(
            doc,
            period_id,
            parent.block.unwrap_or_default(),
            parent.week.unwrap_or_default(),
        )?
        .days
        .retain(|d| Some(d.day) != target.day),
        _ => day_mut(doc, parent)?
            .exercises
            .retain(|e| Some(&e.id) != target.exercise.as_ref()),
    }
    Ok(())
}

pub fn remove_period(doc: &mut BaseDocument, overlay: &mut Overlay, period_id: &str) -> Result<Removal> {
    remove(doc, overlay, &Selection::period(period_id))
}

pub fn remove_block(
    doc: &mut BaseDocument,
    overlay: &mut Overlay,
    period_id: &str,
    block_id: u32,
) -> Result<Removal> {
    remove(doc, overlay, &Selection::block(period_id, block_id))
}

pub fn remove_week(
    doc: &mut BaseDocument,
    overlay: &mut Overlay,
    period_id: &str,
    block_id: u32,
    week: u32,
) -> Result<Removal> {
    remove(doc, overlay, &Selection::week(period_id, block_id, week))
}

pub fn remove_day(
    doc: &mut BaseDocument,
    overlay: &mut Overlay,
    period_id: &str,
    block_id: u32,
    week: u32,
    day: u32,
) -> Result<Removal> {
    remove(doc, overlay, &Selection::day(period_id, block_id, week, day))
}

pub fn remove_exercise(doc: &mut BaseDocument, overlay: &mut Overlay, locator: &Locator) -> Result<Removal> {
    remove(doc, overlay, &locator.selection())
}

pub const PLACEHOLDER_PERIOD_ID: &str = "period-1";
pub const PLACEHOLDER_PERIOD_NAME: &str = "Period 1";

/// Outcome of [`reconcile_selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub selection: Selection,
    /// True when a component of the previous selection no longer exists.
    pub invalidated: bool,
    /// Levels at which a placeholder node was inserted.
    pub placeholders: Vec<Level>,
}

/// Picks the next selection after a structural change.
///
/// Walks period → block → week → day → exercise. At each level the previous
/// component is kept if it still exists under the chosen parent; otherwise the
/// first child is taken and every lower level also takes its first child.
/// Empty period/block/week/day levels get a placeholder node (`period-1`,
/// block 1, week 1, day 1). An empty day leaves the exercise unselected.
pub fn reconcile_selection(doc: &mut BaseDocument, previous: &Selection) -> Reconciled {
    let mut walk = FallbackWalk::default();

    if doc.periods.is_empty() {
        doc.periods
            .push(Period::new(PLACEHOLDER_PERIOD_ID, PLACEHOLDER_PERIOD_NAME));
        walk.placeholders.push(Level::Period);
    }
    let found = previous
        .period
        .as_ref()
        .and_then(|id| doc.periods.iter().position(|p| &p.id == id));
    let period = &mut doc.periods[walk.choose(found, previous.period.is_some())];

    if period.blocks.is_empty() {
        period.blocks.push(Block::new(1));
        walk.placeholders.push(Level::Block);
    }
    let found = previous
        .block
        .and_then(|id| period.blocks.iter().position(|b| b.id == id));
    let block_idx = walk.choose(found, previous.block.is_some());
    let period_id = period.id.clone();
    let block = &mut period.blocks[block_idx];

    if block.weeks.is_empty() {
        block.weeks.push(Week::new(1));
        walk.placeholders.push(Level::Week);
    }
    let found = previous
        .week
        .and_then(|n| block.weeks.iter().position(|w| w.week == n));
    let block_id = block.id;
    let week = &mut block.weeks[walk.choose(found, previous.week.is_some())];

    if week.days.is_empty() {
        week.days.push(Day::new(1, ""));
        walk.placeholders.push(Level::Day);
    }
    let found = previous
        .day
        .and_then(|n| week.days.iter().position(|d| d.day == n));
    let week_n = week.week;
    let day = &week.days[walk.choose(found, previous.day.is_some())];

    let exercise = if day.exercises.is_empty() {
        if previous.exercise.is_some() && !walk.cascading {
            walk.invalidated = true;
        }
        None
    } else {
        let found = previous
            .exercise
            .as_ref()
            .and_then(|id| day.exercises.iter().position(|e| &e.id == id));
        let idx = walk.choose(found, previous.exercise.is_some());
        Some(day.exercises[idx].id.clone())
    };

    let selection = Selection {
        period: Some(period_id),
        block: Some(block_id),
        week: Some(week_n),
        day: Some(day.day),
        exercise,
    };

    if walk.invalidated || !walk.placeholders.is_empty() {
        tracing::debug!(
            from = %previous,
            to = %selection,
            placeholders = walk.placeholders.len(),
            "selection fell back"
        );
    }

    Reconciled {
        selection,
        invalidated: walk.invalidated,
        placeholders: walk.placeholders,
    }
}

#[derive(Default)]
struct FallbackWalk {
    /// Set once a level fell back; lower levels then take their first child.
    cascading: bool,
    invalidated: bool,
    placeholders: Vec<Level>,
}

impl FallbackWalk {
    fn choose(&mut self, found: Option<usize>, requested: bool) -> usize {
        if self.cascading {
            return 0;
        }
        match found {
            Some(idx) => idx,
            None => {
                if requested {
                    self.invalidated = true;
                }
                self.cascading = true;
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{descendants, locate};
    use crate::overlay::PatchFields;
    use crate::resolve::resolve;
    use crate::test_utils::{sample_document, scenario_document};

    fn squat() -> Locator {
        Locator::new("serie-1-2026", 1, 1, 1, "squat")
    }

    #[test]
    fn add_period_slugifies_and_appends() {
        let mut doc = sample_document();
        let id = add_period(&mut doc, "  Série 3 2026 ").unwrap();
        assert_eq!(id, "s-rie-3-2026");
        let last = doc.periods.last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.name, "Série 3 2026");
    }

    #[test]
    fn add_period_rejects_empty_and_duplicate() {
        let mut doc = sample_document();
        let before = doc.clone();
        assert!(matches!(
            add_period(&mut doc, "   "),
            Err(TrainlogError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            add_period(&mut doc, "Serie 1 2026"),
            Err(TrainlogError::DuplicateIdentifier {
                level: Level::Period,
                ..
            })
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn rename_period_keeps_addressing() {
        let mut doc = sample_document();
        rename_period(&mut doc, "serie-1-2026", "Spring").unwrap();
        let entry = resolve(&doc, &Overlay::new(), &squat()).unwrap();
        assert_eq!(entry.period_name, "Spring");
    }

    #[test]
    fn blocks_sort_numerically() {
        let mut doc = sample_document();
        add_block(&mut doc, "serie-1-2026", 10).unwrap();
        add_block(&mut doc, "serie-1-2026", 3).unwrap();
        let ids: Vec<u32> = doc.periods[0].blocks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 10]);
    }

    #[test]
    fn numbers_must_be_positive() {
        let mut doc = sample_document();
        for bad in [0, -1, i64::from(u32::MAX) + 1] {
            assert!(matches!(
                add_block(&mut doc, "serie-1-2026", bad),
                Err(TrainlogError::InvalidIdentifier {
                    level: Level::Block,
                    ..
                })
            ));
        }
        assert!(matches!(
            add_week(&mut doc, "serie-1-2026", 1, 0),
            Err(TrainlogError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn invalid_identifier_checked_before_parent() {
        let mut doc = sample_document();
        assert!(matches!(
            add_day(&mut doc, "missing", 1, 1, -3, ""),
            Err(TrainlogError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn insert_into_missing_parent_is_not_found() {
        let mut doc = sample_document();
        let err = add_week(&mut doc, "serie-1-2026", 9, 1).unwrap_err();
        assert!(matches!(
            err,
            TrainlogError::NotFound {
                level: Level::Block,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_week_and_day_rejected() {
        let mut doc = sample_document();
        assert!(matches!(
            add_week(&mut doc, "serie-1-2026", 1, 2),
            Err(TrainlogError::DuplicateIdentifier { .. })
        ));
        assert!(matches!(
            add_day(&mut doc, "serie-1-2026", 1, 1, 1, "again"),
            Err(TrainlogError::DuplicateIdentifier { .. })
        ));
        add_day(&mut doc, "serie-1-2026", 1, 1, 3, " Upper ").unwrap();
        add_day(&mut doc, "serie-1-2026", 1, 1, 2, "").unwrap();
        let days: Vec<(u32, &str)> = doc.periods[0].blocks[0].weeks[0]
            .days
            .iter()
            .map(|d| (d.day, d.label.as_str()))
            .collect();
        assert_eq!(days, vec![(1, "Lower"), (2, ""), (3, "Upper")]);
    }

    #[test]
    fn exercises_sort_by_name() {
        let mut doc = sample_document();
        let at = Selection::day("serie-1-2026", 1, 1, 1);
        let loc = add_exercise(&mut doc, &at, "Pull-up").unwrap();
        add_exercise(&mut doc, &at, "arnold press").unwrap();
        assert_eq!(loc, Locator::new("serie-1-2026", 1, 1, 1, "pull-up"));
        let names: Vec<&str> = doc.periods[0].blocks[0].weeks[0].days[0]
            .exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["arnold press", "Bench Press", "Pull-up", "Squat"]);
        assert!(matches!(
            add_exercise(&mut doc, &at, "SQUAT"),
            Err(TrainlogError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn add_exercise_needs_a_day() {
        let mut doc = sample_document();
        assert!(matches!(
            add_exercise(&mut doc, &Selection::week("serie-1-2026", 1, 1), "Row"),
            Err(TrainlogError::Api(_))
        ));
    }

    #[test]
    fn remove_day_purges_overlay_under_it() {
        let mut doc = sample_document();
        let mut overlay = Overlay::new();
        let bench = Locator::new("serie-1-2026", 1, 1, 1, "bench-press");
        let other = Locator::new("serie-1-2026", 1, 2, 1, "squat");
        overlay.upsert(squat().key(), PatchFields::new().with_work("x"));
        overlay.upsert(bench.key(), PatchFields::new().with_work("y"));
        overlay.upsert(other.key(), PatchFields::new().with_work("z"));
        // orphan under the same day that base no longer has
        let orphan = Locator::new("serie-1-2026", 1, 1, 1, "gone");
        overlay.upsert(orphan.key(), PatchFields::new().with_work("w"));

        let removal = remove_day(&mut doc, &mut overlay, "serie-1-2026", 1, 1, 1).unwrap();
        assert_eq!(removal.purged_keys.len(), 3);
        assert!(!overlay.contains(&squat().key()));
        assert!(!overlay.contains(&bench.key()));
        assert!(!overlay.contains(&orphan.key()));
        assert!(overlay.contains(&other.key()));
        assert!(locate(&doc, &squat()).is_err());
    }

    #[test]
    fn remove_missing_node_is_not_found_and_keeps_overlay() {
        let mut doc = sample_document();
        let mut overlay = Overlay::new();
        let ghost = Locator::new("serie-1-2026", 7, 1, 1, "squat");
        overlay.upsert(ghost.key(), PatchFields::new().with_work("x"));
        let err = remove_block(&mut doc, &mut overlay, "serie-1-2026", 7).unwrap_err();
        assert!(err.is_not_found());
        assert!(overlay.contains(&ghost.key()));
    }

    #[test]
    fn reinserted_exercise_starts_clean() {
        let mut doc = scenario_document();
        let mut overlay = Overlay::new();
        overlay.upsert(squat().key(), PatchFields::new().with_lifter_comment("old"));
        remove_exercise(&mut doc, &mut overlay, &squat()).unwrap();

        let loc = add_exercise(&mut doc, &Selection::day("serie-1-2026", 1, 1, 1), "Squat").unwrap();
        assert_eq!(loc, squat());
        let entry = resolve(&doc, &overlay, &loc).unwrap();
        assert_eq!(entry.lifter_comment, "");
        assert_eq!(entry.work, "");
        assert!(!entry.patched);
    }

    #[test]
    fn remove_period_and_block_levels() {
        let mut doc = sample_document();
        let mut overlay = Overlay::new();
        remove_block(&mut doc, &mut overlay, "serie-1-2026", 2).unwrap();
        assert_eq!(descendants(&doc, &Selection::period("serie-1-2026")).len(), 3);
        remove_week(&mut doc, &mut overlay, "serie-1-2026", 1, 2).unwrap();
        assert_eq!(descendants(&doc, &Selection::period("serie-1-2026")).len(), 2);
        remove_period(&mut doc, &mut overlay, "serie-1-2026").unwrap();
        assert_eq!(doc.periods.len(), 1);
        assert_eq!(doc.periods[0].id, "serie-2-2026");
    }

    #[test]
    fn reconcile_keeps_valid_selection() {
        let mut doc = sample_document();
        let before = doc.clone();
        let r = reconcile_selection(&mut doc, &squat().selection());
        assert_eq!(r.selection, squat().selection());
        assert!(!r.invalidated);
        assert!(r.placeholders.is_empty());
        assert_eq!(doc, before);
    }

    #[test]
    fn reconcile_fills_partial_selection_with_first_children() {
        let mut doc = sample_document();
        let r = reconcile_selection(&mut doc, &Selection::period("serie-1-2026"));
        assert_eq!(
            r.selection.locator(),
            Some(Locator::new("serie-1-2026", 1, 1, 1, "bench-press"))
        );
        assert!(!r.invalidated);
    }

    #[test]
    fn reconcile_falls_back_to_first_sibling() {
        let mut doc = sample_document();
        let mut overlay = Overlay::new();
        let old = Locator::new("serie-1-2026", 2, 1, 1, "squat").selection();
        remove_block(&mut doc, &mut overlay, "serie-1-2026", 2).unwrap();
        let r = reconcile_selection(&mut doc, &old);
        assert!(r.invalidated);
        assert_eq!(
            r.selection.locator(),
            Some(Locator::new("serie-1-2026", 1, 1, 1, "bench-press"))
        );
    }

    #[test]
    fn reconcile_cascades_first_child_below_fallback() {
        let mut doc = sample_document();
        // week 2 of block 1 exists, but once the period falls back nothing
        // below it is kept
        let old = Locator::new("gone", 1, 2, 1, "squat").selection();
        let r = reconcile_selection(&mut doc, &old);
        assert!(r.invalidated);
        assert_eq!(r.selection.week, Some(1));
        assert_eq!(r.selection.exercise.as_deref(), Some("bench-press"));
    }

    #[test]
    fn removed_only_day_gets_empty_placeholder() {
        let mut doc = scenario_document();
        let mut overlay = Overlay::new();
        remove_day(&mut doc, &mut overlay, "serie-1-2026", 1, 1, 1).unwrap();
        assert!(resolve(&doc, &overlay, &squat()).is_err());

        let r = reconcile_selection(&mut doc, &squat().selection());
        assert!(r.invalidated);
        assert_eq!(r.placeholders, vec![Level::Day]);
        assert_eq!(r.selection, Selection::day("serie-1-2026", 1, 1, 1));
        let day = &doc.periods[0].blocks[0].weeks[0].days[0];
        assert_eq!(day.day, 1);
        assert!(day.exercises.is_empty());
    }

    #[test]
    fn empty_document_gets_placeholder_chain() {
        let mut doc = BaseDocument::default();
        let r = reconcile_selection(&mut doc, &Selection::default());
        assert_eq!(
            r.placeholders,
            vec![Level::Period, Level::Block, Level::Week, Level::Day]
        );
        assert_eq!(r.selection, Selection::day(PLACEHOLDER_PERIOD_ID, 1, 1, 1));
        assert!(!r.invalidated);
        assert_eq!(doc.periods[0].name, PLACEHOLDER_PERIOD_NAME);
    }
}
