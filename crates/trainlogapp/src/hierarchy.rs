//! # Hierarchy Accessor
//!
//! Read-only lookups through a [`BaseDocument`]. Each `find_*` returns the node
//! or `None`; none of them panic. [`locate`] chains all five and reports only
//! the first level that failed, so a missing week never reports on its days.
//!
//! Identifiers are already normalized (see [`crate::address`]), so numeric
//! levels are plain integer comparisons.

use crate::address::{Locator, Selection};
use crate::error::{Level, Result, TrainlogError};
use crate::model::{BaseDocument, Block, Day, Exercise, Period, Week};

pub fn find_period<'a>(doc: &'a BaseDocument, period_id: &str) -> Option<&'a Period> {
    doc.periods.iter().find(|p| p.id == period_id)
}

pub fn find_block(period: &Period, block_id: u32) -> Option<&Block> {
    period.blocks.iter().find(|b| b.id == block_id)
}

pub fn find_week(block: &Block, week: u32) -> Option<&Week> {
    block.weeks.iter().find(|w| w.week == week)
}

pub fn find_day(week: &Week, day: u32) -> Option<&Day> {
    week.days.iter().find(|d| d.day == day)
}

pub fn find_exercise<'a>(day: &'a Day, exercise_id: &str) -> Option<&'a Exercise> {
    day.exercises.iter().find(|e| e.id == exercise_id)
}

pub fn find_period_mut<'a>(doc: &'a mut BaseDocument, period_id: &str) -> Option<&'a mut Period> {
    doc.periods.iter_mut().find(|p| p.id == period_id)
}

pub fn find_block_mut(period: &mut Period, block_id: u32) -> Option<&mut Block> {
    period.blocks.iter_mut().find(|b| b.id == block_id)
}

pub fn find_week_mut(block: &mut Block, week: u32) -> Option<&mut Week> {
    block.weeks.iter_mut().find(|w| w.week == week)
}

pub fn find_day_mut(week: &mut Week, day: u32) -> Option<&mut Day> {
    week.days.iter_mut().find(|d| d.day == day)
}

pub fn find_exercise_mut<'a>(day: &'a mut Day, exercise_id: &str) -> Option<&'a mut Exercise> {
    day.exercises.iter_mut().find(|e| e.id == exercise_id)
}

/// One exercise together with its ancestors.
#[derive(Debug, Clone, Copy)]
pub struct EntryRef<'a> {
    pub period: &'a Period,
    pub block: &'a Block,
    pub week: &'a Week,
    pub day: &'a Day,
    pub exercise: &'a Exercise,
}

impl EntryRef<'_> {
    pub fn locator(&self) -> Locator {
        Locator::new(
            self.period.id.clone(),
            self.block.id,
            self.week.week,
            self.day.day,
            self.exercise.id.clone(),
        )
    }
}

/// Resolves a locator through all five levels.
pub fn locate<'a>(doc: &'a BaseDocument, locator: &Locator) -> Result<EntryRef<'a>> {
    let not_found = |level| TrainlogError::not_found(level, locator.to_string());

    let period = find_period(doc, &locator.period_id).ok_or_else(|| not_found(Level::Period))?;
    let block = find_block(period, locator.block_id).ok_or_else(|| not_found(Level::Block))?;
    let week = find_week(block, locator.week).ok_or_else(|| not_found(Level::Week))?;
    let day = find_day(week, locator.day).ok_or_else(|| not_found(Level::Day))?;
    let exercise =
        find_exercise(day, &locator.exercise_id).ok_or_else(|| not_found(Level::Exercise))?;

    Ok(EntryRef {
        period,
        block,
        week,
        day,
        exercise,
    })
}

/// Mutable access to the exercise at `locator`, or `None` if any link is missing.
pub fn exercise_mut<'a>(doc: &'a mut BaseDocument, locator: &Locator) -> Option<&'a mut Exercise> {
    let period = find_period_mut(doc, &locator.period_id)?;
    let block = find_block_mut(period, locator.block_id)?;
    let week = find_week_mut(block, locator.week)?;
    let day = find_day_mut(week, locator.day)?;
    find_exercise_mut(day, &locator.exercise_id)
}

/// Checks that every present component of a (possibly partial) selection
/// exists. Returns the first missing level.
pub fn check_selection(doc: &BaseDocument, selection: &Selection) -> Result<()> {
    let depth = selection.depth();
    let not_found = |level| TrainlogError::not_found(level, selection.to_string());
    if depth == 0 {
        return Ok(());
    }
    let period = selection
        .period
        .as_deref()
        .and_then(|id| find_period(doc, id))
        .ok_or_else(|| not_found(Level::Period))?;
    if depth == 1 {
        return Ok(());
    }
    let block = selection
        .block
        .and_then(|id| find_block(period, id))
        .ok_or_else(|| not_found(Level::Block))?;
    if depth == 2 {
        return Ok(());
    }
    let week = selection
        .week
        .and_then(|n| find_week(block, n))
        .ok_or_else(|| not_found(Level::Week))?;
    if depth == 3 {
        return Ok(());
    }
    let day = selection
        .day
        .and_then(|n| find_day(week, n))
        .ok_or_else(|| not_found(Level::Day))?;
    if depth == 4 {
        return Ok(());
    }
    selection
        .exercise
        .as_deref()
        .and_then(|id| find_exercise(day, id))
        .map(|_| ())
        .ok_or_else(|| not_found(Level::Exercise))
}

/// Every exercise in document order: period → block → week → day → exercise.
pub fn walk(doc: &BaseDocument) -> impl Iterator<Item = EntryRef<'_>> {
    doc.periods.iter().flat_map(|period| {
        period.blocks.iter().flat_map(move |block| {
            block.weeks.iter().flat_map(move |week| {
                week.days.iter().flat_map(move |day| {
                    day.exercises.iter().map(move |exercise| EntryRef {
                        period,
                        block,
                        week,
                        day,
                        exercise,
                    })
                })
            })
        })
    })
}

/// Locators of every exercise under `selection`, in document order.
pub fn descendants(doc: &BaseDocument, selection: &Selection) -> Vec<Locator> {
    walk(doc)
        .map(|entry| entry.locator())
        .filter(|loc| selection.contains(loc))
        .collect()
}
