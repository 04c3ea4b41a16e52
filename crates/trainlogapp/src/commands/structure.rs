//! Adding, renaming and removing nodes.
//!
//! Every change is persisted by the session before it becomes visible, and
//! the selection is reconciled afterwards. When the old selection pointed at
//! something that is gone, a warning says where it moved.

use crate::address::Selection;
use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::{Level, Result};
use crate::session::{Change, Session};
use crate::store::backend::KvBackend;

/// What to add. Numbers are taken as given and validated by the mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTarget {
    Period {
        name: String,
    },
    Block {
        period: String,
        block: i64,
    },
    Week {
        period: String,
        block: u32,
        week: i64,
    },
    Day {
        period: String,
        block: u32,
        week: u32,
        day: i64,
        label: String,
    },
    Exercise {
        day: Selection,
        name: String,
    },
}

pub fn add<B: KvBackend>(session: &mut Session<B>, target: AddTarget) -> Result<CmdResult> {
    let (level, node, change) = match target {
        AddTarget::Period { name } => {
            let change = session.add_period(&name)?;
            let node = Selection::period(change.value.as_str());
            (Level::Period, node, forget(change))
        }
        AddTarget::Block { period, block } => {
            let change = session.add_block(&period, block)?;
            let node = Selection::block(period, change.value);
            (Level::Block, node, forget(change))
        }
        AddTarget::Week {
            period,
            block,
            week,
        } => {
            let change = session.add_week(&period, block, week)?;
            let node = Selection::week(period, block, change.value);
            (Level::Week, node, forget(change))
        }
        AddTarget::Day {
            period,
            block,
            week,
            day,
            label,
        } => {
            let change = session.add_day(&period, block, week, day, &label)?;
            let node = Selection::day(period, block, week, change.value);
            (Level::Day, node, forget(change))
        }
        AddTarget::Exercise { day, name } => {
            let change = session.add_exercise(&day, &name)?;
            let node = change.value.selection();
            (Level::Exercise, node, forget(change))
        }
    };

    let mut result = CmdResult::default()
        .with_selection(change.selection.clone())
        .with_message(CmdMessage::success(format!("Added {} {}", level, node)));
    if let Some(locator) = node.locator() {
        result.entries.push(session.entry(&locator)?);
    }
    note_invalidation(&mut result, &change);
    Ok(result)
}

pub fn rename_period<B: KvBackend>(
    session: &mut Session<B>,
    period_id: &str,
    name: &str,
) -> Result<CmdResult> {
    let change = session.rename_period(period_id, name)?;
    Ok(CmdResult::default()
        .with_selection(change.selection)
        .with_message(CmdMessage::success(format!(
            "Renamed period {} to '{}'",
            period_id,
            name.trim()
        ))))
}

/// Removes the node `target` names along with its overlay patches.
pub fn remove<B: KvBackend>(session: &mut Session<B>, target: &Selection) -> Result<CmdResult> {
    let change = session.remove(target)?;
    let mut result = CmdResult::default()
        .with_selection(change.selection.clone())
        .with_message(CmdMessage::success(format!("Removed {}", target)));
    if !change.purged_keys.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Discarded {} under it",
            plural(change.purged_keys.len(), "local edit")
        )));
    }
    note_invalidation(&mut result, &change);
    Ok(result)
}

fn forget<T>(change: Change<T>) -> Change<()> {
    Change {
        value: (),
        purged_keys: change.purged_keys,
        selection: change.selection,
        selection_invalidated: change.selection_invalidated,
    }
}

fn note_invalidation(result: &mut CmdResult, change: &Change<()>) {
    if change.selection_invalidated {
        result.add_message(CmdMessage::warning(format!(
            "Selection moved to {}",
            change.selection
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Locator;
    use crate::commands::MessageLevel;
    use crate::error::TrainlogError;
    use crate::overlay::PatchFields;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::test_utils::{sample_document, scenario_document};

    fn open(fixture: StoreFixture) -> Session<crate::store::mem_backend::MemBackend> {
        Session::open(fixture.store, &fixture.source).unwrap()
    }

    #[test]
    fn add_each_level() {
        let mut session = open(StoreFixture::new(scenario_document()));
        add(
            &mut session,
            AddTarget::Period {
                name: "Serie 2 2026".into(),
            },
        )
        .unwrap();
        add(
            &mut session,
            AddTarget::Block {
                period: "serie-2-2026".into(),
                block: 1,
            },
        )
        .unwrap();
        add(
            &mut session,
            AddTarget::Week {
                period: "serie-2-2026".into(),
                block: 1,
                week: 1,
            },
        )
        .unwrap();
        add(
            &mut session,
            AddTarget::Day {
                period: "serie-2-2026".into(),
                block: 1,
                week: 1,
                day: 1,
                label: "Push".into(),
            },
        )
        .unwrap();
        let result = add(
            &mut session,
            AddTarget::Exercise {
                day: Selection::day("serie-2-2026", 1, 1, 1),
                name: "Overhead Press".into(),
            },
        )
        .unwrap();

        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].exercise_id, "overhead-press");
        assert_eq!(result.entries[0].day_label, "Push");
        assert_eq!(
            result.messages[0].content,
            "Added exercise p/serie-2-2026/b/1/w/1/d/1/e/overhead-press"
        );
        assert_eq!(session.document().exercise_count(), 2);
    }

    #[test]
    fn invalid_number_is_rejected() {
        let mut session = open(StoreFixture::new(scenario_document()));
        let err = add(
            &mut session,
            AddTarget::Week {
                period: "serie-1-2026".into(),
                block: 1,
                week: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, TrainlogError::InvalidIdentifier { .. }));
    }

    #[test]
    fn remove_reports_purged_edits_and_moved_selection() {
        let squat = Locator::new("serie-1-2026", 1, 1, 1, "squat");
        let fixture = StoreFixture::new(scenario_document())
            .with_patch(&squat.key(), PatchFields::new().with_work("2x2"));
        let mut session = open(fixture);

        let result = remove(&mut session, &Selection::day("serie-1-2026", 1, 1, 1)).unwrap();
        let levels: Vec<&MessageLevel> = result.messages.iter().map(|m| &m.level).collect();
        assert_eq!(
            levels,
            vec![
                &MessageLevel::Success,
                &MessageLevel::Info,
                &MessageLevel::Warning
            ]
        );
        assert_eq!(result.selection, Some(Selection::day("serie-1-2026", 1, 1, 1)));
    }

    #[test]
    fn remove_unselected_branch_keeps_selection() {
        let mut session = open(StoreFixture::new(sample_document()));
        let before = session.selection().clone();
        let result = remove(&mut session, &Selection::period("serie-2-2026")).unwrap();
        assert_eq!(result.selection, Some(before));
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn rename() {
        let mut session = open(StoreFixture::new(scenario_document()));
        rename_period(&mut session, "serie-1-2026", "Spring").unwrap();
        assert_eq!(session.document().periods[0].name, "Spring");
    }
}
