use crate::address::{Locator, Selection};
use crate::commands::{CmdResult, OutlineRow};
use crate::error::{Level, Result};
use crate::hierarchy::check_selection;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Outline of the hierarchy, restricted to the branch `under` names (the
/// whole document when empty). Ancestors of `under` are included so the
/// branch keeps its context.
pub fn run<B: KvBackend>(session: &Session<B>, under: &Selection) -> Result<CmdResult> {
    let doc = session.document();
    check_selection(doc, under)?;
    let overlay = session.overlay();
    let mut rows = Vec::new();

    for period in &doc.periods {
        let node = Selection::period(period.id.as_str());
        if !on_branch(under, &node) {
            continue;
        }
        rows.push(row(
            Level::Period,
            format!("{} ({})", period.name, period.id),
            &node,
            false,
        ));
        for block in &period.blocks {
            let node = Selection::block(period.id.as_str(), block.id);
            if !on_branch(under, &node) {
                continue;
            }
            rows.push(row(Level::Block, format!("Block {}", block.id), &node, false));
            for week in &block.weeks {
                let node = Selection::week(period.id.as_str(), block.id, week.week);
                if !on_branch(under, &node) {
                    continue;
                }
                rows.push(row(Level::Week, format!("Week {}", week.week), &node, false));
                for day in &week.days {
                    let node = Selection::day(period.id.as_str(), block.id, week.week, day.day);
                    if !on_branch(under, &node) {
                        continue;
                    }
                    let label = if day.label.trim().is_empty() {
                        format!("Day {}", day.day)
                    } else {
                        format!("Day {}: {}", day.day, day.label)
                    };
                    rows.push(row(Level::Day, label, &node, false));
                    for exercise in &day.exercises {
                        let locator = Locator::new(
                            period.id.as_str(),
                            block.id,
                            week.week,
                            day.day,
                            exercise.id.as_str(),
                        );
                        let node = locator.selection();
                        if !on_branch(under, &node) {
                            continue;
                        }
                        let patched = overlay.contains(&locator.key());
                        rows.push(row(Level::Exercise, exercise.name.clone(), &node, patched));
                    }
                }
            }
        }
    }

    let mut result = CmdResult::default();
    result.outline = rows;
    Ok(result)
}

/// True when `node` is an ancestor of, equal to, or beneath `under`.
fn on_branch(under: &Selection, node: &Selection) -> bool {
    let depth = under.depth().min(node.depth());
    under.truncated(depth) == node.truncated(depth)
}

fn row(level: Level, label: String, node: &Selection, patched: bool) -> OutlineRow {
    OutlineRow {
        level,
        depth: node.depth() - 1,
        label,
        route: node.to_string(),
        patched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::PatchFields;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::test_utils::sample_document;

    #[test]
    fn full_outline() {
        let squat = Locator::new("serie-1-2026", 1, 1, 1, "squat");
        let fixture = StoreFixture::new(sample_document())
            .with_patch(&squat.key(), PatchFields::new().with_work("1x1"));
        let session = Session::open(fixture.store, &fixture.source).unwrap();
        let result = run(&session, &Selection::default()).unwrap();

        assert_eq!(result.outline[0].label, "Serie 1 2026 (serie-1-2026)");
        assert_eq!(result.outline[0].depth, 0);
        let exercises: Vec<&OutlineRow> = result
            .outline
            .iter()
            .filter(|r| r.level == Level::Exercise)
            .collect();
        assert_eq!(exercises.len(), 5);
        let patched: Vec<&str> = exercises
            .iter()
            .filter(|r| r.patched)
            .map(|r| r.route.as_str())
            .collect();
        assert_eq!(patched, vec!["p/serie-1-2026/b/1/w/1/d/1/e/squat"]);
    }

    #[test]
    fn branch_keeps_ancestors() {
        let fixture = StoreFixture::new(sample_document());
        let session = Session::open(fixture.store, &fixture.source).unwrap();
        let result = run(&session, &Selection::block("serie-1-2026", 2)).unwrap();
        let labels: Vec<&str> = result.outline.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Serie 1 2026 (serie-1-2026)",
                "Block 2",
                "Week 1",
                "Day 1: Heavy",
                "Squat"
            ]
        );
    }

    #[test]
    fn unknown_branch_is_not_found() {
        let fixture = StoreFixture::new(sample_document());
        let session = Session::open(fixture.store, &fixture.source).unwrap();
        assert!(run(&session, &Selection::period("nope"))
            .unwrap_err()
            .is_not_found());
    }
}
