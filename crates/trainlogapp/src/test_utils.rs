//! Shared document fixtures for tests.

use crate::model::{BaseDocument, Block, Day, Exercise, Period, Week};

/// The single-entry document: `serie-1-2026 / 1 / 1 / 1 / squat` with `work = "5x5"`.
pub fn scenario_document() -> BaseDocument {
    BaseDocument::new(vec![Period::new("serie-1-2026", "Serie 1 2026").with_blocks(
        vec![Block::new(1).with_weeks(vec![Week::new(1).with_days(vec![Day::new(
            1, "Lower",
        )
        .with_exercises(vec![Exercise::new("Squat").with_work("5x5")])])])],
    )])
}

/// Two periods with a squat progression across blocks and weeks.
///
/// ```text
/// serie-1-2026 "Serie 1 2026"
///   block 1 / week 1 / day 1 "Lower": bench-press (3x8), squat (5x5)
///   block 1 / week 2 / day 1 "Lower": squat (5x3)
///   block 2 / week 1 / day 1 "Heavy": squat (3x2)
/// serie-2-2026 "Serie 2 2026"
///   block 1 / week 1 / day 1 "Pull": deadlift (1x5)
/// ```
pub fn sample_document() -> BaseDocument {
    BaseDocument::new(vec![
        Period::new("serie-1-2026", "Serie 1 2026").with_blocks(vec![
            Block::new(1).with_weeks(vec![
                Week::new(1).with_days(vec![Day::new(1, "Lower").with_exercises(vec![
                    Exercise::new("Bench Press").with_work("3x8"),
                    Exercise::new("Squat").with_work("5x5"),
                ])]),
                Week::new(2).with_days(vec![Day::new(1, "Lower")
                    .with_exercises(vec![Exercise::new("Squat").with_work("5x3")])]),
            ]),
            Block::new(2).with_weeks(vec![Week::new(1).with_days(vec![Day::new(1, "Heavy")
                .with_exercises(vec![Exercise::new("Squat").with_work("3x2")])])]),
        ]),
        Period::new("serie-2-2026", "Serie 2 2026").with_blocks(vec![Block::new(1)
            .with_weeks(vec![Week::new(1).with_days(vec![Day::new(1, "Pull")
                .with_exercises(vec![Exercise::new("Deadlift").with_work("1x5")])])])]),
    ])
}
