use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Level, Result, TrainlogError};
use crate::hierarchy::find_period;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Every occurrence of an exercise within a period, oldest block first.
pub fn run<B: KvBackend>(
    session: &Session<B>,
    period_id: &str,
    exercise_name: &str,
) -> Result<CmdResult> {
    if find_period(session.document(), period_id).is_none() {
        return Err(TrainlogError::not_found(Level::Period, period_id));
    }
    let entries = session.history(period_id, exercise_name);
    let mut result = CmdResult::default().with_entries(entries);
    if result.entries.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No '{}' in {}",
            exercise_name.trim(),
            period_id
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::test_utils::sample_document;

    #[test]
    fn lists_occurrences_in_order() {
        let fixture = StoreFixture::new(sample_document());
        let session = Session::open(fixture.store, &fixture.source).unwrap();
        let result = run(&session, "serie-1-2026", "Squat").unwrap();
        let work: Vec<&str> = result.entries.iter().map(|e| e.work.as_str()).collect();
        assert_eq!(work, vec!["5x5", "5x3", "3x2"]);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn unknown_period_is_not_found() {
        let fixture = StoreFixture::new(sample_document());
        let session = Session::open(fixture.store, &fixture.source).unwrap();
        assert!(run(&session, "serie-9", "Squat").unwrap_err().is_not_found());
    }

    #[test]
    fn no_matches_is_informational() {
        let fixture = StoreFixture::new(sample_document());
        let session = Session::open(fixture.store, &fixture.source).unwrap();
        let result = run(&session, "serie-2-2026", "Squat").unwrap();
        assert!(result.entries.is_empty());
        assert_eq!(result.messages.len(), 1);
    }
}
