use crate::address::Locator;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Resolves one entry and makes it the selection.
pub fn run<B: KvBackend>(session: &mut Session<B>, locator: &Locator) -> Result<CmdResult> {
    let entry = session.entry(locator)?;
    let reconciled = session.select(&locator.selection())?;
    Ok(CmdResult::default()
        .with_entries(vec![entry])
        .with_selection(reconciled.selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::PatchFields;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::test_utils::sample_document;

    fn open(fixture: StoreFixture) -> Session<crate::store::mem_backend::MemBackend> {
        Session::open(fixture.store, &fixture.source).unwrap()
    }

    #[test]
    fn shows_patched_entry() {
        let squat = Locator::new("serie-1-2026", 1, 2, 1, "squat");
        let fixture = StoreFixture::new(sample_document())
            .with_patch(&squat.key(), PatchFields::new().with_lifter_comment("Easy"));
        let mut session = open(fixture);

        let result = run(&mut session, &squat).unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].work, "5x3");
        assert_eq!(result.entries[0].lifter_comment, "Easy");
        assert_eq!(result.selection, Some(squat.selection()));
        assert_eq!(session.selection(), &squat.selection());
    }

    #[test]
    fn missing_entry_keeps_selection() {
        let mut session = open(StoreFixture::new(sample_document()));
        let before = session.selection().clone();
        let err = run(&mut session, &Locator::new("serie-1-2026", 9, 1, 1, "squat")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session.selection(), &before);
    }
}
