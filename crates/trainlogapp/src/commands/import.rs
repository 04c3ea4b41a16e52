use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Replaces the base document with `raw` JSON and clears local edits.
pub fn run<B: KvBackend>(session: &mut Session<B>, raw: &str) -> Result<CmdResult> {
    let discarded = session.overlay().len();
    let reconciled = session.import_base(raw)?;
    let doc = session.document();

    let mut result = CmdResult::default()
        .with_selection(reconciled.selection)
        .with_message(CmdMessage::success(format!(
            "Imported {} with {}",
            plural(doc.periods.len(), "period"),
            plural(doc.exercise_count(), "exercise")
        )));
    if discarded > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Discarded {}",
            plural(discarded, "local edit")
        )));
    }
    Ok(result)
}
