use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::{BaseOrigin, Session};
use crate::source::BaseSource;
use crate::store::backend::KvBackend;

/// Drops the stored base so the source document is used again. Local edits
/// survive unless `clear_overlay` is set.
pub fn run<B: KvBackend, S: BaseSource + ?Sized>(
    session: &mut Session<B>,
    source: &S,
    clear_overlay: bool,
) -> Result<CmdResult> {
    let was_stored = session.origin() == BaseOrigin::Stored;
    session.reset_base(source, clear_overlay)?;

    let mut result = CmdResult::default().with_selection(session.selection().clone());
    result.add_message(if was_stored {
        CmdMessage::success(format!("Base document reloaded from {}", source.describe()))
    } else {
        CmdMessage::info(format!("Already using {}", source.describe()))
    });
    if clear_overlay {
        result.add_message(CmdMessage::info("Local edits cleared"));
    }
    Ok(result)
}
