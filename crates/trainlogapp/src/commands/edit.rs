use crate::address::Locator;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrainlogError};
use crate::overlay::PatchFields;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Upserts an overlay patch for an existing entry.
pub fn run<B: KvBackend>(
    session: &mut Session<B>,
    locator: &Locator,
    fields: PatchFields,
) -> Result<CmdResult> {
    if fields.is_empty() {
        return Err(TrainlogError::Api(
            "Nothing to change: give at least one field".to_string(),
        ));
    }
    let entry = session.edit(locator, fields)?;
    let message = CmdMessage::success(format!("Updated {} ({})", entry.name, locator));
    Ok(CmdResult::default()
        .with_selection(locator.selection())
        .with_entries(vec![entry])
        .with_message(message))
}
