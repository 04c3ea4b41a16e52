use crate::address::Locator;
use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Drops the patch for one entry. The entry must still exist.
pub fn run<B: KvBackend>(session: &mut Session<B>, locator: &Locator) -> Result<CmdResult> {
    session.entry(locator)?;
    let removed = session.revert(locator)?;
    let entry = session.entry(locator)?;
    let message = if removed {
        CmdMessage::success(format!("Reverted {} to the base document", entry.name))
    } else {
        CmdMessage::info(format!("{} has no local edits", entry.name))
    };
    Ok(CmdResult::default()
        .with_entries(vec![entry])
        .with_message(message))
}

/// Drops every patch.
pub fn run_all<B: KvBackend>(session: &mut Session<B>) -> Result<CmdResult> {
    let count = session.clear_overlay()?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Discarded {}",
        plural(count, "local edit")
    ))))
}
