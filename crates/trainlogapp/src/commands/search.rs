use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Substring search, truncated to `limit` hits in document order.
pub fn run<B: KvBackend>(session: &Session<B>, query: &str, limit: usize) -> Result<CmdResult> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(CmdResult::default().with_message(CmdMessage::warning("Empty search query")));
    }

    let mut entries = session.search(query);
    let total = entries.len();
    entries.truncate(limit);

    let mut result = CmdResult::default().with_entries(entries);
    if total == 0 {
        result.add_message(CmdMessage::info(format!("No entries match '{}'", query)));
    } else if total > limit {
        result.add_message(CmdMessage::info(format!(
            "Showing {} of {} matches",
            limit, total
        )));
    }
    Ok(result)
}
