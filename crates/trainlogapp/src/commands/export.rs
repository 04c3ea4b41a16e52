use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::Result;
use crate::merge::MergeReport;
use crate::session::Session;
use crate::store::backend::KvBackend;

/// Base document with every applicable local edit folded in. With `bake`, the
/// result also replaces the stored base and the overlay is cleared.
pub fn run<B: KvBackend>(session: &mut Session<B>, bake: bool) -> Result<CmdResult> {
    let report = if bake {
        session.bake()?
    } else {
        session.export()
    };
    Ok(report_result(report, bake))
}

fn report_result(report: MergeReport, baked: bool) -> CmdResult {
    let mut result = CmdResult::default();
    let applied = plural(report.applied.len(), "local edit");
    result.add_message(if baked {
        CmdMessage::success(format!("Baked {} into the base document", applied))
    } else {
        CmdMessage::info(format!("Exported with {}", applied))
    });
    if !report.dropped.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} whose entry no longer exists",
            plural(report.dropped.len(), "local edit")
        )));
    }
    result.document = Some(report.document);
    result
}
