//! # Rendering
//!
//! Turns a [`CmdResult`] into text for the terminal or into JSON.
//!
//! - **Detail**: one entry as a card (show, edit, revert, add)
//! - **List**: one aligned row per entry (history, search)
//! - **Outline**: indented hierarchy (tree)
//!
//! Messages always come last, styled by level.

use super::setup::OutputFormat;
use super::styles::Theme;
use chrono::{DateTime, Utc};
use serde_json::json;
use trainlogapp::commands::{CmdMessage, CmdResult, OutlineRow};
use trainlogapp::resolve::ResolvedEntry;
use unicode_width::UnicodeWidthStr;

pub const PATCHED_MARKER: &str = "*";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    Detail,
    List,
    Outline,
    Messages,
}

pub fn render(result: &CmdResult, layout: Layout, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => render_json(result),
        OutputFormat::Text => render_text(result, layout, &Theme::default()),
    }
}

fn render_json(result: &CmdResult) -> String {
    let value = json!({
        "entries": result.entries,
        "outline": result.outline,
        "selection": result.selection.as_ref().map(|s| s.to_string()),
        "document": result.document,
        "messages": result.messages,
    });
    let mut out = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

fn render_text(result: &CmdResult, layout: Layout, theme: &Theme) -> String {
    let mut out = String::new();
    match layout {
        Layout::Detail => {
            for entry in &result.entries {
                out.push_str(&render_card(entry, theme, Utc::now()));
            }
        }
        Layout::List => out.push_str(&render_rows(&result.entries, theme, Utc::now())),
        Layout::Outline => out.push_str(&render_outline(&result.outline, theme)),
        Layout::Messages => {}
    }
    out.push_str(&render_messages(&result.messages, theme));
    out
}

pub fn render_card(entry: &ResolvedEntry, theme: &Theme, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let marker = if entry.patched {
        format!(" {}", theme.patched.apply_to("(edited)"))
    } else {
        String::new()
    };
    out.push_str(&format!("{}{}\n", theme.title.apply_to(&entry.name), marker));
    out.push_str(&format!(
        "{}\n",
        theme.muted.apply_to(format!(
            "{} / Block {} / Week {} / {}",
            entry.period_name,
            entry.block_id,
            entry.week,
            day_title(entry)
        ))
    ));
    out.push_str(&format!(
        "{}\n",
        theme.muted.apply_to(entry.locator().to_string())
    ));

    field(&mut out, theme, "Work", &entry.work);
    if entry.videos.is_empty() {
        field(&mut out, theme, "Videos", "");
    } else {
        for (i, video) in entry.videos.iter().enumerate() {
            let label = if i == 0 { "Videos" } else { "" };
            field(&mut out, theme, label, video);
        }
    }
    field(&mut out, theme, "Lifter", &entry.lifter_comment);
    field(&mut out, theme, "Coach", &entry.coach_comment);
    if let Some(updated_at) = entry.updated_at {
        field(&mut out, theme, "Updated", &time_ago(updated_at, now));
    }
    out.push('\n');
    out
}

fn field(out: &mut String, theme: &Theme, label: &str, value: &str) {
    let shown = if value.is_empty() && !label.is_empty() {
        theme.muted.apply_to("-").to_string()
    } else {
        value.to_string()
    };
    out.push_str(&format!(
        "  {} {}\n",
        theme.label.apply_to(pad_to_width(label, 8)),
        shown
    ));
}

fn day_title(entry: &ResolvedEntry) -> String {
    if entry.day_label.is_empty() {
        format!("Day {}", entry.day)
    } else {
        format!("Day {} ({})", entry.day, entry.day_label)
    }
}

/// Aligned rows: position, name, work, when last edited.
pub fn render_rows(entries: &[ResolvedEntry], theme: &Theme, now: DateTime<Utc>) -> String {
    let rows: Vec<[String; 4]> = entries
        .iter()
        .map(|e| {
            let name = if e.patched {
                format!("{}{}", e.name, PATCHED_MARKER)
            } else {
                e.name.clone()
            };
            [
                format!("B{} W{} D{}", e.block_id, e.week, e.day),
                name,
                e.work.clone(),
                e.updated_at.map(|t| time_ago(t, now)).unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = [0usize; 4];
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let line = format!(
            "{}  {}  {}  {}",
            theme.muted.apply_to(pad_to_width(&row[0], widths[0])),
            theme.title.apply_to(pad_to_width(&row[1], widths[1])),
            pad_to_width(&row[2], widths[2]),
            theme.muted.apply_to(&row[3]),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_outline(rows: &[OutlineRow], theme: &Theme) -> String {
    let mut out = String::new();
    for row in rows {
        let indent = "  ".repeat(row.depth);
        let label = if row.depth == 0 {
            theme.title.apply_to(&row.label).to_string()
        } else {
            row.label.clone()
        };
        let marker = if row.patched {
            theme.patched.apply_to(PATCHED_MARKER).to_string()
        } else {
            String::new()
        };
        out.push_str(&format!("{}{}{}\n", indent, label, marker));
    }
    out
}

fn render_messages(messages: &[CmdMessage], theme: &Theme) -> String {
    messages
        .iter()
        .map(|m| format!("{}\n", theme.message(&m.level).apply_to(&m.content)))
        .collect()
}

/// Pads `text` with spaces to `width` terminal columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let missing = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(missing))
}

pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use trainlogapp::error::Level;

    fn plain() -> Theme {
        console::set_colors_enabled(false);
        Theme::default()
    }

    fn entry(patched: bool) -> ResolvedEntry {
        ResolvedEntry {
            period_id: "serie-1-2026".into(),
            period_name: "Serie 1 2026".into(),
            block_id: 1,
            week: 2,
            day: 1,
            day_label: "Lower".into(),
            exercise_id: "squat".into(),
            name: "Squat".into(),
            work: "5x5".into(),
            videos: vec!["https://youtu.be/abc123".into()],
            lifter_comment: String::new(),
            coach_comment: "Brace".into(),
            updated_at: None,
            patched,
        }
    }

    #[test]
    fn pad_counts_columns_not_bytes() {
        assert_eq!(pad_to_width("Día", 5), "Día  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }

    #[test]
    fn time_ago_is_human() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        // clock skew shows as "now"
        assert_eq!(time_ago(now + Duration::seconds(30), now), "now");
    }

    #[test]
    fn card_shows_context_and_fields() {
        let mut e = entry(true);
        let now = Utc::now();
        e.updated_at = Some(now - Duration::minutes(5));
        let text = render_card(&e, &plain(), now);
        assert!(text.contains("Squat"));
        assert!(text.contains("(edited)"));
        assert!(text.contains("Serie 1 2026 / Block 1 / Week 2 / Day 1 (Lower)"));
        assert!(text.contains("p/serie-1-2026/b/1/w/2/d/1/e/squat"));
        assert!(text.contains("https://youtu.be/abc123"));
        assert!(text.contains("5 minutes ago"));
    }

    #[test]
    fn rows_align() {
        let mut long = entry(false);
        long.name = "Romanian Deadlift".into();
        let text = render_rows(&[entry(true), long], &plain(), Utc::now());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].find("5x5"), lines[1].find("5x5"));
        assert!(lines[0].contains("Squat*"));
    }

    #[test]
    fn outline_indents_by_depth() {
        let rows = vec![
            OutlineRow {
                level: Level::Period,
                depth: 0,
                label: "Serie 1".into(),
                route: "p/serie-1".into(),
                patched: false,
            },
            OutlineRow {
                level: Level::Exercise,
                depth: 4,
                label: "Squat".into(),
                route: "p/serie-1/b/1/w/1/d/1/e/squat".into(),
                patched: true,
            },
        ];
        let text = render_outline(&rows, &plain());
        assert!(text.contains("\n        Squat*\n"));
    }

    #[test]
    fn json_includes_messages() {
        let result = CmdResult::default().with_message(CmdMessage::success("done"));
        let text = render(&result, Layout::Messages, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["messages"][0]["content"], "done");
        assert_eq!(value["messages"][0]["level"], "success");
    }
}
