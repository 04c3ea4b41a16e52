//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! trainlog operation, whatever the UI.
//!
//! The facade:
//! - **Normalizes inputs**: route strings and entry keys become
//!   [`Selection`]s and [`Locator`]s
//! - **Dispatches** to the matching command in [`crate::commands`]
//! - **Returns structured types**: `Result<CmdResult>`, never text
//!
//! ## Addressing Grammar
//!
//! - **Route**: `p/<period>/b/<n>/w/<n>/d/<n>/e/<exercise>`, any leading
//!   prefix of it (`p/serie-1-2026/b/2`). Slashes at either end are ignored.
//! - **Entry key**: `<period>|<block>|<week>|<day>|<exercise>`, accepted
//!   wherever a complete entry is required.
//!
//! A route must be valid all the way through: the lenient partial parsing in
//! [`parse_route`] is for restoring UI state, whereas a typed route that stops
//! matching half way is a user error.
//!
//! ## Generic Over the Backend
//!
//! `TrainlogApi<B: KvBackend>` runs against `FsBackend` in production and
//! `MemBackend` in tests.

use crate::address::{decode, parse_route, Locator, Route, Selection, KEY_SEPARATOR};
use crate::commands::{self, structure::AddTarget, CmdResult};
use crate::config::DEFAULT_SEARCH_LIMIT;
use crate::error::{Result, TrainlogError};
use crate::overlay::PatchFields;
use crate::session::Session;
use crate::source::BaseSource;
use crate::store::backend::KvBackend;
use crate::store::LogStore;

pub struct TrainlogApi<B: KvBackend> {
    session: Session<B>,
    search_limit: usize,
}

impl<B: KvBackend> TrainlogApi<B> {
    pub fn open<S: BaseSource + ?Sized>(store: LogStore<B>, source: &S) -> Result<Self> {
        Ok(Self::new(Session::open(store, source)?))
    }

    /// Opens without consulting a source; see [`Session::open_stored`].
    pub fn open_stored(store: LogStore<B>) -> Result<Self> {
        Ok(Self::new(Session::open_stored(store)?))
    }

    pub fn new(session: Session<B>) -> Self {
        Self {
            session,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn view(&mut self, entry: &str) -> Result<CmdResult> {
        let locator = parse_locator(entry)?;
        commands::view::run(&mut self.session, &locator)
    }

    pub fn edit(&mut self, entry: &str, fields: PatchFields) -> Result<CmdResult> {
        let locator = parse_locator(entry)?;
        commands::edit::run(&mut self.session, &locator, fields)
    }

    pub fn revert(&mut self, entry: &str) -> Result<CmdResult> {
        let locator = parse_locator(entry)?;
        commands::revert::run(&mut self.session, &locator)
    }

    pub fn revert_all(&mut self) -> Result<CmdResult> {
        commands::revert::run_all(&mut self.session)
    }

    /// `period` may be a bare id or a `p/<id>` route.
    pub fn history(&self, period: &str, exercise_name: &str) -> Result<CmdResult> {
        let period_id = parse_period(period)?;
        commands::history::run(&self.session, &period_id, exercise_name)
    }

    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<CmdResult> {
        commands::search::run(&self.session, query, limit.unwrap_or(self.search_limit))
    }

    pub fn tree(&self, under: Option<&str>) -> Result<CmdResult> {
        let selection = match under {
            Some(text) => parse_selection(text)?,
            None => Selection::default(),
        };
        commands::tree::run(&self.session, &selection)
    }

    pub fn add_period(&mut self, name: &str) -> Result<CmdResult> {
        commands::structure::add(
            &mut self.session,
            AddTarget::Period {
                name: name.to_string(),
            },
        )
    }

    /// Adds a child under `parent`; the parent's depth picks the level.
    /// `value` is the new number (block/week/day) or exercise name. `label`
    /// only applies to days.
    pub fn add_child(&mut self, parent: &str, value: &str, label: Option<&str>) -> Result<CmdResult> {
        let at = parse_selection(parent)?;
        let target = match at.depth() {
            1 => AddTarget::Block {
                period: component(&at.period)?,
                block: parse_number(value)?,
            },
            2 => AddTarget::Week {
                period: component(&at.period)?,
                block: component(&at.block)?,
                week: parse_number(value)?,
            },
            3 => AddTarget::Day {
                period: component(&at.period)?,
                block: component(&at.block)?,
                week: component(&at.week)?,
                day: parse_number(value)?,
                label: label.unwrap_or_default().trim().to_string(),
            },
            4 => AddTarget::Exercise {
                day: at,
                name: value.to_string(),
            },
            _ => {
                return Err(TrainlogError::Api(format!(
                    "Cannot add under '{}': exercises have no children",
                    parent
                )))
            }
        };
        commands::structure::add(&mut self.session, target)
    }

    pub fn rename_period(&mut self, period: &str, name: &str) -> Result<CmdResult> {
        let period_id = parse_period(period)?;
        commands::structure::rename_period(&mut self.session, &period_id, name)
    }

    pub fn remove(&mut self, target: &str) -> Result<CmdResult> {
        let selection = if target.contains(KEY_SEPARATOR) {
            parse_locator(target)?.selection()
        } else {
            parse_selection(target)?
        };
        if selection.is_empty() {
            return Err(TrainlogError::Api("Nothing to remove".to_string()));
        }
        commands::structure::remove(&mut self.session, &selection)
    }

    pub fn export(&mut self, bake: bool) -> Result<CmdResult> {
        commands::export::run(&mut self.session, bake)
    }

    pub fn import(&mut self, raw: &str) -> Result<CmdResult> {
        commands::import::run(&mut self.session, raw)
    }

    pub fn reset<S: BaseSource + ?Sized>(&mut self, source: &S, clear_overlay: bool) -> Result<CmdResult> {
        commands::reset::run(&mut self.session, source, clear_overlay)
    }
}

/// Parses a route, rejecting any token that does not extend the selection.
pub fn parse_selection(text: &str) -> Result<Selection> {
    let route: Route = text.parse()?;
    let selection = parse_route(&route);
    if selection.depth() != route.tokens().len() {
        return Err(TrainlogError::Api(format!(
            "Route '{}' is not valid past '{}'",
            text.trim(),
            selection
        )));
    }
    Ok(selection)
}

/// A complete entry, as a route or an entry key.
pub fn parse_locator(text: &str) -> Result<Locator> {
    if text.contains(KEY_SEPARATOR) {
        return decode(text.trim())
            .ok_or_else(|| TrainlogError::Api(format!("Malformed entry key '{}'", text.trim())));
    }
    parse_selection(text)?.locator().ok_or_else(|| {
        TrainlogError::Api(format!(
            "'{}' does not name an exercise (expected p/../b/../w/../d/../e/..)",
            text.trim()
        ))
    })
}

fn parse_period(text: &str) -> Result<String> {
    let text = text.trim();
    if !text.contains('/') {
        if text.is_empty() {
            return Err(TrainlogError::Api("Missing period".to_string()));
        }
        return Ok(text.to_string());
    }
    let selection = parse_selection(text)?;
    match (selection.depth(), selection.period) {
        (1, Some(id)) => Ok(id),
        _ => Err(TrainlogError::Api(format!("'{}' does not name a period", text))),
    }
}

fn parse_number(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| TrainlogError::Api(format!("'{}' is not a number", value.trim())))
}

fn component<T: Clone>(value: &Option<T>) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| TrainlogError::Api("Incomplete route".to_string()))
}
