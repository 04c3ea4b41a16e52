//! # Session: Explicit State
//!
//! A [`Session`] owns everything an open training log needs: the base
//! document, the overlay, the current selection and the store they persist
//! to. There is no global state; every operation goes through `&self` or
//! `&mut self`.
//!
//! ## Lifecycle
//!
//! 1. [`Session::open`] loads the base (imported `base` slot first, otherwise
//!    the [`BaseSource`]) and the overlay. A source failure is terminal.
//!    [`Session::open_stored`] skips the source, so an import can bring in a
//!    base when none is reachable.
//! 2. Reads resolve against the in-memory state.
//! 3. Writes follow **copy → persist → commit**: the change is made on a copy,
//!    the copy is written to the store, and only then does it replace the
//!    in-memory state. A rejected write (for example `OversizedWrite`) leaves
//!    the session exactly as it was.
//! 4. Dropping the session ends it; nothing needs flushing.
//!
//! ## Degraded Loads
//!
//! - Unreadable overlay slot: logged and treated as empty.
//! - Unreadable base slot: logged and ignored; the source is used instead.

use crate::address::{Locator, Selection};
use crate::error::{Result, TrainlogError};
use crate::hierarchy::locate;
use crate::merge::{merge_with_report, MergeReport};
use crate::model::BaseDocument;
use crate::overlay::{Overlay, PatchFields};
use crate::resolve::{resolve, resolve_history, search, ResolvedEntry};
use crate::source::BaseSource;
use crate::store::backend::KvBackend;
use crate::store::LogStore;
use crate::structure::{self, reconcile_selection, Reconciled};

/// Where the session's base document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseOrigin {
    /// Fetched from the configured source.
    Source,
    /// Read from the `base` slot (an import, or a base edited structurally).
    Stored,
}

/// Result of a structural change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    pub value: T,
    /// Overlay keys purged with removed nodes.
    pub purged_keys: Vec<String>,
    pub selection: Selection,
    /// True when the previous selection pointed at something that is gone.
    pub selection_invalidated: bool,
}

pub struct Session<B: KvBackend> {
    doc: BaseDocument,
    overlay: Overlay,
    selection: Selection,
    origin: BaseOrigin,
    store: LogStore<B>,
}

impl<B: KvBackend> Session<B> {
    pub fn open<S: BaseSource + ?Sized>(store: LogStore<B>, source: &S) -> Result<Self> {
        let (doc, origin) = match stored_base(&store)? {
            Some(doc) => (doc, BaseOrigin::Stored),
            None => (source.fetch()?, BaseOrigin::Source),
        };
        Self::assemble(store, doc, origin)
    }

    /// Opens without a source, for bringing in a replacement base when none is
    /// reachable. With nothing usable in the base slot the document starts
    /// empty; follow with [`Session::import_base`].
    pub fn open_stored(store: LogStore<B>) -> Result<Self> {
        let (doc, origin) = match stored_base(&store)? {
            Some(doc) => (doc, BaseOrigin::Stored),
            None => (BaseDocument::default(), BaseOrigin::Source),
        };
        Self::assemble(store, doc, origin)
    }

    fn assemble(store: LogStore<B>, mut doc: BaseDocument, origin: BaseOrigin) -> Result<Self> {
        let overlay = match store.load_overlay() {
            Ok(overlay) => overlay,
            Err(TrainlogError::MalformedOverlay(reason)) => {
                tracing::warn!(%reason, "ignoring unreadable overlay");
                Overlay::new()
            }
            Err(e) => return Err(e),
        };

        let selection = reconcile_selection(&mut doc, &Selection::default()).selection;
        tracing::debug!(
            origin = ?origin,
            periods = doc.periods.len(),
            patches = overlay.len(),
            "session opened"
        );

        Ok(Self {
            doc,
            overlay,
            selection,
            origin,
            store,
        })
    }

    pub fn document(&self) -> &BaseDocument {
        &self.doc
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn origin(&self) -> BaseOrigin {
        self.origin
    }

    pub fn store(&self) -> &LogStore<B> {
        &self.store
    }

    // --- Reads ---

    pub fn entry(&self, locator: &Locator) -> Result<ResolvedEntry> {
        resolve(&self.doc, &self.overlay, locator)
    }

    pub fn history(&self, period_id: &str, exercise_name: &str) -> Vec<ResolvedEntry> {
        resolve_history(&self.doc, &self.overlay, period_id, exercise_name)
    }

    pub fn search(&self, query: &str) -> Vec<ResolvedEntry> {
        search(&self.doc, &self.overlay, query)
    }

    /// The base with the overlay folded in, plus which patches applied.
    pub fn export(&self) -> MergeReport {
        merge_with_report(&self.doc, &self.overlay)
    }

    // --- Overlay writes ---

    /// Upserts a patch for an existing entry and selects it.
    pub fn edit(&mut self, locator: &Locator, fields: PatchFields) -> Result<ResolvedEntry> {
        locate(&self.doc, locator)?;
        let mut overlay = self.overlay.clone();
        overlay.upsert(locator.key(), fields);
        self.store.save_overlay(&overlay)?;
        self.overlay = overlay;
        self.selection = locator.selection();
        tracing::debug!(entry = %locator, "entry edited");
        self.entry(locator)
    }

    /// Drops the patch for `locator`. Returns whether one existed.
    pub fn revert(&mut self, locator: &Locator) -> Result<bool> {
        if !self.overlay.contains(&locator.key()) {
            return Ok(false);
        }
        let mut overlay = self.overlay.clone();
        overlay.delete(&locator.key());
        self.store.save_overlay(&overlay)?;
        self.overlay = overlay;
        Ok(true)
    }

    /// Drops every patch. Returns how many there were.
    pub fn clear_overlay(&mut self) -> Result<usize> {
        let count = self.overlay.len();
        self.store.save_overlay(&Overlay::new())?;
        self.overlay.clear();
        tracing::info!(count, "overlay cleared");
        Ok(count)
    }

    // --- Selection ---

    /// Moves the selection, falling back per [`reconcile_selection`] when
    /// `wanted` does not exist.
    pub fn select(&mut self, wanted: &Selection) -> Result<Reconciled> {
        let mut doc = self.doc.clone();
        let reconciled = reconcile_selection(&mut doc, wanted);
        if !reconciled.placeholders.is_empty() {
            self.persist_base(&doc)?;
            self.doc = doc;
        }
        self.selection = reconciled.selection.clone();
        Ok(reconciled)
    }

    // --- Structure ---

    pub fn add_period(&mut self, name: &str) -> Result<Change<String>> {
        self.mutate(|doc, _| Ok((structure::add_period(doc, name)?, Vec::new())))
    }

    pub fn rename_period(&mut self, period_id: &str, name: &str) -> Result<Change<()>> {
        self.mutate(|doc, _| {
            structure::rename_period(doc, period_id, name)?;
            Ok(((), Vec::new()))
        })
    }

    pub fn add_block(&mut self, period_id: &str, block: i64) -> Result<Change<u32>> {
        self.mutate(|doc, _| Ok((structure::add_block(doc, period_id, block)?, Vec::new())))
    }

    pub fn add_week(&mut self, period_id: &str, block_id: u32, week: i64) -> Result<Change<u32>> {
        self.mutate(|doc, _| {
            Ok((
                structure::add_week(doc, period_id, block_id, week)?,
                Vec::new(),
            ))
        })
    }

    pub fn add_day(
        &mut self,
        period_id: &str,
        block_id: u32,
        week: u32,
        day: i64,
        label: &str,
    ) -> Result<Change<u32>> {
        self.mutate(|doc, _| {
            Ok((
                structure::add_day(doc, period_id, block_id, week, day, label)?,
                Vec::new(),
            ))
        })
    }

    pub fn add_exercise(&mut self, at: &Selection, name: &str) -> Result<Change<Locator>> {
        let change = self.mutate(|doc, _| Ok((structure::add_exercise(doc, at, name)?, Vec::new())))?;
        self.selection = change.value.selection();
        Ok(Change {
            selection: self.selection.clone(),
            ..change
        })
    }

    /// Removes the node `target` names, purging its overlay patches.
    pub fn remove(&mut self, target: &Selection) -> Result<Change<()>> {
        self.mutate(|doc, overlay| {
            let removal = structure::remove(doc, overlay, target)?;
            Ok(((), removal.purged_keys))
        })
    }

    // --- Base replacement ---

    /// Replaces the base with an imported document and clears the overlay.
    /// A malformed or rejected import leaves the session untouched.
    pub fn import_base(&mut self, raw: &str) -> Result<Reconciled> {
        let mut doc = BaseDocument::from_json(raw)
            .map_err(|e| TrainlogError::MalformedBaseImport(e.to_string()))?;
        let reconciled = reconcile_selection(&mut doc, &Selection::default());

        let previous_origin = self.origin;
        self.store.save_base(&doc)?;
        if let Err(e) = self.store.save_overlay(&Overlay::new()) {
            self.rollback_base(previous_origin);
            return Err(e);
        }

        tracing::info!(
            periods = doc.periods.len(),
            dropped_patches = self.overlay.len(),
            "imported base document"
        );
        self.doc = doc;
        self.overlay = Overlay::new();
        self.origin = BaseOrigin::Stored;
        self.selection = reconciled.selection.clone();
        Ok(reconciled)
    }

    /// Folds the overlay into the base, stores the result as the new base and
    /// clears the overlay.
    pub fn bake(&mut self) -> Result<MergeReport> {
        let report = self.export();
        let previous_origin = self.origin;
        self.store.save_base(&report.document)?;
        if let Err(e) = self.store.save_overlay(&Overlay::new()) {
            self.rollback_base(previous_origin);
            return Err(e);
        }
        tracing::info!(applied = report.applied.len(), "baked overlay into base");
        self.doc = report.document.clone();
        self.overlay = Overlay::new();
        self.origin = BaseOrigin::Stored;
        Ok(report)
    }

    /// Forgets the stored base and reloads from `source`. The overlay is kept
    /// unless `clear_overlay` is set. If clearing the overlay slot fails the
    /// base slot is restored and the session is left as it was.
    pub fn reset_base<S: BaseSource + ?Sized>(
        &mut self,
        source: &S,
        clear_overlay: bool,
    ) -> Result<()> {
        let mut doc = source.fetch()?;
        let previous_origin = self.origin;
        self.store.clear_base()?;
        if clear_overlay {
            if let Err(e) = self.store.save_overlay(&Overlay::new()) {
                self.rollback_base(previous_origin);
                return Err(e);
            }
            self.overlay = Overlay::new();
        }
        self.selection = reconcile_selection(&mut doc, &self.selection).selection;
        self.doc = doc;
        self.origin = BaseOrigin::Source;
        Ok(())
    }

    // --- Internals ---

    /// Copy → mutate → reconcile → persist → commit.
    fn mutate<T, F>(&mut self, f: F) -> Result<Change<T>>
    where
        F: FnOnce(&mut BaseDocument, &mut Overlay) -> Result<(T, Vec<String>)>,
    {
        let mut doc = self.doc.clone();
        let mut overlay = self.overlay.clone();
        let (value, purged_keys) = f(&mut doc, &mut overlay)?;
        let reconciled = reconcile_selection(&mut doc, &self.selection);

        let previous_origin = self.origin;
        self.persist_base(&doc)?;
        if !purged_keys.is_empty() {
            if let Err(e) = self.store.save_overlay(&overlay) {
                self.rollback_base(previous_origin);
                return Err(e);
            }
        }

        self.doc = doc;
        self.overlay = overlay;
        self.origin = BaseOrigin::Stored;
        self.selection = reconciled.selection.clone();
        Ok(Change {
            value,
            purged_keys,
            selection: reconciled.selection,
            selection_invalidated: reconciled.invalidated,
        })
    }

    fn persist_base(&mut self, doc: &BaseDocument) -> Result<()> {
        self.store.save_base(doc)?;
        self.origin = BaseOrigin::Stored;
        Ok(())
    }

    /// Best-effort restore of the base slot after a failed follow-up write.
    fn rollback_base(&mut self, previous_origin: BaseOrigin) {
        let restored = match previous_origin {
            BaseOrigin::Source => self.store.clear_base(),
            BaseOrigin::Stored => self.store.save_base(&self.doc),
        };
        if let Err(e) = restored {
            tracing::warn!(error = %e, "could not restore base slot after failed write");
        }
        self.origin = previous_origin;
    }
}

/// The base slot's document. Unreadable content is logged and treated as
/// absent.
fn stored_base<B: KvBackend>(store: &LogStore<B>) -> Result<Option<BaseDocument>> {
    match store.load_base() {
        Err(TrainlogError::MalformedBaseImport(reason)) => {
            tracing::warn!(%reason, "ignoring unreadable stored base document");
            Ok(None)
        }
        other => other,
    }
}
