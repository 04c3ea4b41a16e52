use super::backend::KvBackend;
use crate::error::{Result, TrainlogError};
use crate::model::BaseDocument;
use crate::overlay::Overlay;

pub const OVERLAY_SLOT: &str = "overlay";
pub const BASE_SLOT: &str = "base";

/// Typed access to the two persistence slots over any [`KvBackend`].
pub struct LogStore<B: KvBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: KvBackend> LogStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The stored overlay, or an empty one if nothing was stored yet.
    /// Unreadable content is `MalformedOverlay`.
    pub fn load_overlay(&self) -> Result<Overlay> {
        match self.backend.get(OVERLAY_SLOT)? {
            Some(raw) => Overlay::from_json(&raw),
            None => Ok(Overlay::new()),
        }
    }

    pub fn save_overlay(&self, overlay: &Overlay) -> Result<()> {
        let raw = overlay.to_json()?;
        self.backend.set(OVERLAY_SLOT, &raw)
    }

    /// The imported base document, if one was stored.
    /// Unreadable content is `MalformedBaseImport`.
    pub fn load_base(&self) -> Result<Option<BaseDocument>> {
        match self.backend.get(BASE_SLOT)? {
            Some(raw) => BaseDocument::from_json(&raw)
                .map(Some)
                .map_err(|e| TrainlogError::MalformedBaseImport(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn save_base(&self, doc: &BaseDocument) -> Result<()> {
        let raw = serde_json::to_string(doc)?;
        self.backend.set(BASE_SLOT, &raw)
    }

    pub fn clear_base(&self) -> Result<()> {
        self.backend.delete(BASE_SLOT)
    }
}
