//! # Storage Layer
//!
//! Trainlog persists two things, each as one opaque string in a key-value
//! store:
//!
//! | Slot      | Contents                                             |
//! |-----------|------------------------------------------------------|
//! | `overlay` | The overlay map (entry key → patch), JSON            |
//! | `base`    | Optional imported base document replacing the source |
//!
//! The split mirrors the data model: the base document is shared and
//! replaceable, the overlay is private and survives base reloads unless an
//! import clears it.
//!
//! ## Layers
//!
//! - [`backend::KvBackend`]: the "how" (raw get/set/delete of strings).
//!   [`fs_backend::FsBackend`] writes one file per key; [`mem_backend::MemBackend`]
//!   keeps values in memory for tests.
//! - [`log_store::LogStore`]: the "what". Knows the slot names and the JSON
//!   shapes, and maps unreadable content to `MalformedOverlay` /
//!   `MalformedBaseImport` so callers can decide how to degrade.
//!
//! ## Capacity
//!
//! Backends may carry a per-value byte limit. A larger write is rejected with
//! `OversizedWrite` before anything is written, so the previous value stays
//! intact.
//!
//! ## Storage Layout (`FsBackend`)
//!
//! ```text
//! <data_dir>/
//! ├── overlay.json   # Overlay slot
//! └── base.json      # Imported base document (absent until an import)
//! ```
//!
//! Two processes sharing a data directory overwrite each other's slots; the
//! last write wins.

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod log_store;
pub mod mem_backend;
pub mod memory;

pub use log_store::{LogStore, BASE_SLOT, OVERLAY_SLOT};
