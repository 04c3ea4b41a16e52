//! # Trainlog Architecture
//!
//! Trainlog is a **UI-agnostic training log library**. A coach distributes a
//! read-only *base document* (period → block → week → day → exercise); every
//! lifter keeps private edits in a sparse *overlay* that is layered on top of
//! the base at read time, and can later be folded back into a new base for
//! redistribution.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/trainlog)                                      │
//! │  - Parses arguments, formats output, owns terminal I/O      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Parses route strings into locators / selections          │
//! │  - Dispatches to commands                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands + Session (commands/, session.rs)                 │
//! │  - Explicit state: base document, overlay, selection        │
//! │  - Mutate a copy, persist, then commit                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core engine                                                │
//! │  address → hierarchy → overlay → resolve / structure / merge│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/) and base source (source.rs)               │
//! │  - Opaque key-value slots: `overlay`, `base`                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing from `api.rs` inward writes to stdout/stderr or exits the process.
//! Every operation returns a `Result`; only a failed initial load of the base
//! document is terminal to a session.
//!
//! ## Concurrency
//!
//! Everything is single-threaded and synchronous. Two processes pointed at the
//! same data directory overwrite each other's slots (last write wins); no
//! conflict detection is attempted.
//!
//! ## Module Overview
//!
//! - [`address`]: Locators, entry keys and route tokens
//! - [`hierarchy`]: Read-only lookups through the base document
//! - [`overlay`]: Patches and the overlay map
//! - [`resolve`]: Base + overlay → resolved entries, history, search
//! - [`structure`]: Insert/remove at every level, selection fallback
//! - [`merge`]: Fold the overlay into a new base document
//! - [`session`]: Explicit session state wiring the above to storage
//! - [`commands`] / [`api`]: Structured operations and the facade
//! - [`store`] / [`source`]: Persistence slots and base document transport
//! - [`config`], [`error`], [`model`]

pub mod address;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod merge;
pub mod model;
pub mod overlay;
pub mod resolve;
pub mod session;
pub mod source;
pub mod store;
pub mod structure;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
