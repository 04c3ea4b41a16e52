//! # Trainlog CLI
//!
//! The binary is thin: argument parsing, dispatch and rendering live in
//! `src/cli/`, and this file only calls `cli::run()` and maps failure to an
//! exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/trainlog/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config, logging and dispatch (commands.rs)               │
//! │  - Terminal and JSON rendering (render.rs, styles.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/trainlogapp/src/api.rs)                  │
//! │  - Parses routes, dispatches to commands                    │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from the API inward is UI agnostic. This crate owns every
//! user-facing concern: stdout/stderr, exit codes, colors, relative times.
//!
//! ## Environment
//!
//! - `TRAINLOG_SOURCE`: coach's base document (JSON file)
//! - `TRAINLOG_DATA_DIR`: where local edits are kept
//! - `TRAINLOG_LOG`: tracing filter, e.g. `trainlogapp=debug`

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
