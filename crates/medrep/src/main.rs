//! # Medrep CLI Architecture
//!
//! Medrep ships with a CLI client, but the binary is intentionally thin: the
//! CLI lives in `src/cli/`, while this file only invokes `cli::run()` and turns
//! the outcome into a process exit code.
//!
//! ## Workspace Structure
//!
//! Medrep is organized as a Cargo workspace with two crates:
//! - `crates/medrepapp/`: UI-agnostic record state, store and configuration
//! - `crates/medrep/`: this CLI, depends on the `medrepapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/medrep/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch + runtime (commands.rs)        │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/medrepapp/src/api.rs)                    │
//! │  - Owns the store, list view, form and coordinator          │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Views + Store (crates/medrepapp/src/{views,store}/)        │
//! │  - State transitions and HTTP calls                         │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests against the in-memory store, plus HttpStore
//!   tests against a fake backend.
//! - **CLI parsing and rendering**: unit tests in `setup.rs` and `render.rs`.
//! - **End to end**: `tests/cli_e2e.rs` runs the binary against a fake backend
//!   and against an address nothing listens on.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
