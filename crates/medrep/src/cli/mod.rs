//! # CLI Behavior
//!
//! This is **one possible UI client** for medrep, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Naked Execution (`medrep`)
//!
//! Running `medrep` with no arguments defaults to `medrep list`.
//!
//! ## Partial Edits
//!
//! `medrep edit ID` opens the form on the stored record, so only the flags
//! given change; everything else is submitted as it was loaded. Call days can
//! be replaced wholesale with `--call-days` or flipped one at a time with
//! `--toggle-day`.
//!
//! ## Deleting
//!
//! `medrep delete ID` asks for confirmation on the terminal. `--yes` skips
//! the question, for scripts.

mod commands;
mod render;
mod setup;

pub use commands::run;
