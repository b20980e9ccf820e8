//! # Medrep Architecture
//!
//! Medrep is a **UI-agnostic record client** for doctor contact and call
//! scheduling records kept by a remote HTTP API. It is a library that happens to
//! have a CLI client, not the other way around.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI Layer (the `medrep` binary, or any other front end)     │
//! │  - Parses input, renders output, owns terminal I/O          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Facade owning the store and the active views             │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  View Layer (views/*.rs)                                    │
//! │  - Coordinator: list / add / edit mode                      │
//! │  - List view: authoritative collection + local search       │
//! │  - Form: edit buffer, validation, submit                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store Layer (store/)                                       │
//! │  - Abstract RecordStore trait                               │
//! │  - HttpStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Failures Become Messages
//!
//! The remote store can fail at any time. View handlers never propagate store
//! failures to the caller: a failed fetch becomes an empty list plus an error
//! flag, a failed write becomes an error message with the user's input left
//! intact. `Err` is reserved for misuse of the API itself (an illegal view
//! transition, an unknown record id, invalid form input).
//!
//! ## Testing Strategy
//!
//! 1. **Views** (`views/*.rs`): thorough unit tests against `InMemoryStore`.
//! 2. **API** (`api.rs`): flow tests through the facade.
//! 3. **HttpStore**: integration tests against a fake backend in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`views`]: List/search view, record form, view coordinator
//! - [`store`]: Store abstraction and implementations
//! - [`model`]: Core data types (`Doctor`, `DoctorFields`, `WeekdaySet`)
//! - [`search`]: Column search over a record collection
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod store;
pub mod views;
