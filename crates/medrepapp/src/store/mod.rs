//! # Store Layer
//!
//! This module defines the record store abstraction. The [`RecordStore`] trait
//! is the client side of the remote doctors API: four operations, each one
//! network round trip.
//!
//! ## Contract
//!
//! - No retries, no caching, no timeout beyond the transport default.
//! - No partial failure: an operation either succeeded or it didn't.
//! - Stores own no record state that callers can observe. The authoritative
//!   in-memory collection belongs to the list view.
//! - Write operations take [`DoctorFields`], never a [`Doctor`]. The identifier
//!   only ever travels in the URL.
//!
//! ## Implementations
//!
//! - [`http::HttpStore`]: Production implementation over `reqwest`.
//! - [`memory::InMemoryStore`]: For testing view logic without a server.

use crate::error::Result;
use crate::model::{Doctor, DoctorFields, DoctorId};
use std::future::Future;

pub mod http;
pub mod memory;

/// Abstract interface to the remote record collection.
pub trait RecordStore {
    /// Fetch the full collection in store order.
    fn list(&self) -> impl Future<Output = Result<Vec<Doctor>>> + Send;

    /// Create a record. Returns the stored record when the response carries one.
    fn create(&self, draft: &DoctorFields) -> impl Future<Output = Result<Option<Doctor>>> + Send;

    /// Replace the record `id` with `draft`.
    fn update(
        &self,
        id: &DoctorId,
        draft: &DoctorFields,
    ) -> impl Future<Output = Result<Option<Doctor>>> + Send;

    /// Remove the record `id`.
    fn delete(&self, id: &DoctorId) -> impl Future<Output = Result<()>> + Send;
}
