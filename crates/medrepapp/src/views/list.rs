//! # List/Search View
//!
//! Owns the **authoritative collection**: the client's copy of every record,
//! replaced wholesale each time a fetch succeeds and never patched locally.
//!
//! ## Lifecycle
//!
//! A new view is in the loading state. [`ListView::load`] performs the fetch:
//!
//! - success: collection replaced, error flag cleared
//! - failure: collection emptied, error flag set, error message returned
//!
//! Either way loading ends. There is no automatic retry.
//!
//! ## Search
//!
//! The visible rows are derived on every call to [`ListView::visible`] from
//! (collection, column, text), so they can never go stale. No network call is
//! involved; see [`crate::search`].
//!
//! ## Delete Prompt
//!
//! Deleting is two-step. [`ListView::request_delete`] only opens a prompt
//! holding the target. [`ListView::confirm_delete`] issues the call and, on
//! success, re-fetches the whole collection rather than splicing the row out.
//! [`ListView::cancel_delete`] drops the target without touching the network.

use super::{CmdMessage, CmdResult};
use crate::error::{MedrepError, Result};
use crate::model::{Doctor, DoctorId, SearchColumn};
use crate::search::filter_records;
use crate::store::RecordStore;

pub const LOAD_FAILED: &str = "Failed to load doctors";
pub const DELETE_OK: &str = "Doctor deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete doctor!";
pub const NO_RECORDS: &str = "No doctors available.";
pub const NO_MATCHES: &str = "No doctors found matching your search criteria.";

#[derive(Debug, Clone)]
pub struct ListView {
    records: Vec<Doctor>,
    loading: bool,
    error: bool,
    search_column: SearchColumn,
    search_text: String,
    pending_delete: Option<Doctor>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(SearchColumn::default())
    }
}

impl ListView {
    pub fn new(search_column: SearchColumn) -> Self {
        Self {
            records: Vec::new(),
            loading: true,
            error: false,
            search_column,
            search_text: String::new(),
            pending_delete: None,
        }
    }

    /// Fetch the collection and replace local state with the outcome.
    pub async fn load<S: RecordStore>(&mut self, store: &S) -> CmdResult {
        self.loading = true;
        let outcome = store.list().await;
        self.loading = false;

        match outcome {
            Ok(records) => {
                tracing::debug!(count = records.len(), "doctor list loaded");
                self.records = records;
                self.error = false;
                CmdResult::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load doctors");
                self.records.clear();
                self.error = true;
                CmdResult::default().with_message(CmdMessage::error(LOAD_FAILED))
            }
        }
    }

    pub fn records(&self) -> &[Doctor] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn search_column(&self) -> SearchColumn {
        self.search_column
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn set_search_column(&mut self, column: SearchColumn) {
        self.search_column = column;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Back to an unfiltered view, searching by name.
    pub fn clear_search(&mut self) {
        self.search_text.clear();
        self.search_column = SearchColumn::Name;
    }

    /// Rows to display: the collection filtered by the active search.
    pub fn visible(&self) -> Vec<&Doctor> {
        filter_records(&self.records, self.search_column, &self.search_text)
    }

    /// "Showing X of Y doctors", only while a search is typed in.
    pub fn summary(&self) -> Option<String> {
        if self.search_text.is_empty() {
            return None;
        }
        Some(format!(
            "Showing {} of {} doctors",
            self.visible().len(),
            self.records.len()
        ))
    }

    /// Text of the single placeholder row shown when there is nothing to list.
    pub fn placeholder(&self) -> Option<&'static str> {
        if !self.visible().is_empty() {
            return None;
        }
        if self.search_text.is_empty() {
            Some(NO_RECORDS)
        } else {
            Some(NO_MATCHES)
        }
    }

    pub fn find(&self, id: &DoctorId) -> Option<&Doctor> {
        self.records.iter().find(|d| &d.id == id)
    }

    /// The record to hand to the coordinator for editing. No refetch.
    pub fn request_edit(&self, id: &DoctorId) -> Result<Doctor> {
        self.find(id)
            .cloned()
            .ok_or_else(|| MedrepError::NotFound(id.clone()))
    }

    /// Open the delete prompt for `id`.
    pub fn request_delete(&mut self, id: &DoctorId) -> Result<&Doctor> {
        let target = self
            .find(id)
            .cloned()
            .ok_or_else(|| MedrepError::NotFound(id.clone()))?;
        Ok(self.pending_delete.insert(target))
    }

    pub fn pending_delete(&self) -> Option<&Doctor> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the prompt's target. The prompt closes whatever the outcome.
    pub async fn confirm_delete<S: RecordStore>(&mut self, store: &S) -> CmdResult {
        let Some(target) = self.pending_delete.take() else {
            return CmdResult::default();
        };

        match store.delete(&target.id).await {
            Ok(()) => {
                tracing::debug!(id = %target.id, "doctor deleted");
                let mut result = CmdResult::default()
                    .with_affected(Some(target))
                    .with_message(CmdMessage::success(DELETE_OK));
                result.extend(self.load(store).await);
                result
            }
            Err(e) => {
                tracing::warn!(id = %target.id, error = %e, "failed to delete doctor");
                CmdResult::default()
                    .with_affected(Some(target))
                    .with_message(CmdMessage::error(DELETE_FAILED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::{StoreCall, StoreOp};

    #[test]
    fn test_new_view_is_loading() {
        let view = ListView::default();
        assert!(view.is_loading());
        assert!(!view.has_error());
        assert!(view.records().is_empty());
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let store = StoreFixture::new().with_doctors(3).store;
        let mut view = ListView::default();
        let result = view.load(&store).await;

        assert!(result.messages.is_empty());
        assert!(!view.is_loading());
        assert_eq!(view.records().len(), 3);
        assert_eq!(view.visible().len(), 3);
    }

    #[tokio::test]
    async fn test_load_failure_empties_and_flags() {
        let store = StoreFixture::new().with_doctors(2).store;
        let mut view = ListView::default();
        view.load(&store).await;
        assert_eq!(view.records().len(), 2);

        store.fail_next(StoreOp::List);
        let result = view.load(&store).await;

        assert!(view.records().is_empty());
        assert!(view.has_error());
        assert!(!view.is_loading());
        assert_eq!(result.messages, vec![CmdMessage::error(LOAD_FAILED)]);
    }

    #[tokio::test]
    async fn test_successful_load_clears_error() {
        let store = StoreFixture::new().with_doctors(1).store;
        let mut view = ListView::default();
        store.fail_next(StoreOp::List);
        view.load(&store).await;
        assert!(view.has_error());

        view.load(&store).await;
        assert!(!view.has_error());
        assert_eq!(view.records().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_collection_has_placeholder() {
        let store = StoreFixture::new().store;
        let mut view = ListView::default();
        view.load(&store).await;
        assert_eq!(view.placeholder(), Some(NO_RECORDS));
    }

    #[tokio::test]
    async fn test_no_matches_placeholder_and_summary() {
        let store = StoreFixture::new()
            .with_doctor("Asha Rao", "D-1")
            .with_doctor("Vikram Shah", "D-2")
            .store;
        let mut view = ListView::default();
        view.load(&store).await;

        view.set_search_text("rao");
        assert_eq!(view.summary().as_deref(), Some("Showing 1 of 2 doctors"));
        assert_eq!(view.placeholder(), None);

        view.set_search_text("zzz");
        assert_eq!(view.placeholder(), Some(NO_MATCHES));
        assert_eq!(view.summary().as_deref(), Some("Showing 0 of 2 doctors"));
    }

    #[tokio::test]
    async fn test_search_is_local() {
        let store = StoreFixture::new().with_doctors(5).store;
        let mut view = ListView::default();
        view.load(&store).await;
        store.clear_calls();

        view.set_search_column(SearchColumn::Code);
        view.set_search_text("d-003");
        assert_eq!(view.visible().len(), 1);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_sun_matches_sunday() {
        let store = StoreFixture::new().with_doctor("Sunday Clinic", "C-1").store;
        let mut view = ListView::default();
        view.load(&store).await;
        view.set_search_text("sun");
        assert_eq!(view.visible().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_search_resets_column() {
        let mut view = ListView::default();
        view.set_search_column(SearchColumn::TaxId);
        view.set_search_text("ABC");
        view.clear_search();
        assert_eq!(view.search_column(), SearchColumn::Name);
        assert_eq!(view.search_text(), "");
    }

    #[tokio::test]
    async fn test_confirm_delete_then_refetch() {
        let store = StoreFixture::new().with_doctors(2).store;
        let mut view = ListView::default();
        view.load(&store).await;
        store.clear_calls();

        let id = view.records()[0].id.clone();
        view.request_delete(&id).unwrap();
        assert_eq!(view.pending_delete().map(|d| &d.id), Some(&id));

        let result = view.confirm_delete(&store).await;

        assert_eq!(
            store.calls(),
            vec![StoreCall::Delete(id.clone()), StoreCall::List]
        );
        assert!(view.pending_delete().is_none());
        assert_eq!(view.records().len(), 1);
        assert!(view.find(&id).is_none());
        assert_eq!(result.messages, vec![CmdMessage::success(DELETE_OK)]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_collection() {
        let store = StoreFixture::new().with_doctors(2).store;
        let mut view = ListView::default();
        view.load(&store).await;
        store.clear_calls();
        store.fail_next(StoreOp::Delete);

        let id = view.records()[1].id.clone();
        view.request_delete(&id).unwrap();
        let result = view.confirm_delete(&store).await;

        assert_eq!(store.calls(), vec![StoreCall::Delete(id.clone())]);
        assert!(view.pending_delete().is_none());
        assert_eq!(view.records().len(), 2);
        assert!(result.has_error());
        assert_eq!(result.messages[0].content, DELETE_FAILED);
    }

    #[tokio::test]
    async fn test_cancel_delete_makes_no_call() {
        let store = StoreFixture::new().with_doctors(1).store;
        let mut view = ListView::default();
        view.load(&store).await;
        store.clear_calls();

        let id = view.records()[0].id.clone();
        view.request_delete(&id).unwrap();
        view.cancel_delete();

        assert!(view.pending_delete().is_none());
        let result = view.confirm_delete(&store).await;
        assert!(result.messages.is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_request_unknown_record() {
        let store = StoreFixture::new().with_doctors(1).store;
        let mut view = ListView::default();
        view.load(&store).await;

        let missing = DoctorId::new("404");
        assert!(matches!(
            view.request_edit(&missing),
            Err(MedrepError::NotFound(_))
        ));
        assert!(view.request_delete(&missing).is_err());
        assert!(view.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_request_edit_hands_over_full_record() {
        let store = StoreFixture::new().with_full_doctor().store;
        let mut view = ListView::default();
        view.load(&store).await;
        store.clear_calls();

        let id = view.records()[0].id.clone();
        let doc = view.request_edit(&id).unwrap();
        assert_eq!(doc, store.records()[0]);
        assert!(store.calls().is_empty());
    }
}
