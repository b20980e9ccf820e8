//! # API Facade
//!
//! The API layer is the single entry point for medrep operations, whatever the
//! UI. It owns the store and the view state of one session, and wires the views
//! together the way the screens of a UI would.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Routes** user actions to the list view, form or coordinator
//! - **Keeps the views consistent**: a form exists exactly while the
//!   coordinator is in add or edit mode, and a successful save reloads the list
//! - **Returns structured types** (`CmdResult`, or `Result<CmdResult>` where the
//!   action can be misused)
//!
//! ## What the API Does NOT Do
//!
//! - **Terminal I/O**: no stdout, no prompts
//! - **Presentation**: messages carry a level, the UI picks colours
//!
//! ## Errors
//!
//! Store failures never come back as `Err`; they are already messages in the
//! returned `CmdResult`. `Err` means the caller asked for something impossible:
//! an unknown id, a second form, a submit with no form, input the form rejects.
//!
//! ## Generic Over RecordStore
//!
//! `MedrepApi<S: RecordStore>` is generic over the backend:
//! - Production: `MedrepApi<HttpStore>`
//! - Testing: `MedrepApi<InMemoryStore>`

use crate::error::{MedrepError, Result};
use crate::model::{Doctor, DoctorId, SearchColumn};
use crate::store::RecordStore;
use crate::views::coordinator::{Coordinator, ViewMode};
use crate::views::form::RecordForm;
use crate::views::list::ListView;

pub use crate::views::{CmdMessage, CmdResult, MessageLevel};

pub struct MedrepApi<S: RecordStore> {
    store: S,
    coordinator: Coordinator,
    list: ListView,
    form: Option<RecordForm>,
}

impl<S: RecordStore> MedrepApi<S> {
    pub fn new(store: S, search_column: SearchColumn) -> Self {
        Self {
            store,
            coordinator: Coordinator::new(),
            list: ListView::new(search_column),
            form: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> &ViewMode {
        self.coordinator.mode()
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    /// Fetch the collection into the list view.
    pub async fn open_list(&mut self) -> CmdResult {
        self.list.load(&self.store).await
    }

    pub fn search(&mut self, column: SearchColumn, text: impl Into<String>) {
        self.list.set_search_column(column);
        self.list.set_search_text(text);
    }

    pub fn clear_search(&mut self) {
        self.list.clear_search();
    }

    pub fn begin_add(&mut self) -> Result<&mut RecordForm> {
        self.coordinator.add_new()?;
        Ok(self.form.insert(RecordForm::new(None)))
    }

    /// Open the form on a record from the loaded collection.
    pub fn begin_edit(&mut self, id: &DoctorId) -> Result<&mut RecordForm> {
        let doctor = self.list.request_edit(id)?;
        self.coordinator.edit(doctor.clone())?;
        Ok(self.form.insert(RecordForm::new(Some(&doctor))))
    }

    pub fn form(&self) -> Result<&RecordForm> {
        self.form.as_ref().ok_or(MedrepError::NoActiveForm)
    }

    pub fn form_mut(&mut self) -> Result<&mut RecordForm> {
        self.form.as_mut().ok_or(MedrepError::NoActiveForm)
    }

    /// Submit the active form. On success the form closes and the list
    /// reloads; on a store failure the form stays open with its input.
    pub async fn submit_form(&mut self) -> Result<CmdResult> {
        let form = self.form.as_mut().ok_or(MedrepError::NoActiveForm)?;
        let submission = form.submit(&self.store).await?;

        if !submission.is_saved() {
            return Ok(submission.into_result());
        }

        self.coordinator.saved()?;
        self.form = None;
        let mut result = submission.into_result();
        result.extend(self.list.load(&self.store).await);
        Ok(result)
    }

    pub fn cancel_form(&mut self) -> Result<()> {
        if self.form.is_none() {
            return Err(MedrepError::NoActiveForm);
        }
        self.coordinator.cancelled()?;
        self.form = None;
        Ok(())
    }

    pub fn back_to_list(&mut self) {
        self.coordinator.back_to_list();
        self.form = None;
    }

    pub fn request_delete(&mut self, id: &DoctorId) -> Result<&Doctor> {
        self.list.request_delete(id)
    }

    pub async fn confirm_delete(&mut self) -> CmdResult {
        self.list.confirm_delete(&self.store).await
    }

    pub fn cancel_delete(&mut self) {
        self.list.cancel_delete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::{InMemoryStore, StoreCall, StoreOp};
    use crate::views::form::{SAVED, SAVE_FAILED, UPDATED};
    use crate::views::list::{DELETE_OK, LOAD_FAILED};

    async fn loaded(fixture: StoreFixture) -> MedrepApi<InMemoryStore> {
        let mut api = MedrepApi::new(fixture.store, SearchColumn::Name);
        let result = api.open_list().await;
        assert!(!result.has_error());
        api.store().clear_calls();
        api
    }

    #[tokio::test]
    async fn test_open_list_loads_records() {
        let api = loaded(StoreFixture::new().with_doctors(3)).await;
        assert_eq!(api.list().records().len(), 3);
        assert_eq!(api.mode(), &ViewMode::List);
        assert!(api.form().is_err());
    }

    #[tokio::test]
    async fn test_open_list_failure_is_a_message() {
        let store = StoreFixture::new().with_doctors(2).store;
        store.fail_next(StoreOp::List);
        let mut api = MedrepApi::new(store, SearchColumn::Name);

        let result = api.open_list().await;

        assert_eq!(result.messages, vec![CmdMessage::error(LOAD_FAILED)]);
        assert!(api.list().records().is_empty());
        assert!(api.list().has_error());
    }

    #[tokio::test]
    async fn test_search_and_clear() {
        let mut api = loaded(
            StoreFixture::new()
                .with_doctor("Asha Rao", "D-1")
                .with_doctor("Vikram Shah", "D-2"),
        )
        .await;

        api.search(SearchColumn::Code, "d-2");
        let names: Vec<&str> = api.list().visible().iter().map(|d| d.fields.name.as_str()).collect();
        assert_eq!(names, vec!["Vikram Shah"]);

        api.clear_search();
        assert_eq!(api.list().visible().len(), 2);
        assert_eq!(api.list().search_column(), SearchColumn::Name);
    }

    #[tokio::test]
    async fn test_add_flow_reloads_list() {
        let mut api = loaded(StoreFixture::new().with_doctors(1)).await;

        let form = api.begin_add().unwrap();
        form.set(Field::Name, "New Doctor");
        form.set(Field::Code, "D-900");
        assert_eq!(api.mode(), &ViewMode::Add);

        let result = api.submit_form().await.unwrap();

        assert_eq!(result.messages, vec![CmdMessage::success(SAVED)]);
        assert_eq!(api.mode(), &ViewMode::List);
        assert!(api.form().is_err());
        assert_eq!(api.list().records().len(), 2);
        assert!(matches!(api.store().calls().as_slice(), [StoreCall::Create(_), StoreCall::List]));
    }

    #[tokio::test]
    async fn test_edit_flow_updates_record() {
        let mut api = loaded(StoreFixture::new().with_full_doctor()).await;
        let id = api.list().records()[0].id.clone();

        api.begin_edit(&id).unwrap().set(Field::Notes, "Moved clinic");
        assert_eq!(api.mode().name(), "edit");

        let result = api.submit_form().await.unwrap();

        assert_eq!(result.messages, vec![CmdMessage::success(UPDATED)]);
        assert_eq!(api.list().records()[0].fields.notes, "Moved clinic");
        assert_eq!(api.mode(), &ViewMode::List);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form_open() {
        let mut api = loaded(StoreFixture::new()).await;
        let form = api.begin_add().unwrap();
        form.set(Field::Name, "New Doctor");
        form.set(Field::Code, "D-900");
        api.store().fail_next(StoreOp::Create);

        let result = api.submit_form().await.unwrap();

        assert_eq!(result.messages, vec![CmdMessage::error(SAVE_FAILED)]);
        assert_eq!(api.mode(), &ViewMode::Add);
        assert_eq!(api.form().unwrap().get(Field::Name), "New Doctor");
        assert_eq!(api.store().calls(), vec![StoreCall::Create(api.form().unwrap().buffer().to_fields())]);
    }

    #[tokio::test]
    async fn test_invalid_submit_is_an_error() {
        let mut api = loaded(StoreFixture::new()).await;
        api.begin_add().unwrap();

        let err = api.submit_form().await.unwrap_err();

        assert!(matches!(err, MedrepError::Invalid(_)));
        assert!(api.store().calls().is_empty());
        assert_eq!(api.mode(), &ViewMode::Add);
    }

    #[tokio::test]
    async fn test_second_form_is_illegal() {
        let mut api = loaded(StoreFixture::new().with_doctors(1)).await;
        let id = api.list().records()[0].id.clone();

        api.begin_add().unwrap();
        let err = api.begin_edit(&id).unwrap_err();
        assert!(matches!(err, MedrepError::IllegalTransition { .. }));
        assert_eq!(api.mode(), &ViewMode::Add);
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let mut api = loaded(StoreFixture::new().with_doctors(1)).await;
        let err = api.begin_edit(&DoctorId::new("nope")).unwrap_err();
        assert!(matches!(err, MedrepError::NotFound(_)));
        assert_eq!(api.mode(), &ViewMode::List);
    }

    #[tokio::test]
    async fn test_cancel_form_makes_no_call() {
        let mut api = loaded(StoreFixture::new().with_doctors(1)).await;
        let id = api.list().records()[0].id.clone();
        api.begin_edit(&id).unwrap().set(Field::Name, "Changed");

        api.cancel_form().unwrap();

        assert_eq!(api.mode(), &ViewMode::List);
        assert!(api.store().calls().is_empty());
        assert_eq!(api.list().records()[0].fields.name, "Doctor 1");
        assert!(matches!(api.cancel_form(), Err(MedrepError::NoActiveForm)));
    }

    #[tokio::test]
    async fn test_submit_without_form() {
        let mut api = loaded(StoreFixture::new()).await;
        assert!(matches!(
            api.submit_form().await,
            Err(MedrepError::NoActiveForm)
        ));
    }

    #[tokio::test]
    async fn test_back_to_list_drops_form() {
        let mut api = loaded(StoreFixture::new()).await;
        api.begin_add().unwrap();
        api.back_to_list();
        assert_eq!(api.mode(), &ViewMode::List);
        assert!(api.form().is_err());
        assert!(api.begin_add().is_ok());
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let mut api = loaded(StoreFixture::new().with_doctors(2)).await;
        let id = api.list().records()[0].id.clone();

        assert_eq!(api.request_delete(&id).unwrap().id, id);
        let result = api.confirm_delete().await;

        assert_eq!(result.messages, vec![CmdMessage::success(DELETE_OK)]);
        assert_eq!(api.list().records().len(), 1);
        assert_eq!(api.store().calls(), vec![StoreCall::Delete(id), StoreCall::List]);
    }

    #[tokio::test]
    async fn test_cancel_delete() {
        let mut api = loaded(StoreFixture::new().with_doctors(1)).await;
        let id = api.list().records()[0].id.clone();

        api.request_delete(&id).unwrap();
        api.cancel_delete();
        let result = api.confirm_delete().await;

        assert!(result.messages.is_empty());
        assert!(api.store().calls().is_empty());
        assert_eq!(api.list().records().len(), 1);
    }
}
