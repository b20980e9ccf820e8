use super::RecordStore;
use crate::error::{MedrepError, Result};
use crate::model::{Doctor, DoctorFields, DoctorId};
use std::sync::{Mutex, MutexGuard};

/// One call received by an [`InMemoryStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Create(DoctorFields),
    Update(DoctorId, DoctorFields),
    Delete(DoctorId),
}

/// Store operations, used to target simulated failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
}

impl StoreCall {
    fn op(&self) -> StoreOp {
        match self {
            StoreCall::List => StoreOp::List,
            StoreCall::Create(_) => StoreOp::Create,
            StoreCall::Update(..) => StoreOp::Update,
            StoreCall::Delete(_) => StoreOp::Delete,
        }
    }
}

#[derive(Default)]
struct State {
    records: Vec<Doctor>,
    next_id: u64,
    calls: Vec<StoreCall>,
    failing: Vec<StoreOp>,
}

/// In-memory record store for testing.
///
/// Ids are assigned sequentially ("1", "2", ...). Every call is logged and
/// can be made to fail with [`InMemoryStore::fail_next`].
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test thread can't leave State half-updated.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a record directly, bypassing the call log. Returns its id.
    pub fn insert(&self, fields: DoctorFields) -> DoctorId {
        let mut state = self.state();
        state.next_id += 1;
        let id = DoctorId::new(state.next_id.to_string());
        state.records.push(Doctor::new(id.clone(), fields));
        id
    }

    /// Make the next call of `op` fail with a 500.
    pub fn fail_next(&self, op: StoreOp) {
        self.state().failing.push(op);
    }

    pub fn records(&self) -> Vec<Doctor> {
        self.state().records.clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Logs `call`, then fails it if a failure was queued for its op.
    fn record_call(&self, call: StoreCall) -> Result<MutexGuard<'_, State>> {
        let mut state = self.state();
        let op = call.op();
        state.calls.push(call);
        if let Some(pos) = state.failing.iter().position(|f| *f == op) {
            state.failing.remove(pos);
            return Err(MedrepError::Status {
                status: 500,
                body: format!("simulated {:?} failure", op),
            });
        }
        Ok(state)
    }
}

impl RecordStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Doctor>> {
        let state = self.record_call(StoreCall::List)?;
        Ok(state.records.clone())
    }

    async fn create(&self, draft: &DoctorFields) -> Result<Option<Doctor>> {
        let mut state = self.record_call(StoreCall::Create(draft.clone()))?;
        state.next_id += 1;
        let doc = Doctor::new(DoctorId::new(state.next_id.to_string()), draft.clone());
        state.records.push(doc.clone());
        Ok(Some(doc))
    }

    async fn update(&self, id: &DoctorId, draft: &DoctorFields) -> Result<Option<Doctor>> {
        let mut state = self.record_call(StoreCall::Update(id.clone(), draft.clone()))?;
        let doc = state
            .records
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| MedrepError::NotFound(id.clone()))?;
        doc.fields = draft.clone();
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, id: &DoctorId) -> Result<()> {
        let mut state = self.record_call(StoreCall::Delete(id.clone()))?;
        let before = state.records.len();
        state.records.retain(|d| &d.id != id);
        if state.records.len() == before {
            return Err(MedrepError::NotFound(id.clone()));
        }
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::WeekdaySet;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_doctors(self, count: usize) -> Self {
            for i in 0..count {
                self.store.insert(DoctorFields {
                    name: format!("Doctor {}", i + 1),
                    code: format!("D-{:03}", i + 1),
                    ..Default::default()
                });
            }
            self
        }

        pub fn with_doctor(self, name: &str, code: &str) -> Self {
            self.store.insert(DoctorFields {
                name: name.to_string(),
                code: code.to_string(),
                ..Default::default()
            });
            self
        }

        pub fn with_full_doctor(self) -> Self {
            self.store.insert(sample_fields());
            self
        }
    }

    /// A record with every field populated.
    pub fn sample_fields() -> DoctorFields {
        DoctorFields {
            name: "Asha Rao".into(),
            code: "D-104".into(),
            mobile: "9876543210".into(),
            registration_no: "1042".into(),
            email: "asha.rao@example.com".into(),
            tax_id: "ABCPR1234K".into(),
            address: "12 MG Road, Pune".into(),
            date_of_birth: "1979-04-18".into(),
            call_days: "Monday,Thursday".parse::<WeekdaySet>().unwrap_or_default(),
            call_time: "10:30".into(),
            notes: "Prefers morning visits".into(),
            chemist_details: "City Pharma".into(),
            medical_registration: "MMC-55120".into(),
            visiting_rx: "Visiting".into(),
            status: "Active".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let a = store.create(&DoctorFields::default()).await.unwrap().unwrap();
        let b = store.create(&DoctorFields::default()).await.unwrap().unwrap();
        assert_eq!(a.id.as_str(), "1");
        assert_eq!(b.id.as_str(), "2");
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn test_calls_are_logged_in_order() {
        let fixture = StoreFixture::new().with_doctors(1);
        let store = fixture.store;
        store.list().await.unwrap();
        store.delete(&DoctorId::new("1")).await.unwrap();
        assert_eq!(
            store.calls(),
            vec![StoreCall::List, StoreCall::Delete(DoctorId::new("1"))]
        );
    }

    #[tokio::test]
    async fn test_fail_next_fails_once() {
        let store = StoreFixture::new().with_doctors(2).store;
        store.fail_next(StoreOp::List);
        assert!(store.list().await.is_err());
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_records_alone() {
        let store = StoreFixture::new().with_doctors(1).store;
        store.fail_next(StoreOp::Delete);
        assert!(store.delete(&DoctorId::new("1")).await.is_err());
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = InMemoryStore::new();
        let err = store
            .update(&DoctorId::new("9"), &DoctorFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MedrepError::NotFound(_)));
    }
}
