//! # Record Form
//!
//! The form keeps an **edit buffer**: every editable field as the text the user
//! typed, separate from the list view's authoritative copy. Nothing in the
//! buffer reaches the list until the store accepts it and the list re-fetches.
//!
//! ## Create vs Update
//!
//! A form opened on an existing record remembers that record's id and submits
//! an update keyed by it. A blank form submits a create. The id picks the
//! operation and the URL; it is never part of the body.
//!
//! ## Call Days
//!
//! The weekday picker edits the `callDay` text directly, as a comma-joined
//! list. Toggling a day appends it when absent and removes it when present,
//! keeping the other days in place, so toggling twice is a no-op.
//!
//! ## Validation
//!
//! Before any network call the buffer is checked the way typed form inputs
//! would check it: name and code required, email shaped like an address,
//! `YYYY-MM-DD` dates, `HH:MM` times, real weekday names. Everything else is
//! free text. The typed checks only apply to fields the user changed; values
//! loaded from the store are sent back as they came. A rejected submit leaves
//! the buffer untouched.
//!
//! ## Outcome
//!
//! - success: message, buffer reset to blanks, caller returns to the list
//! - failure: create/update specific message, buffer kept for a retry

use super::{CmdMessage, CmdResult};
use crate::error::{FieldError, MedrepError, Result};
use crate::model::{Doctor, DoctorFields, DoctorId, Field, Weekday, WeekdaySet};
use crate::store::RecordStore;
use chrono::{NaiveDate, NaiveTime};

pub const SAVED: &str = "Doctor details saved!";
pub const UPDATED: &str = "Doctor details updated!";
pub const SAVE_FAILED: &str = "Failed to save doctor details!";
pub const UPDATE_FAILED: &str = "Failed to update doctor details!";

const FIELD_COUNT: usize = Field::ALL.len();

fn slot(field: Field) -> usize {
    field as usize
}

/// Every editable field as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuffer {
    values: [String; FIELD_COUNT],
    edited: [bool; FIELD_COUNT],
}

impl FormBuffer {
    pub fn from_fields(fields: &DoctorFields) -> Self {
        let mut buffer = FormBuffer::default();
        for field in Field::ALL {
            buffer.values[slot(field)] = fields.get(field);
        }
        buffer
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[slot(field)]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[slot(field)] = value.into();
        self.edited[slot(field)] = true;
    }

    /// Whether `field` was changed since the buffer was filled.
    pub fn is_edited(&self, field: Field) -> bool {
        self.edited[slot(field)]
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    fn call_day_tokens(&self) -> Vec<&str> {
        self.get(Field::CallDay)
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn toggle_day(&mut self, day: Weekday) {
        let mut days = self.call_day_tokens();
        let before = days.len();
        days.retain(|t| !t.eq_ignore_ascii_case(day.name()));
        if days.len() == before {
            days.push(day.name());
        }

        let joined = days.join(",");
        self.set(Field::CallDay, joined);
    }

    /// Appends `day` unless it is already listed.
    pub fn add_day(&mut self, day: Weekday) {
        let mut days = self.call_day_tokens();
        if days.iter().any(|t| t.eq_ignore_ascii_case(day.name())) {
            return;
        }
        days.push(day.name());

        let joined = days.join(",");
        self.set(Field::CallDay, joined);
    }

    /// The value of a field the user filled in. Stored values pass through
    /// untouched, however they look.
    fn typed_value(&self, field: Field) -> Option<&str> {
        let value = self.get(field);
        (self.is_edited(field) && !value.is_empty()).then_some(value)
    }

    /// Every rule the buffer breaks, in field order.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for field in [Field::Name, Field::Code] {
            if self.get(field).trim().is_empty() {
                errors.push(FieldError::new(field, "is required"));
            }
        }

        if self.typed_value(Field::Email).is_some_and(|email| !looks_like_email(email)) {
            errors.push(FieldError::new(Field::Email, "is not a valid email address"));
        }

        if self.typed_value(Field::DateOfBirth)
            .is_some_and(|dob| NaiveDate::parse_from_str(dob, "%Y-%m-%d").is_err())
        {
            errors.push(FieldError::new(Field::DateOfBirth, "must be a YYYY-MM-DD date"));
        }

        if self.typed_value(Field::CallTime).is_some_and(|time| !is_time(time)) {
            errors.push(FieldError::new(Field::CallTime, "must be an HH:MM time"));
        }

        if let Some(Err(e)) = self.typed_value(Field::CallDay).map(str::parse::<WeekdaySet>) {
            errors.push(FieldError::new(Field::CallDay, e));
        }

        errors
    }

    /// The request body, built straight from the buffer.
    pub fn to_fields(&self) -> DoctorFields {
        let text = |field| self.get(field).to_string();
        DoctorFields {
            name: text(Field::Name),
            code: text(Field::Code),
            mobile: text(Field::Mobile),
            registration_no: text(Field::RegistrationNo),
            email: text(Field::Email),
            tax_id: text(Field::TaxId),
            address: text(Field::Address),
            date_of_birth: text(Field::DateOfBirth),
            call_days: WeekdaySet::parse_lenient(self.get(Field::CallDay)),
            call_time: text(Field::CallTime),
            notes: text(Field::Notes),
            chemist_details: text(Field::ChemistDetails),
            medical_registration: text(Field::MedicalRegistration),
            visiting_rx: text(Field::VisitingRx),
            status: text(Field::Status),
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn is_time(s: &str) -> bool {
    NaiveTime::parse_from_str(s, "%H:%M").is_ok()
        || NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
}

/// What a submit did.
#[derive(Debug)]
pub enum Submission {
    /// The store accepted the record. The form is blank again.
    Saved(CmdResult),
    /// The store call failed. The buffer is unchanged.
    Failed(CmdResult),
}

impl Submission {
    pub fn is_saved(&self) -> bool {
        matches!(self, Submission::Saved(_))
    }

    pub fn into_result(self) -> CmdResult {
        match self {
            Submission::Saved(r) | Submission::Failed(r) => r,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    editing: Option<DoctorId>,
    buffer: FormBuffer,
    day_picker_open: bool,
}

impl RecordForm {
    /// A form for `existing`, or a blank one for a new record.
    pub fn new(existing: Option<&Doctor>) -> Self {
        match existing {
            Some(doc) => Self {
                editing: Some(doc.id.clone()),
                buffer: FormBuffer::from_fields(&doc.fields),
                day_picker_open: false,
            },
            None => Self::default(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing(&self) -> Option<&DoctorId> {
        self.editing.as_ref()
    }

    pub fn buffer(&self) -> &FormBuffer {
        &self.buffer
    }

    pub fn get(&self, field: Field) -> &str {
        self.buffer.get(field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.buffer.set(field, value);
    }

    pub fn toggle_day(&mut self, day: Weekday) {
        self.buffer.toggle_day(day);
    }

    pub fn add_day(&mut self, day: Weekday) {
        self.buffer.add_day(day);
    }

    pub fn day_picker_open(&self) -> bool {
        self.day_picker_open
    }

    pub fn toggle_day_picker(&mut self) {
        self.day_picker_open = !self.day_picker_open;
    }

    pub fn close_day_picker(&mut self) {
        self.day_picker_open = false;
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.buffer.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(MedrepError::Invalid(errors))
        }
    }

    /// Validate, then create or update. Store failures come back as
    /// [`Submission::Failed`], not as `Err`.
    pub async fn submit<S: RecordStore>(&mut self, store: &S) -> Result<Submission> {
        self.validate()?;
        let payload = self.buffer.to_fields();

        let outcome = match &self.editing {
            Some(id) => store.update(id, &payload).await,
            None => store.create(&payload).await,
        };

        let (ok_msg, failed_msg) = if self.is_edit() {
            (UPDATED, UPDATE_FAILED)
        } else {
            (SAVED, SAVE_FAILED)
        };

        match outcome {
            Ok(stored) => {
                tracing::debug!(edit = self.is_edit(), "doctor form submitted");
                self.buffer = FormBuffer::default();
                self.day_picker_open = false;
                Ok(Submission::Saved(
                    CmdResult::default()
                        .with_affected(stored)
                        .with_message(CmdMessage::success(ok_msg)),
                ))
            }
            Err(e) => {
                tracing::warn!(edit = self.is_edit(), error = %e, "doctor form submit failed");
                Ok(Submission::Failed(
                    CmdResult::default().with_message(CmdMessage::error(failed_msg)),
                ))
            }
        }
    }
}
