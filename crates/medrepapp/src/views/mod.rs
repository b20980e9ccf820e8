//! # View Layer
//!
//! This module holds the **client-side state** of medrep: one struct per screen
//! of a record-keeping UI, each owning its own state and exposing async handlers
//! for the user's actions.
//!
//! ## What Views Do
//!
//! - Own their state outright (collection, search, edit buffer, view mode)
//! - Call the [`RecordStore`](crate::store::RecordStore) and apply the result
//!   by full replacement
//! - Turn store failures into [`CmdMessage`]s instead of errors
//!
//! ## What Views Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, no prompts (a delete prompt is state,
//!   the UI decides how to ask)
//! - **Retry**: a failed call is reported once and left for the user
//!
//! ## Structured Returns
//!
//! Handlers return [`CmdResult`], not strings: the records to display (if
//! any) and leveled messages. The UI picks colours and layout.
//!
//! ## View Modules
//!
//! - [`coordinator`]: list / add / edit mode
//! - [`list`]: authoritative collection, search, delete prompt
//! - [`form`]: edit buffer, validation, submit

use crate::model::Doctor;
use serde::Serialize;

pub mod coordinator;
pub mod form;
pub mod list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == MessageLevel::Error
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    /// Record produced or targeted by the operation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected: Option<Doctor>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected(mut self, doctor: Option<Doctor>) -> Self {
        self.affected = doctor;
        self
    }

    pub fn extend(&mut self, other: CmdResult) {
        if other.affected.is_some() {
            self.affected = other.affected;
        }
        self.messages.extend(other.messages);
    }

    /// True when any message is an error.
    pub fn has_error(&self) -> bool {
        self.messages.iter().any(CmdMessage::is_error)
    }
}
