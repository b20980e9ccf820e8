//! Which screen is showing. The record being edited lives inside
//! [`ViewMode::Edit`] and nowhere else, so leaving edit mode drops it.

use crate::error::{MedrepError, Result};
use crate::model::Doctor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Add,
    Edit(Doctor),
}

impl ViewMode {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Add => "add",
            ViewMode::Edit(_) => "edit",
        }
    }

    pub fn is_form(&self) -> bool {
        !matches!(self, ViewMode::List)
    }
}

#[derive(Debug, Default)]
pub struct Coordinator {
    mode: ViewMode,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn selected(&self) -> Option<&Doctor> {
        match &self.mode {
            ViewMode::Edit(doc) => Some(doc),
            _ => None,
        }
    }

    /// List -> Add.
    pub fn add_new(&mut self) -> Result<()> {
        self.enter(ViewMode::Add)
    }

    /// List -> Edit(doctor).
    pub fn edit(&mut self, doctor: Doctor) -> Result<()> {
        self.enter(ViewMode::Edit(doctor))
    }

    /// The form saved. Add/Edit -> List.
    pub fn saved(&mut self) -> Result<()> {
        self.leave()
    }

    /// The form was abandoned. Add/Edit -> List.
    pub fn cancelled(&mut self) -> Result<()> {
        self.leave()
    }

    /// Always lands on List.
    pub fn back_to_list(&mut self) {
        self.mode = ViewMode::List;
    }

    fn enter(&mut self, next: ViewMode) -> Result<()> {
        if self.mode.is_form() {
            return Err(MedrepError::IllegalTransition {
                from: self.mode.name(),
                to: next.name(),
            });
        }
        tracing::debug!(to = next.name(), "view mode change");
        self.mode = next;
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.mode.is_form() {
            return Err(MedrepError::IllegalTransition {
                from: "list",
                to: "list",
            });
        }
        tracing::debug!(from = self.mode.name(), "view mode change");
        self.mode = ViewMode::List;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DoctorFields, DoctorId};

    fn doctor() -> Doctor {
        Doctor::new(
            DoctorId::new("42"),
            DoctorFields {
                name: "Asha Rao".into(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_starts_in_list() {
        let coord = Coordinator::new();
        assert_eq!(coord.mode(), &ViewMode::List);
        assert!(coord.selected().is_none());
    }

    #[test]
    fn test_add_has_no_selection() {
        let mut coord = Coordinator::new();
        coord.add_new().unwrap();
        assert_eq!(coord.mode(), &ViewMode::Add);
        assert!(coord.selected().is_none());
    }

    #[test]
    fn test_edit_carries_record() {
        let mut coord = Coordinator::new();
        coord.edit(doctor()).unwrap();
        assert_eq!(coord.selected(), Some(&doctor()));
        assert_eq!(coord.mode().name(), "edit");
    }

    #[test]
    fn test_save_and_cancel_return_to_list() {
        let mut coord = Coordinator::new();
        coord.edit(doctor()).unwrap();
        coord.saved().unwrap();
        assert_eq!(coord.mode(), &ViewMode::List);
        assert!(coord.selected().is_none());

        coord.add_new().unwrap();
        coord.cancelled().unwrap();
        assert_eq!(coord.mode(), &ViewMode::List);
    }

    #[test]
    fn test_form_to_form_is_illegal() {
        let mut coord = Coordinator::new();
        coord.add_new().unwrap();

        let err = coord.edit(doctor()).unwrap_err();
        assert!(matches!(
            err,
            MedrepError::IllegalTransition { from: "add", to: "edit" }
        ));
        assert!(coord.add_new().is_err());
        assert_eq!(coord.mode(), &ViewMode::Add);

        coord.back_to_list();
        coord.edit(doctor()).unwrap();
        assert!(coord.add_new().is_err());
        assert!(coord.edit(doctor()).is_err());
        assert_eq!(coord.selected(), Some(&doctor()));
    }

    #[test]
    fn test_save_from_list_is_illegal() {
        let mut coord = Coordinator::new();
        assert!(coord.saved().is_err());
        assert!(coord.cancelled().is_err());
        coord.back_to_list();
        assert_eq!(coord.mode(), &ViewMode::List);
    }
}
