//! Shared UI components for the records page.

pub(crate) mod student_form;
pub(crate) mod student_list;
pub(crate) mod ui;

pub(crate) use student_form::StudentForm;
pub(crate) use student_list::StudentList;
pub(crate) use ui::{Alert, AlertKind, Button, ButtonKind, Spinner};
