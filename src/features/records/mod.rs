//! Student records: the backend call interface, its HTTP implementation and
//! the controller that keeps the locally held list in step with the backend.

pub mod client;
pub mod controller;
pub mod types;

pub use client::HttpStudentBackend;
pub use controller::StudentController;
pub use types::{DraftField, Student, StudentDraft, StudentId, StudentPayload, parse_marks};

use crate::app_lib::AppError;
use async_trait::async_trait;

/// Remote student service, as seen through an identity-scoped transport.
#[async_trait(?Send)]
pub trait StudentBackend {
    async fn get_students(&self) -> Result<Vec<Student>, AppError>;

    async fn add_student(
        &self,
        name: &str,
        email: &str,
        marks: Option<i64>,
    ) -> Result<(), AppError>;

    async fn update_student(
        &self,
        id: &StudentId,
        name: &str,
        email: &str,
        marks: Option<i64>,
    ) -> Result<(), AppError>;

    async fn delete_student(&self, id: &StudentId) -> Result<(), AppError>;
}
