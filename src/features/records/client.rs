//! HTTP client for the student backend. Endpoint paths live here; the backend
//! is assumed to enforce authorization on the bearer delegation.

use super::{
    StudentBackend,
    types::{Student, StudentId, StudentPayload},
};
use crate::app_lib::{
    AppError,
    api::{build_url_with_base, delete_empty, get_json, post_json_empty, put_json_empty},
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;

pub struct HttpStudentBackend {
    http: Client,
    base_url: String,
    delegation: SecretString,
}

impl HttpStudentBackend {
    pub fn new(http: Client, base_url: impl Into<String>, delegation: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            delegation,
        }
    }

    fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }
}

fn payload(name: &str, email: &str, marks: Option<i64>) -> StudentPayload {
    StudentPayload {
        name: name.to_string(),
        email: email.to_string(),
        marks,
    }
}

#[async_trait(?Send)]
impl StudentBackend for HttpStudentBackend {
    async fn get_students(&self) -> Result<Vec<Student>, AppError> {
        get_json(&self.http, &self.url("/v1/students"), Some(&self.delegation)).await
    }

    async fn add_student(
        &self,
        name: &str,
        email: &str,
        marks: Option<i64>,
    ) -> Result<(), AppError> {
        let body = payload(name, email, marks);
        post_json_empty(&self.http, &self.url("/v1/students"), &body, Some(&self.delegation)).await
    }

    async fn update_student(
        &self,
        id: &StudentId,
        name: &str,
        email: &str,
        marks: Option<i64>,
    ) -> Result<(), AppError> {
        let trimmed = id.as_str().trim();
        if trimmed.is_empty() {
            return Err(AppError::Config("Student id is required.".to_string()));
        }

        let body = payload(name, email, marks);
        let url = self.url(&format!("/v1/students/{trimmed}"));
        put_json_empty(&self.http, &url, &body, Some(&self.delegation)).await
    }

    async fn delete_student(&self, id: &StudentId) -> Result<(), AppError> {
        let trimmed = id.as_str().trim();
        if trimmed.is_empty() {
            return Err(AppError::Config("Student id is required.".to_string()));
        }

        let url = self.url(&format!("/v1/students/{trimmed}"));
        delete_empty(&self.http, &url, Some(&self.delegation)).await
    }
}
