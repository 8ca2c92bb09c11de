#![cfg(not(target_arch = "wasm32"))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{fast_settings, spawn_dev};
use reqwest::StatusCode;
use secrecy::SecretString;
use student_marks::{
    app_lib::{AppError, api::build_client},
    dev::DevSettings,
    features::{
        records::{HttpStudentBackend, StudentBackend, StudentId},
        session::{AuthClient, HttpAuthClient, LogPrompt, LoginOptions, MemoryIdentityStore},
    },
};
use url::Url;

async fn signed_in(base_url: &str) -> anyhow::Result<(HttpAuthClient, HttpStudentBackend)> {
    let http = build_client()?;
    let auth = HttpAuthClient::new(
        http.clone(),
        "student-marks",
        Box::new(MemoryIdentityStore::new()),
        Box::new(LogPrompt),
    )?;
    let options = LoginOptions {
        identity_provider: Some(Url::parse(base_url)?),
    };

    let identity = auth.login(&options).await?;
    let backend = HttpStudentBackend::new(http, base_url, identity.delegation().clone());
    Ok((auth, backend))
}

fn auto_approve() -> DevSettings {
    DevSettings {
        auto_approve: true,
        ..fast_settings()
    }
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let base_url = spawn_dev(DevSettings::default()).await?;

    let response = reqwest::get(format!("{base_url}/health")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    Ok(())
}

#[tokio::test]
async fn test_backend_requires_a_delegation() -> anyhow::Result<()> {
    let base_url = spawn_dev(auto_approve()).await?;

    let anonymous = HttpStudentBackend::new(
        build_client()?,
        base_url.as_str(),
        SecretString::from("not-a-delegation"),
    );
    let err = anonymous.get_students().await.unwrap_err();
    assert!(matches!(err, AppError::Http { status: 401, .. }));

    Ok(())
}

#[tokio::test]
async fn test_missing_ids_and_null_marks_are_rejected() -> anyhow::Result<()> {
    let base_url = spawn_dev(auto_approve()).await?;
    let (_auth, backend) = signed_in(&base_url).await?;

    let err = backend
        .update_student(&StudentId::from(1), "Alice", "a@x.com", Some(90))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = backend.delete_student(&StudentId::from(1)).await.unwrap_err();
    assert!(err.is_not_found());

    let err = backend
        .add_student("Alice", "a@x.com", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Http { status: 422, .. }));
    assert!(backend.get_students().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_ids_are_assigned_by_the_backend() -> anyhow::Result<()> {
    let base_url = spawn_dev(auto_approve()).await?;
    let (_auth, backend) = signed_in(&base_url).await?;

    backend.add_student("Alice", "a@x.com", Some(90)).await?;
    backend.add_student("Bob", "b@x.com", Some(85)).await?;
    backend.delete_student(&StudentId::from(1)).await?;
    backend.add_student("Carol", "c@x.com", Some(70)).await?;

    let ids: Vec<String> = backend
        .get_students()
        .await?
        .into_iter()
        .map(|student| student.id.to_string())
        .collect();
    assert_eq!(ids, vec!["2", "3"]);

    Ok(())
}

#[tokio::test]
async fn test_logout_revokes_the_delegation() -> anyhow::Result<()> {
    let base_url = spawn_dev(auto_approve()).await?;
    let (auth, backend) = signed_in(&base_url).await?;

    assert!(backend.get_students().await?.is_empty());
    assert!(auth.is_authenticated().await?);

    auth.logout().await?;
    assert!(!auth.is_authenticated().await?);

    let err = backend.get_students().await.unwrap_err();
    assert!(matches!(err, AppError::Http { status: 401, .. }));

    Ok(())
}

#[tokio::test]
async fn test_unknown_authorization_request() -> anyhow::Result<()> {
    let base_url = spawn_dev(DevSettings::default()).await?;
    let http = build_client()?;

    let response = http
        .post(format!("{base_url}/v1/authorize/nope/token"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = http.get(format!("{base_url}/authorize/nope")).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
