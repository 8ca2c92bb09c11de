//! Student backend side of the harness. Every route requires a live delegation.

use super::bearer;
use crate::{
    dev::state::{DevState, Store},
    features::records::{Student, StudentId, StudentPayload},
};
use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tokio::sync::MutexGuard;
use tracing::{debug, info, instrument};

/// Locks the store once the request's bearer delegation checks out.
async fn authorized<'a>(
    state: &'a DevState,
    headers: &HeaderMap,
) -> Result<MutexGuard<'a, Store>, Response> {
    let unauthorized = || {
        (StatusCode::UNAUTHORIZED, "Missing or expired delegation".to_string()).into_response()
    };

    let token = bearer(headers).ok_or_else(unauthorized)?;
    let mut store = state.store.lock().await;
    let grant = store.live_grant(token).ok_or_else(unauthorized)?;
    debug!(principal = %grant.principal, "Authorized backend call");
    Ok(store)
}

fn not_found(id: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("student {id} not found")).into_response()
}

fn unprocessable() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        "marks must be an integer".to_string(),
    )
        .into_response()
}

#[instrument(skip_all)]
pub async fn list_students(state: Extension<DevState>, headers: HeaderMap) -> Response {
    match authorized(&state, &headers).await {
        Ok(store) => Json(store.students.clone()).into_response(),
        Err(response) => response,
    }
}

#[instrument(skip_all)]
pub async fn create_student(
    state: Extension<DevState>,
    headers: HeaderMap,
    payload: Option<Json<StudentPayload>>,
) -> Response {
    let mut store = match authorized(&state, &headers).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    let Some(Json(payload)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };
    let Some(marks) = payload.marks else {
        return unprocessable();
    };

    let student = Student {
        id: StudentId::from(store.allocate_id()),
        name: payload.name,
        email: payload.email,
        marks,
    };
    info!(id = %student.id, "Student created");
    store.students.push(student.clone());

    (StatusCode::CREATED, Json(student)).into_response()
}

#[instrument(skip_all, fields(id = %id))]
pub async fn update_student(
    state: Extension<DevState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Option<Json<StudentPayload>>,
) -> Response {
    let mut store = match authorized(&state, &headers).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    let Some(Json(payload)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let id = StudentId::from(id);
    let Some(student) = store.students.iter_mut().find(|student| student.id == id) else {
        return not_found(id.as_str());
    };
    let Some(marks) = payload.marks else {
        return unprocessable();
    };

    student.name = payload.name;
    student.email = payload.email;
    student.marks = marks;
    info!("Student updated");

    StatusCode::NO_CONTENT.into_response()
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete_student(
    state: Extension<DevState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut store = match authorized(&state, &headers).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    let id = StudentId::from(id);
    let before = store.students.len();
    store.students.retain(|student| student.id != id);
    if store.students.len() == before {
        return not_found(id.as_str());
    }
    info!("Student deleted");

    StatusCode::NO_CONTENT.into_response()
}
