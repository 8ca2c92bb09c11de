//! Identity provider side of the harness: authorization requests, the approval
//! page, delegation polling and revocation.

use super::bearer;
use crate::{
    dev::state::{DevState, random_token},
    features::session::types::{AuthorizeRequest, AuthorizeResponse, DelegationResponse},
};
use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode, header::HOST},
    response::{Html, IntoResponse, Json, Response},
};
use tracing::{debug, info, instrument, warn};

const DEFAULT_HOST: &str = "localhost:4943";

#[instrument(skip_all)]
pub async fn authorize(
    state: Extension<DevState>,
    headers: HeaderMap,
    payload: Option<Json<AuthorizeRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let request_id = random_token(16);
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_HOST);

    let pending = state.pending(&request.application);
    let approved = pending.grant.is_some();
    {
        let mut store = state.store.lock().await;
        store.prune_requests(state.settings.request_ttl_ms);
        store.requests.insert(request_id.clone(), pending);
    }

    info!(%request_id, application = %request.application, approved, "Authorization requested");

    Json(AuthorizeResponse {
        verification_uri: format!("http://{host}/authorize/{request_id}"),
        request_id,
        interval_ms: state.settings.poll_interval_ms,
        expires_in_ms: state.settings.request_ttl_ms,
    })
    .into_response()
}

/// Approval page the user opens from the verification URI.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn approve(state: Extension<DevState>, Path(request_id): Path<String>) -> Response {
    let mut store = state.store.lock().await;
    let Some(pending) = store.requests.get_mut(&request_id) else {
        return (
            StatusCode::NOT_FOUND,
            Html("<p>Unknown or expired sign-in request.</p>".to_string()),
        )
            .into_response();
    };

    if pending.grant.is_none() {
        pending.grant = Some(state.grant());
    }
    info!(application = %pending.application, "Authorization approved");

    Html("<p>Signed in. You can close this window.</p>".to_string()).into_response()
}

/// 202 while the request waits for approval, then the delegation exactly once.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn token(state: Extension<DevState>, Path(request_id): Path<String>) -> Response {
    let mut store = state.store.lock().await;

    let Some(pending) = store.requests.get(&request_id) else {
        return (StatusCode::NOT_FOUND, "Unknown authorization request".to_string())
            .into_response();
    };

    if pending.is_expired(state.settings.request_ttl_ms) {
        store.requests.remove(&request_id);
        warn!("Authorization request expired");
        return (StatusCode::GONE, "Authorization request expired".to_string()).into_response();
    }

    let Some(grant) = pending.grant.clone() else {
        debug!("Authorization pending");
        return StatusCode::ACCEPTED.into_response();
    };

    store.requests.remove(&request_id);
    store.delegations.insert(grant.delegation.clone(), grant.clone());
    info!(principal = %grant.principal, "Delegation issued");

    Json(DelegationResponse {
        principal: grant.principal,
        delegation: grant.delegation,
        expires_at: grant.expires_at,
    })
    .into_response()
}

#[instrument(skip_all)]
pub async fn logout(state: Extension<DevState>, headers: HeaderMap) -> Response {
    let Some(token) = bearer(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    match state.store.lock().await.delegations.remove(token) {
        Some(grant) => {
            info!(principal = %grant.principal, "Delegation revoked");
            StatusCode::NO_CONTENT.into_response()
        }
        None => (StatusCode::UNAUTHORIZED, "Unknown delegation".to_string()).into_response(),
    }
}
