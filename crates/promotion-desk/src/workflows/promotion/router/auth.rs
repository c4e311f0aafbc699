use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};

use super::ServiceState;
use crate::access::{bearer_token, IssuedToken, Principal};
use crate::workflows::promotion::domain::{LoginRequest, RegistrationDraft, UserView};
use crate::workflows::promotion::service::ServiceError;

pub(super) async fn register(
    State(service): State<ServiceState>,
    Json(draft): Json<RegistrationDraft>,
) -> Result<(StatusCode, Json<UserView>), ServiceError> {
    let user = service.register(draft)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub(super) async fn login(
    State(service): State<ServiceState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<IssuedToken>, ServiceError> {
    Ok(Json(service.login(request)?))
}

pub(super) async fn logout(State(service): State<ServiceState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        service.logout(token);
    }
    StatusCode::NO_CONTENT
}

pub(super) async fn me(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<UserView>, ServiceError> {
    Ok(Json(service.me(&principal)?))
}
