use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::ServiceState;
use crate::access::Principal;
use crate::workflows::promotion::domain::{NewUserRequest, RoleChange, UserId, UserView};
use crate::workflows::promotion::service::ServiceError;

pub(super) async fn list(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<UserView>>, ServiceError> {
    Ok(Json(service.list_users(&principal)?))
}

pub(super) async fn create(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<UserView>), ServiceError> {
    let user = service.create_user(&principal, request)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub(super) async fn get(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ServiceError> {
    Ok(Json(service.get_user(&principal, &UserId(id))?))
}

pub(super) async fn change_role(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(change): Json<RoleChange>,
) -> Result<Json<UserView>, ServiceError> {
    Ok(Json(service.change_role(&principal, &UserId(id), change.role)?))
}

pub(super) async fn delete(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ServiceError> {
    Ok(Json(service.delete_user(&principal, &UserId(id))?))
}
