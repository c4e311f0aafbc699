//! Applicant-facing endpoints: activities and applications.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};

use super::ServiceState;
use crate::access::Principal;
use crate::workflows::promotion::domain::{
    Activity, ActivityDraft, ActivityId, Application, ApplicationId, ApplicationRequest,
    ApplicationStatusView,
};
use crate::workflows::promotion::service::ServiceError;

pub(super) async fn list_activities(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Activity>>, ServiceError> {
    Ok(Json(service.list_activities(&principal)?))
}

pub(super) async fn create_activity(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Json(draft): Json<ActivityDraft>,
) -> Result<(StatusCode, Json<Activity>), ServiceError> {
    let activity = service.create_activity(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub(super) async fn update_activity(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(draft): Json<ActivityDraft>,
) -> Result<Json<Activity>, ServiceError> {
    Ok(Json(service.update_activity(&principal, &ActivityId(id), draft)?))
}

pub(super) async fn delete_activity(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    service.delete_activity(&principal, &ActivityId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn apply(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<ApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), ServiceError> {
    let application = service.apply(&principal, request)?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// Listing returns compact status views; the full record is on the detail route.
pub(super) async fn list_applications(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<ApplicationStatusView>>, ServiceError> {
    let views = service
        .list_applications(&principal)?
        .iter()
        .map(Application::status_view)
        .collect();
    Ok(Json(views))
}

pub(super) async fn get_application(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Application>, ServiceError> {
    Ok(Json(service.get_application(&principal, &ApplicationId(id))?))
}

pub(super) async fn withdraw(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Application>, ServiceError> {
    Ok(Json(service.withdraw(&principal, &ApplicationId(id))?))
}

pub(super) async fn score_table(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let table = service.score_table(&principal, &ApplicationId(id))?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], table))
}
