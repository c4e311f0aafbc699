//! Jury assignment, reports and the final decision.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::ServiceState;
use crate::access::Principal;
use crate::workflows::promotion::domain::{
    Application, ApplicationId, AssignmentId, AssignmentRequest, JuryAssignment, JuryReport,
    ReportDraft,
};
use crate::workflows::promotion::service::ServiceError;

pub(super) async fn assign(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<AssignmentRequest>,
) -> Result<(StatusCode, Json<JuryAssignment>), ServiceError> {
    let assignment = service.assign_jury(&principal, request)?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub(super) async fn unassign(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<JuryAssignment>, ServiceError> {
    Ok(Json(service.unassign_jury(&principal, &AssignmentId(id))?))
}

pub(super) async fn list_assignments(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<JuryAssignment>>, ServiceError> {
    Ok(Json(service.list_assignments(&principal)?))
}

pub(super) async fn submit_report(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Json(draft): Json<ReportDraft>,
) -> Result<(StatusCode, Json<JuryReport>), ServiceError> {
    let report = service.submit_report(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub(super) async fn list_reports(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Vec<JuryReport>>, ServiceError> {
    Ok(Json(service.list_reports(&principal, &ApplicationId(id))?))
}

pub(super) async fn finalize(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Application>, ServiceError> {
    Ok(Json(service.finalize(&principal, &ApplicationId(id))?))
}
