//! Job postings and scoring criteria.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use super::ServiceState;
use crate::access::Principal;
use crate::workflows::promotion::domain::{
    Criteria, CriteriaDraft, CriteriaId, JobPosting, PostingDraft, PostingId,
};
use crate::workflows::promotion::service::ServiceError;

#[derive(Debug, Default, Deserialize)]
pub(super) struct PostingFilter {
    #[serde(default)]
    open: bool,
}

pub(super) async fn list_postings(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Query(filter): Query<PostingFilter>,
) -> Result<Json<Vec<JobPosting>>, ServiceError> {
    Ok(Json(service.list_postings(&principal, filter.open)?))
}

pub(super) async fn get_posting(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<JobPosting>, ServiceError> {
    Ok(Json(service.get_posting(&principal, &PostingId(id))?))
}

pub(super) async fn create_posting(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Json(draft): Json<PostingDraft>,
) -> Result<(StatusCode, Json<JobPosting>), ServiceError> {
    let posting = service.create_posting(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(posting)))
}

pub(super) async fn update_posting(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(draft): Json<PostingDraft>,
) -> Result<Json<JobPosting>, ServiceError> {
    Ok(Json(service.update_posting(&principal, &PostingId(id), draft)?))
}

pub(super) async fn delete_posting(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    service.delete_posting(&principal, &PostingId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn list_criteria(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Criteria>>, ServiceError> {
    Ok(Json(service.list_criteria(&principal)?))
}

pub(super) async fn get_criteria(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Criteria>, ServiceError> {
    Ok(Json(service.get_criteria(&principal, &CriteriaId(id))?))
}

pub(super) async fn create_criteria(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Json(draft): Json<CriteriaDraft>,
) -> Result<(StatusCode, Json<Criteria>), ServiceError> {
    let criteria = service.create_criteria(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(criteria)))
}

pub(super) async fn update_criteria(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(draft): Json<CriteriaDraft>,
) -> Result<Json<Criteria>, ServiceError> {
    Ok(Json(service.update_criteria(&principal, &CriteriaId(id), draft)?))
}

pub(super) async fn delete_criteria(
    State(service): State<ServiceState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    service.delete_criteria(&principal, &CriteriaId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
