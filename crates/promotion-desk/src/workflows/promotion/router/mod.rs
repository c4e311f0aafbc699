mod auth;
mod candidacy;
mod catalog;
mod jury;
mod users;

use std::sync::Arc;

use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;

use super::service::{PromotionService, ServiceError};
use crate::access::{authorize, GateState, PrincipalResolver, Role};

type ServiceState = Arc<PromotionService>;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "promotion request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Router exposing the promotion workflow under `/api`.
///
/// Each route group sits behind a role gate; the service repeats the role check
/// so callers outside HTTP get the same guarantees.
pub fn promotion_router(service: Arc<PromotionService>) -> Router {
    let resolver: Arc<dyn PrincipalResolver> = service.clone();
    let gate = |roles: &[Role]| {
        middleware::from_fn_with_state(GateState::new(resolver.clone(), roles), authorize)
    };

    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let authenticated = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/job-postings", get(catalog::list_postings))
        .route("/api/job-postings/:id", get(catalog::get_posting))
        .route("/api/criteria", get(catalog::list_criteria))
        .route("/api/criteria/:id", get(catalog::get_criteria))
        .route("/api/applications", get(candidacy::list_applications))
        .route("/api/applications/:id", get(candidacy::get_application))
        .route(
            "/api/applications/:id/score-table",
            get(candidacy::score_table),
        )
        .route_layer(gate(&[]));

    let admin = Router::new()
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", get(users::get).delete(users::delete))
        .route("/api/users/:id/role", put(users::change_role))
        .route("/api/job-postings", post(catalog::create_posting))
        .route(
            "/api/job-postings/:id",
            put(catalog::update_posting).delete(catalog::delete_posting),
        )
        .route_layer(gate(&[Role::Admin]));

    let staff = Router::new()
        .route("/api/criteria", post(catalog::create_criteria))
        .route(
            "/api/criteria/:id",
            put(catalog::update_criteria).delete(catalog::delete_criteria),
        )
        .route("/api/applications/:id/reports", get(jury::list_reports))
        .route_layer(gate(&[Role::Admin, Role::Manager]));

    let applicant = Router::new()
        .route(
            "/api/activities",
            get(candidacy::list_activities).post(candidacy::create_activity),
        )
        .route(
            "/api/activities/:id",
            put(candidacy::update_activity).delete(candidacy::delete_activity),
        )
        .route("/api/applications", post(candidacy::apply))
        .route("/api/applications/:id/withdraw", post(candidacy::withdraw))
        .route_layer(gate(&[Role::Applicant]));

    let manager = Router::new()
        .route("/api/applications/:id/finalize", post(jury::finalize))
        .route("/api/jury/assign", post(jury::assign))
        .route("/api/jury/assignments/:id", delete(jury::unassign))
        .route_layer(gate(&[Role::Manager]));

    let reviewers = Router::new()
        .route("/api/jury/assignments", get(jury::list_assignments))
        .route_layer(gate(&[Role::Jury, Role::Manager, Role::Admin]));

    let jurors = Router::new()
        .route("/api/jury/reports", post(jury::submit_report))
        .route_layer(gate(&[Role::Jury]));

    Router::<ServiceState>::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .merge(staff)
        .merge(applicant)
        .merge(manager)
        .merge(reviewers)
        .merge(jurors)
        .with_state(service)
}
