use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::role::Role;
use crate::workflows::promotion::domain::UserId;

/// Authenticated caller attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("role '{role}' may not perform this action (allowed: {allowed})")]
    Forbidden { role: Role, allowed: String },
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccessError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Allow-list of roles for a route group or service operation.
/// An empty list admits any authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGate {
    allowed: Vec<Role>,
}

impl RoleGate {
    pub fn new(allowed: &[Role]) -> Self {
        Self {
            allowed: allowed.to_vec(),
        }
    }

    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&role)
    }

    pub fn check(&self, principal: Option<&Principal>) -> Result<(), AccessError> {
        let principal = principal.ok_or(AccessError::Unauthenticated)?;
        if self.allows(principal.role) {
            return Ok(());
        }

        let allowed = self
            .allowed
            .iter()
            .map(Role::code)
            .collect::<Vec<_>>()
            .join(", ");
        Err(AccessError::Forbidden {
            role: principal.role,
            allowed,
        })
    }
}

/// Shorthand for service-level checks on an already authenticated caller.
pub fn require(principal: &Principal, roles: &[Role]) -> Result<(), AccessError> {
    RoleGate::new(roles).check(Some(principal))
}
