use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::gate::{Principal, RoleGate};
use super::role::Role;

/// Header accepted as an alternative to `Authorization: Bearer`.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Turns a bearer token into the caller behind it.
pub trait PrincipalResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Principal>;
}

#[derive(Clone)]
pub struct GateState {
    resolver: Arc<dyn PrincipalResolver>,
    gate: RoleGate,
}

impl GateState {
    pub fn new(resolver: Arc<dyn PrincipalResolver>, roles: &[Role]) -> Self {
        Self {
            resolver,
            gate: RoleGate::new(roles),
        }
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let from_authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    from_authorization
        .or_else(|| {
            headers
                .get(TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
        })
        .filter(|token| !token.is_empty())
}

/// Resolves the caller and checks it against the route group's roles.
/// On success the [`Principal`] is available to handlers as an extension.
pub async fn authorize(
    State(state): State<GateState>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = bearer_token(request.headers()).and_then(|token| state.resolver.resolve(token));

    if let Err(err) = state.gate.check(principal.as_ref()) {
        tracing::warn!(
            path = %request.uri().path(),
            reason = %err,
            "request denied"
        );
        return err.into_response();
    }

    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_bearer_then_fallback_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("fallback"));
        assert_eq!(bearer_token(&headers), Some("fallback"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer primary"));
        assert_eq!(bearer_token(&headers), Some("primary"));
    }

    #[test]
    fn ignores_other_authorization_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
