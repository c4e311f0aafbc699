use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::gate::Principal;
use super::role::Role;
use crate::workflows::promotion::domain::UserId;

#[derive(Debug, Clone)]
struct Session {
    principal: Principal,
    expires_at: DateTime<Utc>,
}

/// Bearer token handed back on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Opaque bearer tokens mapped to principals, with a fixed lifetime.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // Entries are plain values; a panic mid-insert cannot leave one half-written.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn issue(&self, principal: Principal, now: DateTime<Utc>) -> IssuedToken {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = now + self.ttl;
        let issued = IssuedToken {
            token: token.clone(),
            user_id: principal.user_id.clone(),
            role: principal.role,
            expires_at,
        };
        let mut sessions = self.sessions();
        // Sweep sessions whose tokens were never presented again.
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            token,
            Session {
                principal,
                expires_at,
            },
        );
        issued
    }

    /// Returns the principal for a live token. Expired tokens are dropped.
    pub fn resolve(&self, token: &str, now: DateTime<Utc>) -> Option<Principal> {
        let mut sessions = self.sessions();
        let expired = match sessions.get(token) {
            Some(session) if session.expires_at > now => return Some(session.principal.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(token);
        }
        None
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions().remove(token).is_some()
    }

    /// Drops every session of a user, e.g. after a role change or deletion.
    pub fn revoke_user(&self, user_id: &UserId) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, session| &session.principal.user_id != user_id);
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn principal(id: &str) -> Principal {
        Principal::new(UserId::from(id), Role::Jury)
    }

    #[test]
    fn issued_tokens_resolve_until_expiry() {
        let store = SessionStore::new(Duration::minutes(30));
        let issued = store.issue(principal("usr-000001"), start());

        assert_eq!(issued.expires_at, start() + Duration::minutes(30));
        assert_eq!(
            store.resolve(&issued.token, start() + Duration::minutes(29)),
            Some(principal("usr-000001"))
        );
        assert_eq!(
            store.resolve(&issued.token, start() + Duration::minutes(30)),
            None
        );
        // Evicted on the expired lookup.
        assert_eq!(store.resolve(&issued.token, start()), None);
    }

    #[test]
    fn issuing_sweeps_expired_sessions() {
        let store = SessionStore::new(Duration::minutes(30));
        let abandoned = store.issue(principal("usr-000001"), start());
        store.issue(principal("usr-000002"), start() + Duration::minutes(10));
        assert_eq!(store.sessions().len(), 2);

        let fresh = store.issue(principal("usr-000003"), start() + Duration::minutes(35));
        assert_eq!(store.sessions().len(), 2);
        assert!(!store.revoke(&abandoned.token));
        assert!(store.revoke(&fresh.token));
    }

    #[test]
    fn unknown_tokens_do_not_resolve() {
        let store = SessionStore::new(Duration::minutes(30));
        assert_eq!(store.resolve("not-a-token", start()), None);
    }

    #[test]
    fn revoke_user_drops_all_sessions_for_that_user() {
        let store = SessionStore::new(Duration::hours(1));
        let first = store.issue(principal("usr-000001"), start());
        let second = store.issue(principal("usr-000001"), start());
        let other = store.issue(principal("usr-000002"), start());

        assert_eq!(store.revoke_user(&UserId::from("usr-000001")), 2);
        assert!(store.resolve(&first.token, start()).is_none());
        assert!(store.resolve(&second.token, start()).is_none());
        assert!(store.resolve(&other.token, start()).is_some());
        assert!(store.revoke(&other.token));
        assert!(!store.revoke(&other.token));
    }
}
