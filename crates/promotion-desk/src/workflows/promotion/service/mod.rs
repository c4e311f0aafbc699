mod activities;
mod applications;
mod criteria;
mod jury;
mod postings;
mod users;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::http::StatusCode;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::clock::{Clock, SystemClock};
use super::domain::{
    Activity, ActivityId, Application, ApplicationId, Criteria, CriteriaId, JobPosting, PostingId,
    User, UserId,
};
use super::repository::{Notification, Notifier, RepositoryError, Stores};
use super::scoring::{ScoreTableError, ScoringEngine};
use super::validation::ValidationError;
use crate::access::{
    AccessError, CredentialHasher, PasswordError, Principal, PrincipalResolver, SessionStore,
};
use crate::config::WorkflowConfig;

/// Limits applied by the promotion workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionSettings {
    pub session_ttl: Duration,
    pub max_jury_per_application: usize,
    pub min_jury_reports: usize,
}

impl Default for PromotionSettings {
    fn default() -> Self {
        Self::from(&WorkflowConfig::default())
    }
}

impl From<&WorkflowConfig> for PromotionSettings {
    fn from(config: &WorkflowConfig) -> Self {
        Self {
            session_ttl: Duration::minutes(config.session_ttl_minutes),
            max_jury_per_application: config.max_jury_per_application,
            min_jury_reports: config.min_jury_reports,
        }
    }
}

/// Entry point for every promotion operation: accounts, postings, criteria,
/// activities, applications and jury work.
pub struct PromotionService {
    stores: Stores,
    sessions: SessionStore,
    scoring: ScoringEngine,
    hasher: CredentialHasher,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    settings: PromotionSettings,
    sequence: AtomicU64,
    /// Held across every check-then-write on uniqueness and limit rules.
    writes: Mutex<()>,
}

impl PromotionService {
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>, settings: PromotionSettings) -> Self {
        Self {
            stores,
            sessions: SessionStore::new(settings.session_ttl),
            scoring: ScoringEngine::default(),
            hasher: CredentialHasher::default(),
            notifier,
            clock: Arc::new(SystemClock),
            settings,
            sequence: AtomicU64::new(1),
            writes: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    fn write_lock(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable.
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{id:06}")
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn user_record(&self, id: &UserId) -> Result<User, ServiceError> {
        self.stores
            .users
            .fetch(id.as_str())?
            .ok_or_else(|| ServiceError::not_found("user", id.as_str()))
    }

    fn posting_record(&self, id: &PostingId) -> Result<JobPosting, ServiceError> {
        self.stores
            .postings
            .fetch(id.as_str())?
            .ok_or_else(|| ServiceError::not_found("job posting", id.as_str()))
    }

    fn criteria_record(&self, id: &CriteriaId) -> Result<Criteria, ServiceError> {
        self.stores
            .criteria
            .fetch(id.as_str())?
            .ok_or_else(|| ServiceError::not_found("criteria", id.as_str()))
    }

    fn activity_record(&self, id: &ActivityId) -> Result<Activity, ServiceError> {
        self.stores
            .activities
            .fetch(id.as_str())?
            .ok_or_else(|| ServiceError::not_found("activity", id.as_str()))
    }

    fn application_record(&self, id: &ApplicationId) -> Result<Application, ServiceError> {
        self.stores
            .applications
            .fetch(id.as_str())?
            .ok_or_else(|| ServiceError::not_found("application", id.as_str()))
    }

    /// Delivery failures are logged; the change being announced stays committed.
    fn notify(&self, template: &str, recipient: &UserId, details: BTreeMap<String, String>) {
        let notification = Notification {
            template: template.to_string(),
            recipient: recipient.clone(),
            details,
        };
        if let Err(err) = self.notifier.publish(notification) {
            tracing::error!(
                error = %err,
                template,
                recipient = %recipient,
                "notification not delivered"
            );
        }
    }
}

impl PrincipalResolver for PromotionService {
    fn resolve(&self, token: &str) -> Option<Principal> {
        self.sessions.resolve(token, self.now())
    }
}

/// Error raised by the promotion service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    ScoreTable(#[from] ScoreTableError),
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    /// A business rule rejected an otherwise well-formed request.
    #[error("{0}")]
    Rule(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("invalid email or password")]
    InvalidCredentials,
}

impl ServiceError {
    fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::Rule(_) => StatusCode::BAD_REQUEST,
            ServiceError::Access(err) => err.status(),
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound { .. } | ServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Conflict(_) | ServiceError::Repository(RepositoryError::Conflict) => {
                StatusCode::CONFLICT
            }
            ServiceError::Repository(RepositoryError::Unavailable(_))
            | ServiceError::Password(_)
            | ServiceError::ScoreTable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
