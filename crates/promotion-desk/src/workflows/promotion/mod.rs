//! Academic promotion workflow: job postings, criteria, scholarly activities,
//! applications and jury review.

pub mod clock;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    AcademicTitle, Activity, ActivityCategory, ActivityDraft, ActivityId, Application,
    ApplicationId, ApplicationRequest, ApplicationStatus, ApplicationStatusView, AssignmentId,
    AssignmentRequest, CategoryRule, Criteria, CriteriaDraft, CriteriaId, JobPosting,
    JuryAssignment, JuryReport, LoginRequest, NewUserRequest, PostingDraft, PostingId,
    RegistrationDraft, ReportDraft, ReportId, RoleChange, User, UserId, UserView, Verdict,
};
pub use import::{ActivityCsvImporter, ActivityImportError};
pub use repository::{
    InMemoryRepository, Notification, Notifier, NotifyError, Record, Repository,
    RepositoryError, Stores,
};
pub use router::promotion_router;
pub use scoring::{Eligibility, ScoreLine, ScoreSheet, ScoringConfig, ScoringEngine, Shortfall};
pub use service::{PromotionService, PromotionSettings, ServiceError};
pub use validation::ValidationError;
