use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::ScoreSheet;
use crate::access::Role;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

record_id!(
    /// Identifier for registered accounts.
    UserId
);
record_id!(PostingId);
record_id!(CriteriaId);
record_id!(ActivityId);
record_id!(
    /// Identifier wrapper for submitted applications.
    ApplicationId
);
record_id!(AssignmentId);
record_id!(ReportId);

/// Academic rank a job posting recruits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcademicTitle {
    AssistantProfessor,
    AssociateProfessor,
    Professor,
}

impl AcademicTitle {
    pub const ALL: [AcademicTitle; 3] = [
        AcademicTitle::AssistantProfessor,
        AcademicTitle::AssociateProfessor,
        AcademicTitle::Professor,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            AcademicTitle::AssistantProfessor => "assistant_professor",
            AcademicTitle::AssociateProfessor => "associate_professor",
            AcademicTitle::Professor => "professor",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AcademicTitle::AssistantProfessor => "Assistant Professor",
            AcademicTitle::AssociateProfessor => "Associate Professor",
            AcademicTitle::Professor => "Professor",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|title| title.code() == normalized)
    }
}

/// Kinds of scholarly output a candidate can claim points for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    IndexedArticle,
    NationalArticle,
    Book,
    BookChapter,
    ConferencePaper,
    Project,
    Patent,
    Citation,
    ThesisSupervision,
    Teaching,
    Award,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 11] = [
        ActivityCategory::IndexedArticle,
        ActivityCategory::NationalArticle,
        ActivityCategory::Book,
        ActivityCategory::BookChapter,
        ActivityCategory::ConferencePaper,
        ActivityCategory::Project,
        ActivityCategory::Patent,
        ActivityCategory::Citation,
        ActivityCategory::ThesisSupervision,
        ActivityCategory::Teaching,
        ActivityCategory::Award,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            ActivityCategory::IndexedArticle => "indexed_article",
            ActivityCategory::NationalArticle => "national_article",
            ActivityCategory::Book => "book",
            ActivityCategory::BookChapter => "book_chapter",
            ActivityCategory::ConferencePaper => "conference_paper",
            ActivityCategory::Project => "project",
            ActivityCategory::Patent => "patent",
            ActivityCategory::Citation => "citation",
            ActivityCategory::ThesisSupervision => "thesis_supervision",
            ActivityCategory::Teaching => "teaching",
            ActivityCategory::Award => "award",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ActivityCategory::IndexedArticle => "Indexed journal article",
            ActivityCategory::NationalArticle => "National journal article",
            ActivityCategory::Book => "Book",
            ActivityCategory::BookChapter => "Book chapter",
            ActivityCategory::ConferencePaper => "Conference paper",
            ActivityCategory::Project => "Research project",
            ActivityCategory::Patent => "Patent",
            ActivityCategory::Citation => "Citation",
            ActivityCategory::ThesisSupervision => "Thesis supervision",
            ActivityCategory::Teaching => "Teaching",
            ActivityCategory::Award => "Award",
        }
    }

    /// Accepts codes as well as loosely typed variants such as `Book Chapter`.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|category| category.code() == normalized)
    }
}

/// Account stored by the user directory. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Public projection of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Open position announced by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: PostingId,
    pub heading: String,
    pub academic_title: AcademicTitle,
    pub faculty: Option<String>,
    pub department: String,
    pub description: Option<String>,
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    pub positions: u8,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl JobPosting {
    /// The application window is inclusive on both ends.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.opens_on <= date && date <= self.closes_on
    }
}

/// Threshold for a single activity category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: ActivityCategory,
    #[serde(default)]
    pub min_points: Option<f32>,
    #[serde(default)]
    pub max_points: Option<f32>,
    #[serde(default)]
    pub min_count: Option<u32>,
}

/// Minimum requirements a candidate must meet for an academic title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub id: CriteriaId,
    pub academic_title: AcademicTitle,
    pub department: Option<String>,
    pub minimum_total: f32,
    pub rules: Vec<CategoryRule>,
    pub updated_by: UserId,
    pub updated_at: DateTime<Utc>,
}

impl Criteria {
    pub fn rule_for(&self, category: ActivityCategory) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.category == category)
    }

    pub fn applies_to_department(&self, department: &str) -> bool {
        self.department
            .as_deref()
            .map(|own| own.trim().eq_ignore_ascii_case(department.trim()))
            .unwrap_or(false)
    }
}

/// Scholarly activity recorded by a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub owner: UserId,
    pub category: ActivityCategory,
    pub title: String,
    pub venue: Option<String>,
    pub published_on: NaiveDate,
    pub author_count: u8,
    pub lead_author: bool,
    pub evidence_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// High level status tracked throughout the promotion review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Submitted | ApplicationStatus::UnderReview
        )
    }
}

/// Candidacy for a posting. Activities are copied at submission so later edits
/// do not change what the jury reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    pub id: ApplicationId,
    pub posting_id: PostingId,
    pub applicant: UserId,
    pub activities: Vec<Activity>,
    pub statement: Option<String>,
    pub status: ApplicationStatus,
    pub score_sheet: ScoreSheet,
    pub submitted_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            posting_id: self.posting_id.clone(),
            applicant: self.applicant.clone(),
            status: self.status.label(),
            total_points: self.score_sheet.total_points,
            eligibility: self.score_sheet.eligibility.label(),
            submitted_at: self.submitted_at,
        }
    }
}

/// Compact listing entry for an application.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub posting_id: PostingId,
    pub applicant: UserId,
    pub status: &'static str,
    pub total_points: f32,
    pub eligibility: &'static str,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuryAssignment {
    pub id: AssignmentId,
    pub application_id: ApplicationId,
    pub jury_member: UserId,
    pub assigned_by: UserId,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Positive,
    Negative,
}

/// Evaluation report filed by a jury member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuryReport {
    pub id: ReportId,
    pub application_id: ApplicationId,
    pub jury_member: UserId,
    pub verdict: Verdict,
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}

/// Sign-up payload. Every field is optional so validation can name what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account created by an administrator, with an explicit role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRequest {
    #[serde(flatten)]
    pub account: RegistrationDraft,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityDraft {
    pub category: Option<ActivityCategory>,
    pub title: Option<String>,
    pub venue: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub author_count: Option<u8>,
    pub lead_author: Option<bool>,
    pub evidence_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingDraft {
    pub heading: Option<String>,
    pub academic_title: Option<AcademicTitle>,
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub opens_on: Option<NaiveDate>,
    pub closes_on: Option<NaiveDate>,
    pub positions: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaDraft {
    pub academic_title: Option<AcademicTitle>,
    pub department: Option<String>,
    pub minimum_total: Option<f32>,
    pub rules: Vec<CategoryRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDraft {
    pub application_id: Option<ApplicationId>,
    pub verdict: Option<Verdict>,
    pub comments: Option<String>,
}

/// Request to file an application against a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub posting_id: PostingId,
    pub activity_ids: Vec<ActivityId>,
    #[serde(default)]
    pub statement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub application_id: ApplicationId,
    pub jury_member: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_round_trip_through_loose_input() {
        assert_eq!(
            ActivityCategory::from_code("Book Chapter"),
            Some(ActivityCategory::BookChapter)
        );
        assert_eq!(
            ActivityCategory::from_code("thesis-supervision"),
            Some(ActivityCategory::ThesisSupervision)
        );
        assert_eq!(ActivityCategory::from_code("poem"), None);
    }

    #[test]
    fn posting_window_is_inclusive() {
        let posting = JobPosting {
            id: PostingId::from("pst-000001"),
            heading: "Chair in Materials".to_string(),
            academic_title: AcademicTitle::Professor,
            faculty: None,
            department: "Materials".to_string(),
            description: None,
            opens_on: NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid"),
            closes_on: NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid"),
            positions: 1,
            created_by: UserId::from("usr-000001"),
            created_at: Utc::now(),
        };

        assert!(posting.is_open_on(posting.opens_on));
        assert!(posting.is_open_on(posting.closes_on));
        assert!(!posting.is_open_on(NaiveDate::from_ymd_opt(2026, 3, 16).expect("valid")));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ApplicationId::from("app-000042");
        assert_eq!(
            serde_json::to_value(&id).expect("serializes"),
            serde_json::json!("app-000042")
        );
    }
}
