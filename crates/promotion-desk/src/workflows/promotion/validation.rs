//! Input checks that turn loosely typed drafts into values the services can store.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::domain::{
    AcademicTitle, ActivityCategory, ActivityDraft, ApplicationId, CategoryRule, CriteriaDraft,
    PostingDraft, RegistrationDraft, ReportDraft, Verdict,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MIN_REPORT_COMMENT_LENGTH: usize = 20;

/// Validation errors raised before anything reaches a repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFields {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityFields {
    pub category: ActivityCategory,
    pub title: String,
    pub venue: Option<String>,
    pub published_on: NaiveDate,
    pub author_count: u8,
    pub lead_author: bool,
    pub evidence_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingFields {
    pub heading: String,
    pub academic_title: AcademicTitle,
    pub faculty: Option<String>,
    pub department: String,
    pub description: Option<String>,
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    pub positions: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaFields {
    pub academic_title: AcademicTitle,
    pub department: Option<String>,
    pub minimum_total: f32,
    pub rules: Vec<CategoryRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFields {
    pub application_id: ApplicationId,
    pub verdict: Verdict,
    pub comments: String,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value.map(|text| text.trim().to_string()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn is_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !candidate.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}

pub fn validate_registration(
    draft: RegistrationDraft,
) -> Result<RegistrationFields, ValidationError> {
    let name = required_text(draft.name, "name")?;
    let email = required_text(draft.email, "email")?.to_ascii_lowercase();
    if !is_email(&email) {
        return Err(ValidationError::invalid(
            "email",
            "expected an address like name@university.edu",
        ));
    }

    let password = draft
        .password
        .ok_or(ValidationError::MissingField("password"))?;
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(ValidationError::invalid(
            "password",
            format!(
                "must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters (got {length})"
            ),
        ));
    }

    Ok(RegistrationFields {
        name,
        email,
        password,
    })
}

pub fn validate_activity(
    draft: ActivityDraft,
    today: NaiveDate,
) -> Result<ActivityFields, ValidationError> {
    let category = draft
        .category
        .ok_or(ValidationError::MissingField("category"))?;
    let title = required_text(draft.title, "title")?;
    let published_on = draft
        .published_on
        .ok_or(ValidationError::MissingField("published_on"))?;
    if published_on > today {
        return Err(ValidationError::invalid(
            "published_on",
            format!("{published_on} is in the future"),
        ));
    }

    let author_count = draft.author_count.unwrap_or(1);
    if author_count == 0 {
        return Err(ValidationError::invalid(
            "author_count",
            "at least one author is required",
        ));
    }

    let evidence_url = optional_text(draft.evidence_url);
    if let Some(url) = &evidence_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ValidationError::invalid(
                "evidence_url",
                "must be an http(s) link",
            ));
        }
    }

    Ok(ActivityFields {
        category,
        title,
        venue: optional_text(draft.venue),
        published_on,
        author_count,
        lead_author: draft.lead_author.unwrap_or(false),
        evidence_url,
    })
}

pub fn validate_posting(draft: PostingDraft) -> Result<PostingFields, ValidationError> {
    let heading = required_text(draft.heading, "heading")?;
    let academic_title = draft
        .academic_title
        .ok_or(ValidationError::MissingField("academic_title"))?;
    let department = required_text(draft.department, "department")?;
    let opens_on = draft
        .opens_on
        .ok_or(ValidationError::MissingField("opens_on"))?;
    let closes_on = draft
        .closes_on
        .ok_or(ValidationError::MissingField("closes_on"))?;
    if opens_on > closes_on {
        return Err(ValidationError::invalid(
            "closes_on",
            format!("{closes_on} is before the opening date {opens_on}"),
        ));
    }

    let positions = draft.positions.unwrap_or(1);
    if positions == 0 {
        return Err(ValidationError::invalid(
            "positions",
            "a posting must offer at least one position",
        ));
    }

    Ok(PostingFields {
        heading,
        academic_title,
        faculty: optional_text(draft.faculty),
        department,
        description: optional_text(draft.description),
        opens_on,
        closes_on,
        positions,
    })
}

fn non_negative(value: Option<f32>, field: &'static str) -> Result<(), ValidationError> {
    match value {
        Some(points) if !points.is_finite() || points < 0.0 => Err(ValidationError::invalid(
            field,
            format!("{points} must be a non-negative number"),
        )),
        _ => Ok(()),
    }
}

pub fn validate_criteria(draft: CriteriaDraft) -> Result<CriteriaFields, ValidationError> {
    let academic_title = draft
        .academic_title
        .ok_or(ValidationError::MissingField("academic_title"))?;
    let minimum_total = draft
        .minimum_total
        .ok_or(ValidationError::MissingField("minimum_total"))?;
    non_negative(Some(minimum_total), "minimum_total")?;

    let mut seen = BTreeSet::new();
    for rule in &draft.rules {
        if !seen.insert(rule.category) {
            return Err(ValidationError::invalid(
                "rules",
                format!("{} appears more than once", rule.category.code()),
            ));
        }
        non_negative(rule.min_points, "rules.min_points")?;
        non_negative(rule.max_points, "rules.max_points")?;
        if let (Some(min), Some(max)) = (rule.min_points, rule.max_points) {
            if min > max {
                return Err(ValidationError::invalid(
                    "rules",
                    format!(
                        "{} minimum {min} exceeds maximum {max}",
                        rule.category.code()
                    ),
                ));
            }
        }
    }

    Ok(CriteriaFields {
        academic_title,
        department: optional_text(draft.department),
        minimum_total,
        rules: draft.rules,
    })
}

pub fn validate_report(draft: ReportDraft) -> Result<ReportFields, ValidationError> {
    let application_id = draft
        .application_id
        .filter(|id| !id.as_str().trim().is_empty())
        .ok_or(ValidationError::MissingField("application_id"))?;
    let verdict = draft
        .verdict
        .ok_or(ValidationError::MissingField("verdict"))?;
    let comments = required_text(draft.comments, "comments")?;
    let length = comments.chars().count();
    if length < MIN_REPORT_COMMENT_LENGTH {
        return Err(ValidationError::invalid(
            "comments",
            format!("must be at least {MIN_REPORT_COMMENT_LENGTH} characters (got {length})"),
        ));
    }

    Ok(ReportFields {
        application_id,
        verdict,
        comments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_checks() {
        assert!(is_email("ada@uni.edu"));
        assert!(is_email("ada.l@cs.uni.edu"));
        assert!(!is_email("ada@uni"));
        assert!(!is_email("@uni.edu"));
        assert!(!is_email("ada@@uni.edu"));
        assert!(!is_email("ada @uni.edu"));
        assert!(!is_email("ada@.edu"));
    }
}
