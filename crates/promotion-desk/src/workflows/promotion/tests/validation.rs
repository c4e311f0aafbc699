use super::common::{activity_draft, date, posting_draft, today};
use crate::workflows::promotion::domain::{
    ActivityCategory, ActivityDraft, ApplicationId, CategoryRule, CriteriaDraft,
    RegistrationDraft, ReportDraft, Verdict,
};
use crate::workflows::promotion::validation::{
    validate_activity, validate_criteria, validate_posting, validate_registration,
    validate_report, ValidationError,
};

fn registration(email: &str, password: &str) -> RegistrationDraft {
    RegistrationDraft {
        name: Some("  Ada Lovelace ".to_string()),
        email: Some(email.to_string()),
        password: Some(password.to_string()),
    }
}

#[test]
fn validate_activity_rejects_missing_category() {
    let draft = ActivityDraft {
        category: None,
        ..activity_draft(ActivityCategory::Book, 1, true)
    };
    assert_eq!(
        validate_activity(draft, today()),
        Err(ValidationError::MissingField("category"))
    );
}

#[test]
fn activity_defaults_and_bounds() {
    let draft = ActivityDraft {
        category: Some(ActivityCategory::Teaching),
        title: Some("Solid state physics, spring term".to_string()),
        published_on: Some(today()),
        ..ActivityDraft::default()
    };
    let fields = validate_activity(draft, today()).expect("valid");
    assert_eq!(fields.author_count, 1);
    assert!(!fields.lead_author);
    assert_eq!(fields.evidence_url, None);

    let future = ActivityDraft {
        published_on: Some(date(2026, 4, 11)),
        ..activity_draft(ActivityCategory::Book, 1, true)
    };
    assert!(matches!(
        validate_activity(future, today()),
        Err(ValidationError::InvalidField { field: "published_on", .. })
    ));

    let no_authors = activity_draft(ActivityCategory::Book, 0, true);
    assert!(matches!(
        validate_activity(no_authors, today()),
        Err(ValidationError::InvalidField { field: "author_count", .. })
    ));

    let ftp = ActivityDraft {
        evidence_url: Some("ftp://archive.uni.edu/paper.pdf".to_string()),
        ..activity_draft(ActivityCategory::Book, 1, true)
    };
    assert!(matches!(
        validate_activity(ftp, today()),
        Err(ValidationError::InvalidField { field: "evidence_url", .. })
    ));
}

#[test]
fn registration_normalizes_and_checks_passwords() {
    let fields = validate_registration(registration("Ada@Uni.EDU", "analytical-engine"))
        .expect("valid");
    assert_eq!(fields.name, "Ada Lovelace");
    assert_eq!(fields.email, "ada@uni.edu");

    assert!(matches!(
        validate_registration(registration("ada@uni.edu", "short")),
        Err(ValidationError::InvalidField { field: "password", .. })
    ));
    assert!(matches!(
        validate_registration(registration("ada.uni.edu", "analytical-engine")),
        Err(ValidationError::InvalidField { field: "email", .. })
    ));
    assert_eq!(
        validate_registration(RegistrationDraft::default()),
        Err(ValidationError::MissingField("name"))
    );
}

#[test]
fn posting_window_must_be_ordered() {
    let reversed = crate::workflows::promotion::domain::PostingDraft {
        opens_on: Some(date(2026, 5, 1)),
        closes_on: Some(date(2026, 4, 1)),
        ..posting_draft()
    };
    assert!(matches!(
        validate_posting(reversed),
        Err(ValidationError::InvalidField { field: "closes_on", .. })
    ));

    let fields = validate_posting(crate::workflows::promotion::domain::PostingDraft {
        positions: None,
        ..posting_draft()
    })
    .expect("valid");
    assert_eq!(fields.positions, 1);
}

#[test]
fn criteria_rules_are_checked() {
    let rule = |min: Option<f32>, max: Option<f32>| CategoryRule {
        category: ActivityCategory::Project,
        min_points: min,
        max_points: max,
        min_count: None,
    };
    let draft = |rules: Vec<CategoryRule>| CriteriaDraft {
        academic_title: Some(crate::workflows::promotion::domain::AcademicTitle::Professor),
        department: Some("  ".to_string()),
        minimum_total: Some(150.0),
        rules,
    };

    let fields = validate_criteria(draft(vec![rule(Some(20.0), Some(60.0))])).expect("valid");
    assert_eq!(fields.department, None);

    assert!(matches!(
        validate_criteria(draft(vec![rule(Some(80.0), Some(60.0))])),
        Err(ValidationError::InvalidField { field: "rules", .. })
    ));
    assert!(matches!(
        validate_criteria(draft(vec![rule(Some(-1.0), None)])),
        Err(ValidationError::InvalidField { field: "rules.min_points", .. })
    ));
    assert!(matches!(
        validate_criteria(draft(vec![rule(None, None), rule(None, Some(10.0))])),
        Err(ValidationError::InvalidField { field: "rules", .. })
    ));
}

#[test]
fn reports_need_substantive_comments() {
    let draft = |comments: &str| ReportDraft {
        application_id: Some(ApplicationId::from("app-000001")),
        verdict: Some(Verdict::Negative),
        comments: Some(comments.to_string()),
    };

    assert!(validate_report(draft("Insufficient indexed output for the rank.")).is_ok());
    assert!(matches!(
        validate_report(draft("Too thin.")),
        Err(ValidationError::InvalidField { field: "comments", .. })
    ));
    assert_eq!(
        validate_report(ReportDraft::default()),
        Err(ValidationError::MissingField("application_id"))
    );
}
