use chrono::Utc;

use super::common::date;
use crate::workflows::promotion::domain::{
    AcademicTitle, Activity, ActivityCategory, ActivityId, CategoryRule, Criteria, CriteriaId,
    UserId,
};
use crate::workflows::promotion::scoring::{
    score_table_csv, select_criteria, Eligibility, ScoringEngine, Shortfall,
};

fn activity(category: ActivityCategory, author_count: u8, lead_author: bool) -> Activity {
    Activity {
        id: ActivityId::from("act-000001"),
        owner: UserId::from("usr-000001"),
        category,
        title: "Spectral methods".to_string(),
        venue: None,
        published_on: date(2024, 2, 1),
        author_count,
        lead_author,
        evidence_url: None,
        created_at: Utc::now(),
    }
}

fn criteria(
    id: &str,
    department: Option<&str>,
    minimum_total: f32,
    rules: Vec<CategoryRule>,
) -> Criteria {
    Criteria {
        id: CriteriaId::from(id),
        academic_title: AcademicTitle::Professor,
        department: department.map(str::to_string),
        minimum_total,
        rules,
        updated_by: UserId::from("usr-000001"),
        updated_at: Utc::now(),
    }
}

#[test]
fn author_share_shrinks_with_coauthors() {
    let engine = ScoringEngine::default();
    let article =
        |authors| engine.points_for(&activity(ActivityCategory::IndexedArticle, authors, false));

    assert_eq!(article(1), 30.0);
    assert_eq!(article(2), 24.0);
    assert_eq!(article(3), 18.0);
    assert_eq!(article(4), 15.0);
    assert_eq!(article(6), 5.0);
}

#[test]
fn lead_authors_keep_half_the_points() {
    let engine = ScoringEngine::default();
    let crowded = activity(ActivityCategory::Patent, 10, true);
    assert_eq!(engine.points_for(&crowded), 15.0);

    let pair = activity(ActivityCategory::Patent, 2, true);
    assert_eq!(engine.points_for(&pair), 24.0);
}

#[test]
fn category_caps_limit_counted_points() {
    let engine = ScoringEngine::default();
    let activities = vec![
        activity(ActivityCategory::ConferencePaper, 1, true),
        activity(ActivityCategory::ConferencePaper, 1, true),
        activity(ActivityCategory::ConferencePaper, 1, true),
        activity(ActivityCategory::Book, 1, true),
    ];
    let rules = vec![CategoryRule {
        category: ActivityCategory::ConferencePaper,
        min_points: None,
        max_points: Some(10.0),
        min_count: None,
    }];
    let sheet = engine.score(&activities, Some(&criteria("crt-1", None, 50.0, rules)));

    let line = sheet
        .line(ActivityCategory::ConferencePaper)
        .expect("conference line");
    assert_eq!(line.count, 3);
    assert_eq!(line.raw_points, 15.0);
    assert_eq!(line.counted_points, 10.0);
    assert_eq!(sheet.total_points, 50.0);
    assert_eq!(sheet.eligibility, Eligibility::Eligible);
    assert!(sheet.summary().starts_with("eligible with 50.00 points"));
}

#[test]
fn shortfalls_name_each_unmet_requirement() {
    let engine = ScoringEngine::default();
    let activities = vec![activity(ActivityCategory::IndexedArticle, 3, false)];
    let rules = vec![
        CategoryRule {
            category: ActivityCategory::IndexedArticle,
            min_points: Some(60.0),
            max_points: None,
            min_count: Some(2),
        },
        CategoryRule {
            category: ActivityCategory::ThesisSupervision,
            min_points: None,
            max_points: None,
            min_count: Some(1),
        },
    ];
    let sheet = engine.score(&activities, Some(&criteria("crt-1", None, 100.0, rules)));

    assert_eq!(sheet.eligibility, Eligibility::Ineligible);
    assert_eq!(
        sheet.shortfalls,
        vec![
            Shortfall::CategoryPoints {
                category: ActivityCategory::IndexedArticle,
                required: 60.0,
                actual: 18.0,
            },
            Shortfall::CategoryCount {
                category: ActivityCategory::IndexedArticle,
                required: 2,
                actual: 1,
            },
            Shortfall::CategoryCount {
                category: ActivityCategory::ThesisSupervision,
                required: 1,
                actual: 0,
            },
            Shortfall::Total {
                required: 100.0,
                actual: 18.0,
            },
        ]
    );
    let thesis = sheet
        .line(ActivityCategory::ThesisSupervision)
        .expect("rule categories are listed even without activities");
    assert!(!thesis.satisfied);
}

#[test]
fn sheets_without_criteria_are_unchecked() {
    let engine = ScoringEngine::default();
    let sheet = engine.score(&[activity(ActivityCategory::Award, 1, false)], None);

    assert_eq!(sheet.eligibility, Eligibility::Unchecked);
    assert_eq!(sheet.required_total, None);
    assert_eq!(sheet.total_points, 10.0);
    assert!(sheet.shortfalls.is_empty());
}

#[test]
fn department_criteria_win_over_title_defaults() {
    let catalog = vec![
        criteria("crt-general", None, 100.0, Vec::new()),
        criteria("crt-physics", Some("Physics"), 120.0, Vec::new()),
    ];

    let chosen = select_criteria(&catalog, AcademicTitle::Professor, "physics").expect("match");
    assert_eq!(chosen.id.as_str(), "crt-physics");

    let fallback = select_criteria(&catalog, AcademicTitle::Professor, "History").expect("default");
    assert_eq!(fallback.id.as_str(), "crt-general");

    assert!(select_criteria(&catalog, AcademicTitle::AssistantProfessor, "Physics").is_none());
}

#[test]
fn score_table_lists_categories_and_total() {
    let engine = ScoringEngine::default();
    let rules = vec![CategoryRule {
        category: ActivityCategory::Book,
        min_points: Some(40.0),
        max_points: None,
        min_count: None,
    }];
    let sheet = engine.score(
        &[activity(ActivityCategory::Book, 2, false)],
        Some(&criteria("crt-1", None, 30.0, rules)),
    );

    let csv = score_table_csv(&sheet).expect("renders");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Category,Activities,Raw Points,Counted Points,Minimum,Maximum,Minimum Count,Status"
    );
    assert_eq!(lines[1], "Book,1,32.0,32.0,40.0,,,short");
    assert_eq!(lines[2], "Total,,,32.0,30.0,,,ineligible");
}
