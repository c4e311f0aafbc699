use crate::infra::default_criteria;
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use promotion_desk::error::AppError;
use promotion_desk::workflows::promotion::scoring::write_score_table;
use promotion_desk::workflows::promotion::validation::{validate_activity, validate_criteria};
use promotion_desk::workflows::promotion::{
    AcademicTitle, Activity, ActivityCsvImporter, ActivityDraft, ActivityId, Criteria, CriteriaId,
    ScoreSheet, ScoringEngine, ServiceError, UserId,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Activity spreadsheet (CSV) to score
    #[arg(long)]
    pub(crate) activities: PathBuf,
    /// Academic title the candidate is applying for
    #[arg(long, value_parser = crate::infra::parse_title)]
    pub(crate) title: AcademicTitle,
    /// Reference date for publication checks (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        activities,
        title,
        as_of,
    } = args;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let drafts = ActivityCsvImporter::from_path(&activities)?;
    let sheet = score_drafts(drafts, title, as_of)?;

    let stdout = std::io::stdout();
    write_score_table(&sheet, stdout.lock()).map_err(ServiceError::from)?;
    println!();
    println!("{} ({})", title.label(), sheet.summary());
    Ok(())
}

fn score_drafts(
    drafts: Vec<ActivityDraft>,
    title: AcademicTitle,
    as_of: NaiveDate,
) -> Result<ScoreSheet, ServiceError> {
    let owner = UserId::from("cli");
    let recorded_at = Utc::now();

    let mut activities = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let fields = validate_activity(draft, as_of)?;
        activities.push(Activity {
            id: ActivityId(format!("row-{}", index + 2)),
            owner: owner.clone(),
            category: fields.category,
            title: fields.title,
            venue: fields.venue,
            published_on: fields.published_on,
            author_count: fields.author_count,
            lead_author: fields.lead_author,
            evidence_url: fields.evidence_url,
            created_at: recorded_at,
        });
    }

    let fields = validate_criteria(default_criteria(title))?;
    let criteria = Criteria {
        id: CriteriaId::from("default"),
        academic_title: fields.academic_title,
        department: fields.department,
        minimum_total: fields.minimum_total,
        rules: fields.rules,
        updated_by: owner,
        updated_at: recorded_at,
    };

    Ok(ScoringEngine::default().score(&activities, Some(&criteria)))
}
