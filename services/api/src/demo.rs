use crate::infra::{default_criteria, LoggingNotifier};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use promotion_desk::access::{CredentialHasher, Principal, Role};
use promotion_desk::config::BootstrapAdmin;
use promotion_desk::error::AppError;
use promotion_desk::workflows::promotion::{
    AcademicTitle, ActivityCategory, ActivityDraft, ApplicationRequest, AssignmentRequest,
    FixedClock, LoginRequest, NewUserRequest, PostingDraft, PromotionService, PromotionSettings,
    RegistrationDraft, ReportDraft, ServiceError, Stores, Verdict,
};
use std::sync::Arc;

const DEMO_PASSWORD: &str = "demo-password-2026";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the walkthrough runs on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

struct Cast {
    admin: Principal,
    manager: Principal,
    jurors: Vec<Principal>,
    applicant: Principal,
}

fn login(service: &PromotionService, email: &str) -> Result<Principal, AppError> {
    let issued = service.login(LoginRequest {
        email: email.to_string(),
        password: DEMO_PASSWORD.to_string(),
    })?;
    Ok(Principal::new(issued.user_id, issued.role))
}

fn account(name: &str, email: &str) -> RegistrationDraft {
    RegistrationDraft {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        password: Some(DEMO_PASSWORD.to_string()),
    }
}

fn seed_accounts(service: &PromotionService) -> Result<Cast, AppError> {
    service.ensure_admin(&BootstrapAdmin {
        name: "Faculty Office".to_string(),
        email: "office@faculty.example.edu".to_string(),
        password: DEMO_PASSWORD.to_string(),
    })?;
    let admin = login(service, "office@faculty.example.edu")?;

    service.create_user(
        &admin,
        NewUserRequest {
            account: account("Dean Okafor", "dean@faculty.example.edu"),
            role: Role::Manager,
        },
    )?;
    let manager = login(service, "dean@faculty.example.edu")?;

    let mut jurors = Vec::new();
    for (name, email) in [
        ("Prof. Lindqvist", "lindqvist@faculty.example.edu"),
        ("Prof. Haddad", "haddad@faculty.example.edu"),
        ("Prof. Moreau", "moreau@faculty.example.edu"),
    ] {
        service.create_user(
            &admin,
            NewUserRequest {
                account: account(name, email),
                role: Role::Jury,
            },
        )?;
        jurors.push(login(service, email)?);
    }

    let candidate = service.register(account("Dr. Tanaka", "tanaka@faculty.example.edu"))?;
    println!(
        "- Seeded admin, manager and {} jury members; {} registered as {}",
        jurors.len(),
        candidate.name,
        candidate.role
    );
    let applicant = login(service, "tanaka@faculty.example.edu")?;

    Ok(Cast {
        admin,
        manager,
        jurors,
        applicant,
    })
}

fn activity(
    category: ActivityCategory,
    title: &str,
    published_on: NaiveDate,
    author_count: u8,
) -> ActivityDraft {
    ActivityDraft {
        category: Some(category),
        title: Some(title.to_string()),
        published_on: Some(published_on),
        author_count: Some(author_count),
        lead_author: Some(true),
        ..ActivityDraft::default()
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let notifier = Arc::new(LoggingNotifier::default());
    // Throwaway accounts, so hashing stays cheap.
    let hasher = CredentialHasher::with_cost(4096, 1).map_err(ServiceError::from)?;
    let service = PromotionService::new(
        Stores::in_memory(),
        notifier.clone(),
        PromotionSettings::default(),
    )
    .with_clock(Arc::new(FixedClock::at_noon(today)))
    .with_hasher(hasher);

    println!("Academic promotion walkthrough ({today})");
    let cast = seed_accounts(&service)?;

    let title = AcademicTitle::AssistantProfessor;
    let posting = service.create_posting(
        &cast.admin,
        PostingDraft {
            heading: Some("Assistant Professor in Computational Physics".to_string()),
            academic_title: Some(title),
            faculty: Some("Faculty of Science".to_string()),
            department: Some("Physics".to_string()),
            opens_on: Some(today - Duration::days(7)),
            closes_on: Some(today + Duration::days(21)),
            ..PostingDraft::default()
        },
    )?;
    println!(
        "- Posting {} open {} to {}",
        posting.id, posting.opens_on, posting.closes_on
    );

    let criteria = service.create_criteria(&cast.manager, default_criteria(title))?;
    println!(
        "- Criteria {} require {} points over {} category rules",
        criteria.id,
        criteria.minimum_total,
        criteria.rules.len()
    );

    let mut activity_ids = Vec::new();
    for draft in [
        activity(
            ActivityCategory::IndexedArticle,
            "Lattice models of heat flow",
            today - Duration::days(400),
            1,
        ),
        activity(
            ActivityCategory::IndexedArticle,
            "Monte Carlo sampling for spin glasses",
            today - Duration::days(200),
            2,
        ),
        activity(
            ActivityCategory::BookChapter,
            "Numerical methods primer",
            today - Duration::days(90),
            1,
        ),
        activity(
            ActivityCategory::Teaching,
            "Statistical mechanics lectures",
            today - Duration::days(30),
            1,
        ),
    ] {
        activity_ids.push(service.create_activity(&cast.applicant, draft)?.id);
    }

    let application = service.apply(
        &cast.applicant,
        ApplicationRequest {
            posting_id: posting.id.clone(),
            activity_ids,
            statement: Some("Applying for the open assistant professorship.".to_string()),
        },
    )?;
    println!(
        "- Application {} submitted: {}",
        application.id,
        application.score_sheet.summary()
    );
    println!("  Score table:");
    for row in service
        .score_table(&cast.applicant, &application.id)?
        .lines()
    {
        println!("    {row}");
    }

    for juror in &cast.jurors {
        service.assign_jury(
            &cast.manager,
            AssignmentRequest {
                application_id: application.id.clone(),
                jury_member: juror.user_id.clone(),
            },
        )?;
    }

    let verdicts = [Verdict::Positive, Verdict::Positive, Verdict::Negative];
    for (juror, verdict) in cast.jurors.iter().zip(verdicts) {
        let report = service.submit_report(
            juror,
            ReportDraft {
                application_id: Some(application.id.clone()),
                verdict: Some(verdict),
                comments: Some(
                    "Publication record reviewed against the posted criteria.".to_string(),
                ),
            },
        )?;
        println!("  Report {} from {}: {:?}", report.id, juror.user_id, report.verdict);
    }

    let decided = service.finalize(&cast.manager, &application.id)?;
    println!(
        "- Application {} finalized as {}",
        decided.id,
        decided.status.label()
    );

    println!("Notifications:");
    for notification in notifier.sent() {
        println!(
            "  - {} -> {}",
            notification.template, notification.recipient
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkthrough_runs_end_to_end() {
        let args = DemoArgs {
            today: NaiveDate::from_ymd_opt(2026, 4, 10),
        };
        run_demo(args).expect("demo completes");
    }
}
