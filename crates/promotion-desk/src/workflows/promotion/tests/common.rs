use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::access::{CredentialHasher, Principal, Role};
use crate::config::BootstrapAdmin;
use crate::workflows::promotion::domain::{
    AcademicTitle, ActivityCategory, ActivityDraft, Application, ApplicationId,
    ApplicationRequest, AssignmentRequest, CategoryRule, CriteriaDraft, JobPosting,
    NewUserRequest, PostingDraft, RegistrationDraft, ReportDraft, Verdict,
};
use crate::workflows::promotion::repository::{Notification, Notifier, NotifyError, Stores};
use crate::workflows::promotion::{FixedClock, PromotionService, PromotionSettings};

pub(super) const PASSWORD: &str = "correct-horse-staple";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2026, 4, 10)
}

pub(super) fn settings() -> PromotionSettings {
    PromotionSettings {
        session_ttl: chrono::Duration::minutes(60),
        max_jury_per_application: 3,
        min_jury_reports: 2,
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn templates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.template)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn publish(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) fn build_service(
    notifier: Arc<dyn Notifier>,
    settings: PromotionSettings,
) -> PromotionService {
    PromotionService::new(Stores::in_memory(), notifier, settings)
        .with_clock(Arc::new(FixedClock::at_noon(today())))
        .with_hasher(CredentialHasher::with_cost(1024, 1).expect("cheap hashing params"))
}

pub(super) struct Harness {
    pub(super) service: Arc<PromotionService>,
    pub(super) notifier: Arc<RecordingNotifier>,
    pub(super) admin: Principal,
    pub(super) manager: Principal,
    pub(super) jurors: Vec<Principal>,
    pub(super) applicant: Principal,
    pub(super) rival: Principal,
    pub(super) posting: JobPosting,
}

pub(super) fn harness() -> Harness {
    let notifier = Arc::new(RecordingNotifier::default());
    let service = build_service(notifier.clone(), settings());
    seed(service, notifier)
}

pub(super) fn seed(service: PromotionService, notifier: Arc<RecordingNotifier>) -> Harness {
    let admin = service
        .ensure_admin(&BootstrapAdmin {
            name: "Registrar".to_string(),
            email: "registrar@uni.edu".to_string(),
            password: PASSWORD.to_string(),
        })
        .expect("seed admin");
    let admin = Principal::new(admin.id, admin.role);

    let manager = account(&service, &admin, "Dean Okafor", "dean@uni.edu", Role::Manager);
    let jurors = ["jury.one@uni.edu", "jury.two@uni.edu", "jury.three@uni.edu", "jury.four@uni.edu"]
        .into_iter()
        .map(|email| account(&service, &admin, "Jury Member", email, Role::Jury))
        .collect();
    let applicant = account(&service, &admin, "Dr. Mira Lind", "mira@uni.edu", Role::Applicant);
    let rival = account(&service, &admin, "Dr. Tomas Berg", "tomas@uni.edu", Role::Applicant);
    let posting = service
        .create_posting(&admin, posting_draft())
        .expect("seed posting");

    Harness {
        service: Arc::new(service),
        notifier,
        admin,
        manager,
        jurors,
        applicant,
        rival,
        posting,
    }
}

pub(super) fn account(
    service: &PromotionService,
    admin: &Principal,
    name: &str,
    email: &str,
    role: Role,
) -> Principal {
    let view = service
        .create_user(
            admin,
            NewUserRequest {
                account: RegistrationDraft {
                    name: Some(name.to_string()),
                    email: Some(email.to_string()),
                    password: Some(PASSWORD.to_string()),
                },
                role,
            },
        )
        .expect("seed account");
    Principal::new(view.id, view.role)
}

pub(super) fn posting_draft() -> PostingDraft {
    PostingDraft {
        heading: Some("Associate Professor of Condensed Matter Physics".to_string()),
        academic_title: Some(AcademicTitle::AssociateProfessor),
        faculty: Some("Science".to_string()),
        department: Some("Physics".to_string()),
        description: None,
        opens_on: Some(date(2026, 4, 1)),
        closes_on: Some(date(2026, 4, 30)),
        positions: Some(1),
    }
}

/// Title-wide criteria: 40 points overall and at least one indexed article.
pub(super) fn criteria_draft(department: Option<&str>) -> CriteriaDraft {
    CriteriaDraft {
        academic_title: Some(AcademicTitle::AssociateProfessor),
        department: department.map(str::to_string),
        minimum_total: Some(40.0),
        rules: vec![CategoryRule {
            category: ActivityCategory::IndexedArticle,
            min_points: Some(30.0),
            max_points: Some(60.0),
            min_count: Some(1),
        }],
    }
}

pub(super) fn activity_draft(category: ActivityCategory, authors: u8, lead: bool) -> ActivityDraft {
    ActivityDraft {
        category: Some(category),
        title: Some(format!("{} on quantum spin liquids", category.label())),
        venue: Some("Physical Review B".to_string()),
        published_on: Some(date(2025, 6, 1)),
        author_count: Some(authors),
        lead_author: Some(lead),
        evidence_url: Some("https://doi.org/10.1103/example".to_string()),
    }
}

/// Article (30) plus book (40): eligible under [`criteria_draft`].
pub(super) fn submit_application(harness: &Harness) -> Application {
    let service = &harness.service;
    service
        .create_criteria(&harness.manager, criteria_draft(None))
        .expect("criteria");
    let article = service
        .create_activity(
            &harness.applicant,
            activity_draft(ActivityCategory::IndexedArticle, 1, true),
        )
        .expect("article");
    let book = service
        .create_activity(&harness.applicant, activity_draft(ActivityCategory::Book, 1, true))
        .expect("book");

    service
        .apply(
            &harness.applicant,
            ApplicationRequest {
                posting_id: harness.posting.id.clone(),
                activity_ids: vec![article.id, book.id],
                statement: Some("Ten years of research on frustrated magnets.".to_string()),
            },
        )
        .expect("application submitted")
}

pub(super) fn assign(harness: &Harness, application: &ApplicationId, jurors: usize) {
    for juror in harness.jurors.iter().take(jurors) {
        harness
            .service
            .assign_jury(
                &harness.manager,
                AssignmentRequest {
                    application_id: application.clone(),
                    jury_member: juror.user_id.clone(),
                },
            )
            .expect("jury assigned");
    }
}

pub(super) fn report(application: &ApplicationId, verdict: Verdict) -> ReportDraft {
    ReportDraft {
        application_id: Some(application.clone()),
        verdict: Some(verdict),
        comments: Some("Sustained output in leading journals and strong supervision.".to_string()),
    }
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(payload) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&payload).expect("serialize payload"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request builds")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
