use std::collections::{BTreeMap, BTreeSet};

use super::{PromotionService, ServiceError};
use crate::access::{require, Principal, Role};
use crate::workflows::promotion::domain::{
    Application, ApplicationId, ApplicationRequest, ApplicationStatus, JuryReport, Verdict,
};
use crate::workflows::promotion::scoring::{score_table_csv, select_criteria, Eligibility};
use crate::workflows::promotion::validation::ValidationError;

impl PromotionService {
    pub(super) fn is_assigned(
        &self,
        actor: &Principal,
        id: &ApplicationId,
    ) -> Result<bool, ServiceError> {
        Ok(self
            .stores
            .assignments
            .list()?
            .iter()
            .any(|assignment| {
                &assignment.application_id == id && assignment.jury_member == actor.user_id
            }))
    }

    /// Staff see everything, applicants their own files and jury members what they review.
    fn can_view(&self, actor: &Principal, application: &Application) -> Result<bool, ServiceError> {
        if actor.role.is_staff() {
            return Ok(true);
        }
        Ok(match actor.role {
            Role::Jury => self.is_assigned(actor, &application.id)?,
            _ => application.applicant == actor.user_id,
        })
    }

    fn visible_application(
        &self,
        actor: &Principal,
        id: &ApplicationId,
    ) -> Result<Application, ServiceError> {
        let application = self.application_record(id)?;
        if !self.can_view(actor, &application)? {
            return Err(ServiceError::Forbidden(format!(
                "application '{id}' is not visible to this account"
            )));
        }
        Ok(application)
    }

    pub(super) fn reports_for(&self, id: &ApplicationId) -> Result<Vec<JuryReport>, ServiceError> {
        let mut reports = self.stores.reports.list()?;
        reports.retain(|report| &report.application_id == id);
        Ok(reports)
    }

    /// Files an application. Activities are snapshotted and scored against the
    /// criteria governing the posting at this moment.
    pub fn apply(
        &self,
        actor: &Principal,
        request: ApplicationRequest,
    ) -> Result<Application, ServiceError> {
        require(actor, &[Role::Applicant])?;
        let _writes = self.write_lock();
        let posting = self.posting_record(&request.posting_id)?;
        let today = self.today();
        if !posting.is_open_on(today) {
            return Err(ServiceError::Rule(format!(
                "job posting '{}' accepts applications from {} to {}",
                posting.id, posting.opens_on, posting.closes_on
            )));
        }

        let duplicate = self.stores.applications.list()?.iter().any(|existing| {
            existing.posting_id == posting.id
                && existing.applicant == actor.user_id
                && existing.status != ApplicationStatus::Withdrawn
        });
        if duplicate {
            return Err(ServiceError::Conflict(format!(
                "an application for job posting '{}' already exists",
                posting.id
            )));
        }

        if request.activity_ids.is_empty() {
            return Err(ValidationError::MissingField("activity_ids").into());
        }
        let mut seen = BTreeSet::new();
        let mut activities = Vec::with_capacity(request.activity_ids.len());
        for activity_id in &request.activity_ids {
            if !seen.insert(activity_id) {
                continue;
            }
            let activity = self.activity_record(activity_id)?;
            if activity.owner != actor.user_id {
                return Err(ServiceError::Forbidden(format!(
                    "activity '{activity_id}' belongs to another applicant"
                )));
            }
            activities.push(activity);
        }

        let criteria = self.stores.criteria.list()?;
        let governing = select_criteria(&criteria, posting.academic_title, &posting.department);
        let score_sheet = self.scoring.score(&activities, governing);

        let application = Application {
            id: ApplicationId(self.next_id("app")),
            posting_id: posting.id.clone(),
            applicant: actor.user_id.clone(),
            activities,
            statement: request
                .statement
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            status: ApplicationStatus::Submitted,
            score_sheet,
            submitted_at: self.now(),
            decided_at: None,
        };
        let stored = self.stores.applications.insert(application)?;
        tracing::info!(
            application_id = %stored.id,
            posting_id = %stored.posting_id,
            total_points = stored.score_sheet.total_points,
            eligibility = stored.score_sheet.eligibility.label(),
            "application submitted"
        );
        Ok(stored)
    }

    pub fn list_applications(&self, actor: &Principal) -> Result<Vec<Application>, ServiceError> {
        require(actor, &[])?;
        let mut visible = Vec::new();
        for application in self.stores.applications.list()? {
            if self.can_view(actor, &application)? {
                visible.push(application);
            }
        }
        Ok(visible)
    }

    pub fn get_application(
        &self,
        actor: &Principal,
        id: &ApplicationId,
    ) -> Result<Application, ServiceError> {
        require(actor, &[])?;
        self.visible_application(actor, id)
    }

    pub fn withdraw(
        &self,
        actor: &Principal,
        id: &ApplicationId,
    ) -> Result<Application, ServiceError> {
        require(actor, &[Role::Applicant])?;
        let _writes = self.write_lock();
        let mut application = self.application_record(id)?;
        if application.applicant != actor.user_id {
            return Err(ServiceError::Forbidden(format!(
                "application '{id}' belongs to another applicant"
            )));
        }
        if !application.status.is_open() {
            return Err(ServiceError::Rule(format!(
                "application '{id}' is already {}",
                application.status.label()
            )));
        }

        application.status = ApplicationStatus::Withdrawn;
        self.stores.applications.update(application.clone())?;
        tracing::info!(application_id = %id, "application withdrawn");
        Ok(application)
    }

    /// CSV rendering of the stored score sheet.
    pub fn score_table(
        &self,
        actor: &Principal,
        id: &ApplicationId,
    ) -> Result<String, ServiceError> {
        require(actor, &[])?;
        let application = self.visible_application(actor, id)?;
        Ok(score_table_csv(&application.score_sheet)?)
    }

    /// Closes the review once enough jury members have reported.
    pub fn finalize(
        &self,
        actor: &Principal,
        id: &ApplicationId,
    ) -> Result<Application, ServiceError> {
        require(actor, &[Role::Manager])?;
        let writes = self.write_lock();
        let mut application = self.application_record(id)?;
        if application.status != ApplicationStatus::UnderReview {
            return Err(ServiceError::Rule(format!(
                "application '{id}' is {}, only applications under review can be finalized",
                application.status.label()
            )));
        }

        let reports = self.reports_for(id)?;
        let required = self.settings.min_jury_reports;
        if reports.len() < required {
            return Err(ServiceError::Rule(format!(
                "{} of {required} required jury reports received",
                reports.len()
            )));
        }

        let reported: BTreeSet<_> = reports.iter().map(|report| &report.jury_member).collect();
        let pending = self
            .stores
            .assignments
            .list()?
            .into_iter()
            .filter(|assignment| &assignment.application_id == id)
            .filter(|assignment| !reported.contains(&assignment.jury_member))
            .count();
        if pending > 0 {
            return Err(ServiceError::Rule(format!(
                "{pending} assigned jury member(s) have not reported"
            )));
        }

        let positive = reports
            .iter()
            .filter(|report| report.verdict == Verdict::Positive)
            .count();
        let accepted = positive * 2 > reports.len()
            && application.score_sheet.eligibility != Eligibility::Ineligible;
        application.status = if accepted {
            ApplicationStatus::Accepted
        } else {
            ApplicationStatus::Rejected
        };
        application.decided_at = Some(self.now());
        self.stores.applications.update(application.clone())?;
        drop(writes);

        tracing::info!(
            application_id = %id,
            positive,
            reports = reports.len(),
            decision = application.status.label(),
            "application finalized"
        );

        let mut details = BTreeMap::new();
        details.insert("application_id".to_string(), id.to_string());
        details.insert("posting_id".to_string(), application.posting_id.to_string());
        details.insert(
            "decision".to_string(),
            application.status.label().to_string(),
        );
        self.notify("application_decided", &application.applicant, details);

        Ok(application)
    }

    pub fn list_reports(
        &self,
        actor: &Principal,
        id: &ApplicationId,
    ) -> Result<Vec<JuryReport>, ServiceError> {
        require(actor, &[Role::Admin, Role::Manager])?;
        self.application_record(id)?;
        self.reports_for(id)
    }
}
