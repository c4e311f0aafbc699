use std::collections::BTreeMap;

use super::{PromotionService, ServiceError};
use crate::access::{require, Principal, Role};
use crate::workflows::promotion::domain::{
    ApplicationStatus, AssignmentId, AssignmentRequest, JuryAssignment, JuryReport, ReportDraft,
    ReportId,
};
use crate::workflows::promotion::validation::validate_report;

impl PromotionService {
    /// Adds a jury member to an application and moves it under review.
    pub fn assign_jury(
        &self,
        actor: &Principal,
        request: AssignmentRequest,
    ) -> Result<JuryAssignment, ServiceError> {
        require(actor, &[Role::Manager])?;
        let writes = self.write_lock();
        let mut application = self.application_record(&request.application_id)?;
        if !application.status.is_open() {
            return Err(ServiceError::Rule(format!(
                "application '{}' is {} and no longer takes jury members",
                application.id,
                application.status.label()
            )));
        }

        let member = self.user_record(&request.jury_member)?;
        if member.role != Role::Jury {
            return Err(ServiceError::Rule(format!(
                "user '{}' is a {}, only jury accounts can review",
                member.id, member.role
            )));
        }
        if member.id == application.applicant {
            return Err(ServiceError::Rule(
                "applicants cannot review their own application".to_string(),
            ));
        }

        let current: Vec<JuryAssignment> = self
            .stores
            .assignments
            .list()?
            .into_iter()
            .filter(|assignment| assignment.application_id == application.id)
            .collect();
        if current
            .iter()
            .any(|assignment| assignment.jury_member == member.id)
        {
            return Err(ServiceError::Conflict(format!(
                "user '{}' is already on the jury for application '{}'",
                member.id, application.id
            )));
        }
        let limit = self.settings.max_jury_per_application;
        if current.len() >= limit {
            return Err(ServiceError::Rule(format!(
                "application '{}' already has the maximum of {limit} jury members",
                application.id
            )));
        }

        let assignment = JuryAssignment {
            id: AssignmentId(self.next_id("jas")),
            application_id: application.id.clone(),
            jury_member: member.id.clone(),
            assigned_by: actor.user_id.clone(),
            assigned_at: self.now(),
        };
        let stored = self.stores.assignments.insert(assignment)?;

        if application.status == ApplicationStatus::Submitted {
            application.status = ApplicationStatus::UnderReview;
            self.stores.applications.update(application.clone())?;
        }
        drop(writes);
        tracing::info!(
            assignment_id = %stored.id,
            application_id = %application.id,
            jury_member = %member.id,
            "jury member assigned"
        );

        let mut details = BTreeMap::new();
        details.insert("application_id".to_string(), application.id.to_string());
        details.insert("posting_id".to_string(), application.posting_id.to_string());
        self.notify("jury_assigned", &member.id, details);

        Ok(stored)
    }

    pub fn unassign_jury(
        &self,
        actor: &Principal,
        id: &AssignmentId,
    ) -> Result<JuryAssignment, ServiceError> {
        require(actor, &[Role::Manager])?;
        let _writes = self.write_lock();
        let assignment = self
            .stores
            .assignments
            .fetch(id.as_str())?
            .ok_or_else(|| ServiceError::not_found("jury assignment", id.as_str()))?;

        let reported = self
            .reports_for(&assignment.application_id)?
            .iter()
            .any(|report| report.jury_member == assignment.jury_member);
        if reported {
            return Err(ServiceError::Rule(format!(
                "user '{}' already reported on application '{}'",
                assignment.jury_member, assignment.application_id
            )));
        }

        let removed = self.stores.assignments.remove(id.as_str())?;
        tracing::info!(assignment_id = %id, "jury member unassigned");
        Ok(removed)
    }

    /// Jury members see their own assignments; staff see all of them.
    pub fn list_assignments(&self, actor: &Principal) -> Result<Vec<JuryAssignment>, ServiceError> {
        require(actor, &[Role::Jury, Role::Manager, Role::Admin])?;
        let mut assignments = self.stores.assignments.list()?;
        if actor.role == Role::Jury {
            assignments.retain(|assignment| assignment.jury_member == actor.user_id);
        }
        Ok(assignments)
    }

    pub fn submit_report(
        &self,
        actor: &Principal,
        draft: ReportDraft,
    ) -> Result<JuryReport, ServiceError> {
        require(actor, &[Role::Jury])?;
        let fields = validate_report(draft)?;
        let _writes = self.write_lock();
        let application = self.application_record(&fields.application_id)?;

        if !self.is_assigned(actor, &application.id)? {
            return Err(ServiceError::Forbidden(format!(
                "not assigned to application '{}'",
                application.id
            )));
        }
        if application.status != ApplicationStatus::UnderReview {
            return Err(ServiceError::Rule(format!(
                "application '{}' is {} and no longer takes reports",
                application.id,
                application.status.label()
            )));
        }
        let already_reported = self
            .reports_for(&application.id)?
            .iter()
            .any(|report| report.jury_member == actor.user_id);
        if already_reported {
            return Err(ServiceError::Conflict(format!(
                "a report for application '{}' was already submitted",
                application.id
            )));
        }

        let report = JuryReport {
            id: ReportId(self.next_id("rpt")),
            application_id: application.id,
            jury_member: actor.user_id.clone(),
            verdict: fields.verdict,
            comments: fields.comments,
            submitted_at: self.now(),
        };
        let stored = self.stores.reports.insert(report)?;
        tracing::info!(
            report_id = %stored.id,
            application_id = %stored.application_id,
            verdict = ?stored.verdict,
            "jury report submitted"
        );
        Ok(stored)
    }
}
