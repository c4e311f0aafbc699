use super::{PromotionService, ServiceError};
use crate::access::{require, Principal, Role};
use crate::workflows::promotion::domain::{JobPosting, PostingDraft, PostingId};
use crate::workflows::promotion::validation::validate_posting;

impl PromotionService {
    pub fn create_posting(
        &self,
        actor: &Principal,
        draft: PostingDraft,
    ) -> Result<JobPosting, ServiceError> {
        require(actor, &[Role::Admin])?;
        let fields = validate_posting(draft)?;

        let posting = JobPosting {
            id: PostingId(self.next_id("pst")),
            heading: fields.heading,
            academic_title: fields.academic_title,
            faculty: fields.faculty,
            department: fields.department,
            description: fields.description,
            opens_on: fields.opens_on,
            closes_on: fields.closes_on,
            positions: fields.positions,
            created_by: actor.user_id.clone(),
            created_at: self.now(),
        };
        let stored = self.stores.postings.insert(posting)?;
        tracing::info!(
            posting_id = %stored.id,
            title = stored.academic_title.code(),
            department = %stored.department,
            "job posting created"
        );
        Ok(stored)
    }

    /// Replaces the editable fields; authorship and creation time are kept.
    pub fn update_posting(
        &self,
        actor: &Principal,
        id: &PostingId,
        draft: PostingDraft,
    ) -> Result<JobPosting, ServiceError> {
        require(actor, &[Role::Admin])?;
        let existing = self.posting_record(id)?;
        let fields = validate_posting(draft)?;

        let posting = JobPosting {
            heading: fields.heading,
            academic_title: fields.academic_title,
            faculty: fields.faculty,
            department: fields.department,
            description: fields.description,
            opens_on: fields.opens_on,
            closes_on: fields.closes_on,
            positions: fields.positions,
            ..existing
        };
        self.stores.postings.update(posting.clone())?;
        tracing::info!(posting_id = %id, "job posting updated");
        Ok(posting)
    }

    pub fn delete_posting(&self, actor: &Principal, id: &PostingId) -> Result<(), ServiceError> {
        require(actor, &[Role::Admin])?;
        let _writes = self.write_lock();
        self.posting_record(id)?;

        let has_applications = self
            .stores
            .applications
            .list()?
            .iter()
            .any(|application| &application.posting_id == id);
        if has_applications {
            return Err(ServiceError::Conflict(format!(
                "job posting '{id}' already has applications"
            )));
        }

        self.stores.postings.remove(id.as_str())?;
        tracing::info!(posting_id = %id, "job posting deleted");
        Ok(())
    }

    pub fn list_postings(
        &self,
        actor: &Principal,
        open_only: bool,
    ) -> Result<Vec<JobPosting>, ServiceError> {
        require(actor, &[])?;
        let today = self.today();
        let mut postings = self.stores.postings.list()?;
        if open_only {
            postings.retain(|posting| posting.is_open_on(today));
        }
        Ok(postings)
    }

    pub fn get_posting(
        &self,
        actor: &Principal,
        id: &PostingId,
    ) -> Result<JobPosting, ServiceError> {
        require(actor, &[])?;
        self.posting_record(id)
    }
}
