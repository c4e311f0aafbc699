use super::{PromotionService, ServiceError};
use crate::access::{require, Principal, Role};
use crate::workflows::promotion::domain::{Activity, ActivityDraft, ActivityId};
use crate::workflows::promotion::validation::validate_activity;

impl PromotionService {
    fn owned_activity(&self, actor: &Principal, id: &ActivityId) -> Result<Activity, ServiceError> {
        let activity = self.activity_record(id)?;
        if activity.owner != actor.user_id {
            return Err(ServiceError::Forbidden(format!(
                "activity '{id}' belongs to another applicant"
            )));
        }
        Ok(activity)
    }

    pub fn create_activity(
        &self,
        actor: &Principal,
        draft: ActivityDraft,
    ) -> Result<Activity, ServiceError> {
        require(actor, &[Role::Applicant])?;
        let fields = validate_activity(draft, self.today())?;

        let activity = Activity {
            id: ActivityId(self.next_id("act")),
            owner: actor.user_id.clone(),
            category: fields.category,
            title: fields.title,
            venue: fields.venue,
            published_on: fields.published_on,
            author_count: fields.author_count,
            lead_author: fields.lead_author,
            evidence_url: fields.evidence_url,
            created_at: self.now(),
        };
        let stored = self.stores.activities.insert(activity)?;
        tracing::info!(
            activity_id = %stored.id,
            owner = %stored.owner,
            category = stored.category.code(),
            "activity recorded"
        );
        Ok(stored)
    }

    /// Edits do not reach applications already submitted; those hold a copy.
    pub fn update_activity(
        &self,
        actor: &Principal,
        id: &ActivityId,
        draft: ActivityDraft,
    ) -> Result<Activity, ServiceError> {
        require(actor, &[Role::Applicant])?;
        let existing = self.owned_activity(actor, id)?;
        let fields = validate_activity(draft, self.today())?;

        let activity = Activity {
            category: fields.category,
            title: fields.title,
            venue: fields.venue,
            published_on: fields.published_on,
            author_count: fields.author_count,
            lead_author: fields.lead_author,
            evidence_url: fields.evidence_url,
            ..existing
        };
        self.stores.activities.update(activity.clone())?;
        Ok(activity)
    }

    pub fn delete_activity(&self, actor: &Principal, id: &ActivityId) -> Result<(), ServiceError> {
        require(actor, &[Role::Applicant])?;
        self.owned_activity(actor, id)?;
        self.stores.activities.remove(id.as_str())?;
        Ok(())
    }

    pub fn list_activities(&self, actor: &Principal) -> Result<Vec<Activity>, ServiceError> {
        require(actor, &[Role::Applicant])?;
        let mut activities = self.stores.activities.list()?;
        activities.retain(|activity| activity.owner == actor.user_id);
        Ok(activities)
    }
}
