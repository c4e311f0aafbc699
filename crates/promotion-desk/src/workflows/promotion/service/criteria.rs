use super::{PromotionService, ServiceError};
use crate::access::{require, Principal, Role};
use crate::workflows::promotion::domain::{AcademicTitle, Criteria, CriteriaDraft, CriteriaId};
use crate::workflows::promotion::validation::validate_criteria;

const EDITORS: &[Role] = &[Role::Admin, Role::Manager];

fn same_scope(criteria: &Criteria, title: AcademicTitle, department: Option<&str>) -> bool {
    if criteria.academic_title != title {
        return false;
    }
    match (criteria.department.as_deref(), department) {
        (None, None) => true,
        (Some(_), Some(department)) => criteria.applies_to_department(department),
        _ => false,
    }
}

impl PromotionService {
    /// Only one criteria set may exist per title and department.
    fn ensure_unique_scope(
        &self,
        title: AcademicTitle,
        department: Option<&str>,
        ignore: Option<&CriteriaId>,
    ) -> Result<(), ServiceError> {
        let clash = self
            .stores
            .criteria
            .list()?
            .into_iter()
            .filter(|criteria| Some(&criteria.id) != ignore)
            .any(|criteria| same_scope(&criteria, title, department));
        if clash {
            return Err(ServiceError::Conflict(format!(
                "criteria for {} in {} already exist",
                title.label(),
                department.unwrap_or("all departments")
            )));
        }
        Ok(())
    }

    pub fn create_criteria(
        &self,
        actor: &Principal,
        draft: CriteriaDraft,
    ) -> Result<Criteria, ServiceError> {
        require(actor, EDITORS)?;
        let fields = validate_criteria(draft)?;
        let _writes = self.write_lock();
        self.ensure_unique_scope(fields.academic_title, fields.department.as_deref(), None)?;

        let criteria = Criteria {
            id: CriteriaId(self.next_id("crt")),
            academic_title: fields.academic_title,
            department: fields.department,
            minimum_total: fields.minimum_total,
            rules: fields.rules,
            updated_by: actor.user_id.clone(),
            updated_at: self.now(),
        };
        let stored = self.stores.criteria.insert(criteria)?;
        tracing::info!(
            criteria_id = %stored.id,
            title = stored.academic_title.code(),
            rules = stored.rules.len(),
            "criteria created"
        );
        Ok(stored)
    }

    pub fn update_criteria(
        &self,
        actor: &Principal,
        id: &CriteriaId,
        draft: CriteriaDraft,
    ) -> Result<Criteria, ServiceError> {
        require(actor, EDITORS)?;
        let fields = validate_criteria(draft)?;
        let _writes = self.write_lock();
        let existing = self.criteria_record(id)?;
        self.ensure_unique_scope(fields.academic_title, fields.department.as_deref(), Some(id))?;

        let criteria = Criteria {
            id: existing.id,
            academic_title: fields.academic_title,
            department: fields.department,
            minimum_total: fields.minimum_total,
            rules: fields.rules,
            updated_by: actor.user_id.clone(),
            updated_at: self.now(),
        };
        self.stores.criteria.update(criteria.clone())?;
        tracing::info!(criteria_id = %id, "criteria updated");
        Ok(criteria)
    }

    /// Applications keep the score sheet computed at submission.
    pub fn delete_criteria(&self, actor: &Principal, id: &CriteriaId) -> Result<(), ServiceError> {
        require(actor, EDITORS)?;
        self.criteria_record(id)?;
        self.stores.criteria.remove(id.as_str())?;
        tracing::info!(criteria_id = %id, "criteria deleted");
        Ok(())
    }

    pub fn list_criteria(&self, actor: &Principal) -> Result<Vec<Criteria>, ServiceError> {
        require(actor, &[])?;
        Ok(self.stores.criteria.list()?)
    }

    pub fn get_criteria(
        &self,
        actor: &Principal,
        id: &CriteriaId,
    ) -> Result<Criteria, ServiceError> {
        require(actor, &[])?;
        self.criteria_record(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::promotion::domain::UserId;
    use chrono::Utc;

    fn criteria(department: Option<&str>) -> Criteria {
        Criteria {
            id: CriteriaId::from("crt-000001"),
            academic_title: AcademicTitle::AssociateProfessor,
            department: department.map(str::to_string),
            minimum_total: 100.0,
            rules: Vec::new(),
            updated_by: UserId::from("usr-000001"),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn scope_matches_title_and_department_case_insensitively() {
        let scoped = criteria(Some("Physics"));
        assert!(same_scope(&scoped, AcademicTitle::AssociateProfessor, Some("physics")));
        assert!(!same_scope(&scoped, AcademicTitle::AssociateProfessor, None));
        assert!(!same_scope(&scoped, AcademicTitle::Professor, Some("Physics")));

        let general = criteria(None);
        assert!(same_scope(&general, AcademicTitle::AssociateProfessor, None));
        assert!(!same_scope(&general, AcademicTitle::AssociateProfessor, Some("Physics")));
    }
}
