use super::{PromotionService, ServiceError};
use crate::access::{require, IssuedToken, Principal, Role};
use crate::config::BootstrapAdmin;
use crate::workflows::promotion::domain::{
    LoginRequest, NewUserRequest, RegistrationDraft, User, UserId, UserView,
};
use crate::workflows::promotion::validation::{validate_registration, RegistrationFields};

impl PromotionService {
    fn user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let email = email.trim();
        Ok(self
            .stores
            .users
            .list()?
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    fn store_user(&self, fields: RegistrationFields, role: Role) -> Result<User, ServiceError> {
        let password_hash = self.hasher.hash(&fields.password)?;
        let _writes = self.write_lock();
        if self.user_by_email(&fields.email)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "an account for {} already exists",
                fields.email
            )));
        }

        let user = User {
            id: UserId(self.next_id("usr")),
            name: fields.name,
            email: fields.email,
            role,
            password_hash,
            created_at: self.now(),
        };
        let stored = self.stores.users.insert(user)?;
        tracing::info!(user_id = %stored.id, role = %stored.role, "account created");
        Ok(stored)
    }

    /// Self-service sign-up. New accounts are always applicants.
    pub fn register(&self, draft: RegistrationDraft) -> Result<UserView, ServiceError> {
        let fields = validate_registration(draft)?;
        Ok(self.store_user(fields, Role::Applicant)?.view())
    }

    pub fn create_user(
        &self,
        actor: &Principal,
        request: NewUserRequest,
    ) -> Result<UserView, ServiceError> {
        require(actor, &[Role::Admin])?;
        let fields = validate_registration(request.account)?;
        Ok(self.store_user(fields, request.role)?.view())
    }

    /// Seeds the configured administrator unless an account with that email exists.
    pub fn ensure_admin(&self, admin: &BootstrapAdmin) -> Result<UserView, ServiceError> {
        if let Some(existing) = self.user_by_email(&admin.email)? {
            return Ok(existing.view());
        }

        let fields = validate_registration(RegistrationDraft {
            name: Some(admin.name.clone()),
            email: Some(admin.email.clone()),
            password: Some(admin.password.clone()),
        })?;
        Ok(self.store_user(fields, Role::Admin)?.view())
    }

    pub fn login(&self, request: LoginRequest) -> Result<IssuedToken, ServiceError> {
        let Some(user) = self.user_by_email(&request.email)? else {
            self.hasher.reject_unknown(&request.password);
            return Err(ServiceError::InvalidCredentials);
        };
        if !self.hasher.verify(&request.password, &user.password_hash) {
            tracing::warn!(user_id = %user.id, "login rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        let issued = self
            .sessions
            .issue(Principal::new(user.id.clone(), user.role), self.now());
        tracing::info!(user_id = %user.id, "session issued");
        Ok(issued)
    }

    pub fn logout(&self, token: &str) -> bool {
        self.sessions.revoke(token)
    }

    pub fn me(&self, actor: &Principal) -> Result<UserView, ServiceError> {
        Ok(self.user_record(&actor.user_id)?.view())
    }

    pub fn list_users(&self, actor: &Principal) -> Result<Vec<UserView>, ServiceError> {
        require(actor, &[Role::Admin])?;
        Ok(self
            .stores
            .users
            .list()?
            .iter()
            .map(User::view)
            .collect())
    }

    pub fn get_user(&self, actor: &Principal, id: &UserId) -> Result<UserView, ServiceError> {
        require(actor, &[Role::Admin])?;
        Ok(self.user_record(id)?.view())
    }

    /// Changing a role ends the user's sessions so the new role applies on next login.
    pub fn change_role(
        &self,
        actor: &Principal,
        id: &UserId,
        role: Role,
    ) -> Result<UserView, ServiceError> {
        require(actor, &[Role::Admin])?;
        if &actor.user_id == id && role != Role::Admin {
            return Err(ServiceError::Rule(
                "administrators cannot remove their own admin role".to_string(),
            ));
        }

        let mut user = self.user_record(id)?;
        user.role = role;
        self.stores.users.update(user.clone())?;
        let revoked = self.sessions.revoke_user(id);
        tracing::info!(user_id = %id, role = %role, revoked, "role changed");
        Ok(user.view())
    }

    pub fn delete_user(&self, actor: &Principal, id: &UserId) -> Result<UserView, ServiceError> {
        require(actor, &[Role::Admin])?;
        if &actor.user_id == id {
            return Err(ServiceError::Rule(
                "administrators cannot delete their own account".to_string(),
            ));
        }

        self.user_record(id)?;
        let removed = self.stores.users.remove(id.as_str())?;
        self.sessions.revoke_user(id);
        tracing::info!(user_id = %id, "account deleted");
        Ok(removed.view())
    }
}
