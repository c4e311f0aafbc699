//! Password hashing and verification.
//!
//! Hashes are Argon2id PHC strings. The parameters are encoded in every hash, so
//! verification does not depend on the hasher's current cost settings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid hashing parameters: {0}")]
    Params(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHasher {
    /// Custom cost, e.g. a cheap setting for demos and test suites.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|err| PasswordError::Params(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordError::Hash(err.to_string()))
    }

    /// Rejects a login for an unknown account at the same hashing cost as `verify`.
    pub fn reject_unknown(&self, password: &str) -> bool {
        let _ = self.hash(password);
        false
    }

    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_reject_wrong_passwords() {
        let hasher = CredentialHasher::with_cost(1024, 1).expect("cheap params");
        let encoded = hasher.hash("tenure-track-2026").expect("hashes");

        assert!(encoded.starts_with("$argon2id$"));
        assert!(hasher.verify("tenure-track-2026", &encoded));
        assert!(!hasher.verify("tenure-track-2025", &encoded));
        assert!(!hasher.verify("tenure-track-2026", "not-a-phc-string"));
    }

    #[test]
    fn unknown_accounts_are_always_rejected() {
        let hasher = CredentialHasher::with_cost(1024, 1).expect("cheap params");
        assert!(!hasher.reject_unknown("tenure-track-2026"));
        assert!(!hasher.reject_unknown(""));
    }

    #[test]
    fn rejects_impossible_cost() {
        assert!(matches!(
            CredentialHasher::with_cost(1, 1),
            Err(PasswordError::Params(_))
        ));
    }
}
