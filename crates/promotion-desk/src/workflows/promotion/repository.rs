use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::domain::{
    Activity, Application, Criteria, JobPosting, JuryAssignment, JuryReport, User, UserId,
};

/// Anything stored in a document collection, addressed by its string key.
pub trait Record: Clone + Send + Sync + 'static {
    fn key(&self) -> &str;
}

impl Record for User {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for JobPosting {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Criteria {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Activity {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Application {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for JuryAssignment {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for JuryReport {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Storage abstraction so services can be exercised without a database.
pub trait Repository<T: Record>: Send + Sync {
    fn insert(&self, record: T) -> Result<T, RepositoryError>;
    fn update(&self, record: T) -> Result<(), RepositoryError>;
    fn fetch(&self, key: &str) -> Result<Option<T>, RepositoryError>;
    fn remove(&self, key: &str) -> Result<T, RepositoryError>;
    fn list(&self) -> Result<Vec<T>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local collection keyed by record id. Listing order follows the key.
pub struct InMemoryRepository<T> {
    records: RwLock<BTreeMap<String, T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("collection lock poisoned".to_string())
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn insert(&self, record: T) -> Result<T, RepositoryError> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        if guard.contains_key(record.key()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.key().to_string(), record.clone());
        Ok(record)
    }

    fn update(&self, record: T) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        match guard.get_mut(record.key()) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, key: &str) -> Result<Option<T>, RepositoryError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<T, RepositoryError> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        guard.remove(key).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<T>, RepositoryError> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        Ok(guard.values().cloned().collect())
    }
}

/// One handle per collection.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn Repository<User>>,
    pub postings: Arc<dyn Repository<JobPosting>>,
    pub criteria: Arc<dyn Repository<Criteria>>,
    pub activities: Arc<dyn Repository<Activity>>,
    pub applications: Arc<dyn Repository<Application>>,
    pub assignments: Arc<dyn Repository<JuryAssignment>>,
    pub reports: Arc<dyn Repository<JuryReport>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::<User>::default()),
            postings: Arc::new(InMemoryRepository::<JobPosting>::default()),
            criteria: Arc::new(InMemoryRepository::<Criteria>::default()),
            activities: Arc::new(InMemoryRepository::<Activity>::default()),
            applications: Arc::new(InMemoryRepository::<Application>::default()),
            assignments: Arc::new(InMemoryRepository::<JuryAssignment>::default()),
            reports: Arc::new(InMemoryRepository::<JuryReport>::default()),
        }
    }
}

/// Outbound hook for e-mail or messaging adapters.
pub trait Notifier: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub template: String,
    pub recipient: UserId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
