use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use study_core::model::{Credentials, MaterialId, QuizAttempt};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted attempt with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub id: i64,
    pub attempt: QuizAttempt,
}

impl AttemptRow {
    #[must_use]
    pub fn new(id: i64, attempt: QuizAttempt) -> Self {
        Self { id, attempt }
    }
}

/// Local history of submitted quizzes.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Append a submitted attempt and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<i64, StorageError>;

    /// Fetch an attempt by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_attempt(&self, id: i64) -> Result<QuizAttempt, StorageError>;

    /// Attempts for one material, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on query or mapping failures.
    async fn list_attempts(
        &self,
        material_id: &MaterialId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError>;

    /// Most recent attempt per material, across all materials.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on query or mapping failures.
    async fn list_latest_attempts(&self) -> Result<Vec<AttemptRow>, StorageError>;
}

/// Where the signed-in user's credentials live between launches.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if stored credentials cannot be read.
    async fn load(&self) -> Result<Option<Credentials>, StorageError>;

    /// Replace any stored credentials.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the credentials cannot be written.
    async fn save(&self, credentials: &Credentials) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the credentials cannot be removed.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    attempts: Arc<Mutex<Vec<AttemptRow>>>,
    credentials: Arc<Mutex<Option<Credentials>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<i64, StorageError> {
        let mut guard = self.attempts.lock().map_err(poisoned)?;
        let id = guard.last().map_or(1, |row| row.id + 1);
        guard.push(AttemptRow::new(id, attempt.clone()));
        Ok(id)
    }

    async fn get_attempt(&self, id: i64) -> Result<QuizAttempt, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        guard
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.attempt.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_attempts(
        &self,
        material_id: &MaterialId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        let mut rows: Vec<AttemptRow> = guard
            .iter()
            .filter(|row| row.attempt.material_id() == material_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (b.attempt.completed_at(), b.id).cmp(&(a.attempt.completed_at(), a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }

    async fn list_latest_attempts(&self) -> Result<Vec<AttemptRow>, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        let mut latest: Vec<AttemptRow> = Vec::new();
        for row in guard.iter() {
            match latest
                .iter_mut()
                .find(|seen| seen.attempt.material_id() == row.attempt.material_id())
            {
                Some(seen) => {
                    if (row.attempt.completed_at(), row.id)
                        > (seen.attempt.completed_at(), seen.id)
                    {
                        *seen = row.clone();
                    }
                }
                None => latest.push(row.clone()),
            }
        }
        latest.sort_by(|a, b| a.attempt.material_id().cmp(b.attempt.material_id()));
        Ok(latest)
    }
}

#[async_trait]
impl CredentialStore for InMemoryRepository {
    async fn load(&self) -> Result<Option<Credentials>, StorageError> {
        let guard = self.credentials.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StorageError> {
        let mut guard = self.credentials.lock().map_err(poisoned)?;
        *guard = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.credentials.lock().map_err(poisoned)?;
        guard.take();
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub attempts: Arc<dyn AttemptRepository>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let attempts: Arc<dyn AttemptRepository> = Arc::new(repo.clone());
        let credentials: Arc<dyn CredentialStore> = Arc::new(repo);
        Self {
            attempts,
            credentials,
        }
    }
}
