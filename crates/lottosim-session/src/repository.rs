//! Storage for simulations between requests.
//!
//! [`SimulationRepository`] is the seam between the session service and
//! whatever keeps state alive across calls. The service never holds a
//! simulation longer than one request: it reads it, advances an owned
//! copy, and writes it back only if the advance succeeded.

use std::collections::BTreeMap;
use std::future::Future;

use tokio::sync::RwLock;

use lottosim_engine::{Simulation, codec};
use lottosim_types::SessionId;

use crate::error::SessionError;

/// Keyed storage for simulations.
///
/// Implementations do not need their own per-key locking; the session
/// service serializes access to each id.
pub trait SimulationRepository: Send + Sync {
    /// Load the simulation stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Codec`] if stored state cannot be decoded.
    fn get(
        &self,
        id: &SessionId,
    ) -> impl Future<Output = Result<Option<Simulation>, SessionError>> + Send;

    /// Store `simulation` under `id`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Codec`] if the simulation cannot be encoded.
    fn put(
        &self,
        id: &SessionId,
        simulation: &Simulation,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Remove the simulation stored under `id`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Implementations backed by external storage may fail; the in-memory
    /// store never does.
    fn delete(&self, id: &SessionId) -> impl Future<Output = Result<bool, SessionError>> + Send;
}

/// Process-local repository holding encoded simulation blobs.
///
/// State goes through [`codec::encode`] and [`codec::decode`] on every
/// write and read, exactly as it would for a database-backed store.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    blobs: RwLock<BTreeMap<SessionId, Vec<u8>>>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// The raw encoded blob for `id`, for inspection.
    pub async fn blob(&self, id: &SessionId) -> Option<Vec<u8>> {
        self.blobs.read().await.get(id).cloned()
    }
}

impl SimulationRepository for InMemoryRepository {
    async fn get(&self, id: &SessionId) -> Result<Option<Simulation>, SessionError> {
        let blobs = self.blobs.read().await;
        match blobs.get(id) {
            Some(bytes) => Ok(Some(codec::decode(bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, id: &SessionId, simulation: &Simulation) -> Result<(), SessionError> {
        let bytes = codec::encode(simulation)?;
        self.blobs.write().await.insert(id.clone(), bytes);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, SessionError> {
        Ok(self.blobs.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lottosim_engine::{GuessSource, LotterySource, SimulationRequest, create};

    use super::*;

    fn lotto(seed: u64) -> Simulation {
        create(SimulationRequest {
            lottery: LotterySource::Named("lotto".to_owned()),
            guess: GuessSource::Generate,
            rounds_per_week: None,
            seed: Some(seed),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn put_then_get_returns_equal_simulation() {
        let repo = InMemoryRepository::new();
        let id = SessionId::new("a");
        let mut sim = lotto(3);
        sim.advance(2).unwrap();

        repo.put(&id, &sim).await.unwrap();
        let loaded = repo.get(&id).await.unwrap().unwrap();

        assert_eq!(loaded, sim);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let repo = InMemoryRepository::new();
        let loaded = repo.get(&SessionId::new("nobody")).await.unwrap();
        assert!(loaded.is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn put_replaces_existing() {
        let repo = InMemoryRepository::new();
        let id = SessionId::new("a");
        repo.put(&id, &lotto(1)).await.unwrap();
        repo.put(&id, &lotto(2)).await.unwrap();

        let loaded = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(loaded.seed(), 2);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let repo = InMemoryRepository::new();
        let id = SessionId::new("a");
        repo.put(&id, &lotto(1)).await.unwrap();

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
        assert!(repo.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stored_blob_is_versioned_json() {
        let repo = InMemoryRepository::new();
        let id = SessionId::new("a");
        repo.put(&id, &lotto(1)).await.unwrap();

        let blob = repo.blob(&id).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&blob).unwrap();
        assert_eq!(value["format"], "lottosim/simulation");
        assert_eq!(value["version"], 1);
    }
}
