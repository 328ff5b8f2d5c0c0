//! The session service: create, advance, read, and delete simulations by id.
//!
//! Every operation on an id runs while holding that id's lock, from the
//! repository read to the repository write. Two concurrent requests on the
//! same id therefore run one after the other, while requests on distinct
//! ids never wait on each other.
//!
//! Advances are transactional: the engine works on an owned copy and the
//! repository is written only after the engine reports success. A rejected
//! request leaves the stored simulation exactly as it was.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use lottosim_engine::{Simulation, SimulationRequest, create};
use lottosim_types::{CreatedSession, ResultsSnapshot, SessionId};

use crate::config::LottosimConfig;
use crate::error::SessionError;
use crate::repository::SimulationRepository;

/// Session operations over a [`SimulationRepository`].
#[derive(Debug)]
pub struct SessionService<R> {
    repository: R,
    default_rounds_per_week: u32,
    default_years: u32,
    max_years_per_request: u32,
    locks: Mutex<BTreeMap<SessionId, Arc<Mutex<()>>>>,
}

impl<R: SimulationRepository> SessionService<R> {
    /// Create a service over `repository` with the limits from `config`.
    pub fn new(repository: R, config: &LottosimConfig) -> Self {
        Self {
            repository,
            default_rounds_per_week: config.engine.default_rounds_per_week,
            default_years: config.service.default_years,
            max_years_per_request: config.service.max_years_per_request,
            locks: Mutex::new(BTreeMap::new()),
        }
    }

    /// The underlying repository.
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Number of ids with a request in flight.
    pub async fn lock_entries(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Create a simulation and store it under `id`.
    ///
    /// A session already stored under `id` is replaced. Requests without
    /// a rounds-per-week value get the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Simulation`] if the engine rejects the
    /// request; nothing is stored in that case.
    pub async fn create(
        &self,
        id: SessionId,
        mut request: SimulationRequest,
    ) -> Result<CreatedSession, SessionError> {
        if request.rounds_per_week.is_none() {
            request.rounds_per_week = Some(self.default_rounds_per_week);
        }

        let guard = self.lock(&id).await;
        let result = self.create_locked(&id, request).await;
        self.unlock(&id, guard).await;
        let simulation = result?;

        Ok(CreatedSession {
            lottery: simulation.definition().name().to_owned(),
            session_id: id,
            guess: simulation.guess().selections().to_vec(),
            seed: simulation.seed(),
            created_at: Utc::now(),
        })
    }

    /// Advance the session under `id` and return its new results.
    ///
    /// `None` plays the configured default number of years. Positive
    /// requests are capped at the configured maximum; negative requests
    /// are passed through and rejected by the engine. The rounds are played
    /// on the blocking thread pool so async workers stay responsive.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id,
    /// [`SessionError::Simulation`] if the engine rejects the advance,
    /// [`SessionError::Codec`] if stored state cannot be read or written,
    /// and [`SessionError::Worker`] if the blocking task fails.
    pub async fn advance(
        &self,
        id: &SessionId,
        years: Option<i64>,
    ) -> Result<ResultsSnapshot, SessionError> {
        let effective = self.effective_years(years);
        let guard = self.lock(id).await;
        let result = self.advance_locked(id, effective).await;
        self.unlock(id, guard).await;
        result
    }

    /// Results of the session under `id`, without advancing it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id and
    /// [`SessionError::Codec`] if stored state cannot be read.
    pub async fn results(&self, id: &SessionId) -> Result<ResultsSnapshot, SessionError> {
        let guard = self.lock(id).await;
        let result = self.load(id).await.map(|simulation| simulation.snapshot());
        self.unlock(id, guard).await;
        result
    }

    /// Delete the session under `id`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn delete(&self, id: &SessionId) -> Result<bool, SessionError> {
        let guard = self.lock(id).await;
        let result = self.repository.delete(id).await;
        self.unlock(id, guard).await;

        if matches!(result, Ok(true)) {
            info!(session = %id, "Session deleted");
        }
        result
    }

    /// The number of years an advance request actually plays.
    pub fn effective_years(&self, requested: Option<i64>) -> i64 {
        let max = i64::from(self.max_years_per_request);
        match requested {
            None => i64::from(self.default_years),
            Some(years) if years > max => {
                debug!(requested = years, max, "Capping advance request");
                max
            }
            Some(years) => years,
        }
    }

    // -------------------------------------------------------------------------
    // Locked bodies
    // -------------------------------------------------------------------------

    async fn create_locked(
        &self,
        id: &SessionId,
        request: SimulationRequest,
    ) -> Result<Simulation, SessionError> {
        let simulation = create(request).inspect_err(|err| {
            warn!(session = %id, error = %err, "Rejected session create");
        })?;

        if self.repository.delete(id).await? {
            info!(session = %id, "Replacing existing session");
        }
        self.repository.put(id, &simulation).await?;

        info!(
            session = %id,
            lottery = simulation.definition().name(),
            seed = simulation.seed(),
            rounds_per_week = simulation.rounds_per_week(),
            "Session created"
        );
        Ok(simulation)
    }

    async fn advance_locked(
        &self,
        id: &SessionId,
        years: i64,
    ) -> Result<ResultsSnapshot, SessionError> {
        let mut simulation = self.load(id).await?;
        let (simulation, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = simulation.advance(years);
            (simulation, outcome)
        })
        .await
        .map_err(|e| SessionError::Worker {
            message: e.to_string(),
        })?;
        let report = outcome.inspect_err(|err| {
            warn!(session = %id, years, error = %err, "Rejected advance");
        })?;
        self.repository.put(id, &simulation).await?;

        debug!(
            session = %id,
            years,
            rounds = report.rounds_played,
            spent = %report.spent,
            won = %report.won,
            "Session advanced"
        );
        Ok(simulation.snapshot())
    }

    // -------------------------------------------------------------------------
    // Storage and locking
    // -------------------------------------------------------------------------

    async fn load(&self, id: &SessionId) -> Result<Simulation, SessionError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| SessionError::NotFound { id: id.clone() })
    }

    async fn lock(&self, id: &SessionId) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        entry.lock_owned().await
    }

    /// Release `guard` and drop the entry for `id` if nobody else is holding
    /// or waiting on it. Every locked operation ends here, whatever its
    /// outcome, so the table only holds ids with a request in flight.
    async fn unlock(&self, id: &SessionId, guard: OwnedMutexGuard<()>) {
        drop(guard);
        let mut locks = self.locks.lock().await;
        if locks.get(id).is_some_and(|entry| Arc::strong_count(entry) == 1) {
            locks.remove(id);
        }
    }
}
