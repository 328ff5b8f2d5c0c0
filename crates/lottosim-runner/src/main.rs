//! Runner binary for the Lottosim lottery simulator.
//!
//! Plays every session listed in `lottosim-config.yaml` through the
//! session service, the same way a front end would: create once, then
//! advance step by step. Sessions run as concurrent tasks.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lottosim-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Create the configured sessions
//! 4. Advance each session `runner.steps` times
//! 5. Verify accounting and print the final results as JSON

mod error;

use std::path::Path;
use std::sync::Arc;

use lottosim_engine::{AccountingResult, verify_accounting};
use lottosim_session::{
    InMemoryRepository, LoggingConfig, LottosimConfig, SessionService, SessionSpec,
    SimulationRepository,
};
use lottosim_types::{ResultsSnapshot, SessionId};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::RunnerError;

/// Configuration file read from the working directory.
const CONFIG_FILE: &str = "lottosim-config.yaml";

type Service = SessionService<InMemoryRepository>;

/// Application entry point for the runner.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, a session is
/// rejected, or a finished session fails its accounting check.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = Path::new(CONFIG_FILE);
    let from_file = config_path.exists();
    let config = if from_file {
        LottosimConfig::from_file(config_path).map_err(RunnerError::from)?
    } else {
        LottosimConfig::default()
    };

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("lottosim-runner starting");
    if from_file {
        info!(path = CONFIG_FILE, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }

    // 3-5. Play the sessions.
    let reports = run(&config).await?;
    println!("{}", serde_json::to_string_pretty(&reports).map_err(RunnerError::from)?);

    info!(sessions = reports.len(), "lottosim-runner finished");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. An unparsable level falls
/// back to `info`.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Create, advance, and verify every configured session.
///
/// Returns the final results in configuration order.
async fn run(config: &LottosimConfig) -> Result<Vec<ResultsSnapshot>, RunnerError> {
    let service = Arc::new(SessionService::new(InMemoryRepository::new(), config));
    let runner = &config.runner;

    if runner.sessions.is_empty() {
        warn!("No sessions configured");
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(runner.sessions.len());
    for spec in &runner.sessions {
        ids.push(start_session(&service, spec).await?);
    }

    let years = i64::from(runner.years_per_step);
    let mut tasks = JoinSet::new();
    for (index, id) in ids.iter().cloned().enumerate() {
        let service = Arc::clone(&service);
        let steps = runner.steps;
        tasks.spawn(async move {
            let result = play(&service, &id, steps, years).await;
            (index, result)
        });
    }

    let mut reports: Vec<Option<ResultsSnapshot>> = vec![None; ids.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| RunnerError::Task {
            message: e.to_string(),
        })?;
        if let Some(slot) = reports.get_mut(index) {
            *slot = Some(result?);
        }
    }

    for id in &ids {
        verify(&service, id).await?;
    }

    Ok(reports.into_iter().flatten().collect())
}

async fn start_session(service: &Service, spec: &SessionSpec) -> Result<SessionId, RunnerError> {
    let id = spec
        .id
        .as_deref()
        .map_or_else(SessionId::generate, SessionId::new);
    let created = service.create(id.clone(), spec.to_request()).await?;
    info!(
        session = %created.session_id,
        lottery = created.lottery,
        seed = created.seed,
        guess = ?created.guess,
        "Session started"
    );
    Ok(id)
}

/// Advance one session `steps` times by `years` each.
async fn play(
    service: &Service,
    id: &SessionId,
    steps: u32,
    years: i64,
) -> Result<ResultsSnapshot, RunnerError> {
    let mut latest = service.results(id).await?;
    for step in 1..=steps {
        latest = service.advance(id, Some(years)).await?;
        info!(
            session = %id,
            step,
            elapsed_years = latest.elapsed_years,
            total_spent = %latest.total_spent,
            total_won = %latest.total_won,
            net_profit = %latest.net_profit,
            "Step complete"
        );
    }
    Ok(latest)
}

async fn verify(service: &Service, id: &SessionId) -> Result<(), RunnerError> {
    let Some(simulation) = service.repository().get(id).await? else {
        return Err(lottosim_session::SessionError::NotFound { id: id.clone() }.into());
    };
    match verify_accounting(&simulation) {
        AccountingResult::Balanced => {
            info!(session = %id, "Accounting verified");
            Ok(())
        }
        AccountingResult::Imbalance(imbalance) => Err(RunnerError::Accounting {
            id: id.clone(),
            message: imbalance.to_string(),
        }),
    }
}
