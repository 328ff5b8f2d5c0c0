//! Integration tests for the `lottosim-session` service.
//!
//! These drive [`SessionService`] through its public API only, backed by
//! the in-memory repository, so every request round-trips through the
//! versioned codec.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use lottosim_engine::{
    AccountingResult, CustomLottery, GuessInput, GuessSource, LotterySource, Pool,
    SimulationError, SimulationRequest, create, verify_accounting,
};
use lottosim_session::{InMemoryRepository, LottosimConfig, SessionError, SessionService};
use lottosim_types::SessionId;
use rust_decimal::Decimal;

fn service() -> SessionService<InMemoryRepository> {
    SessionService::new(InMemoryRepository::new(), &LottosimConfig::default())
}

fn small_custom(seed: u64) -> SimulationRequest {
    let reward_table = [
        ("3".to_owned(), Decimal::new(100, 0)),
        ("2".to_owned(), Decimal::new(10, 0)),
        ("1".to_owned(), Decimal::ZERO),
        ("0".to_owned(), Decimal::ZERO),
    ]
    .into_iter()
    .collect();

    SimulationRequest {
        lottery: LotterySource::Custom(CustomLottery {
            pools: vec![Pool::range(1, 10, 3)],
            reward_table,
            guess_price: Decimal::ONE,
        }),
        guess: GuessSource::Provided(GuessInput::Flat(vec![2, 5, 9])),
        rounds_per_week: Some(3),
        seed: Some(seed),
    }
}

#[tokio::test]
async fn session_results_match_a_local_replay() {
    let service = service();
    let id = SessionId::new("replay");
    service.create(id.clone(), small_custom(11)).await.unwrap();

    service.advance(&id, Some(2)).await.unwrap();
    let remote = service.advance(&id, Some(3)).await.unwrap();

    let mut local = create(small_custom(11)).unwrap();
    local.advance(5).unwrap();

    assert_eq!(remote, local.snapshot());
    assert_eq!(remote.elapsed_rounds, 5 * 156);
    assert_eq!(remote.total_spent, Decimal::new(780, 0));
}

#[tokio::test]
async fn failed_advance_leaves_stored_state_unchanged() {
    let service = service();
    let id = SessionId::new("neg");
    service.create(id.clone(), small_custom(5)).await.unwrap();
    service.advance(&id, Some(1)).await.unwrap();
    let before = service.repository().blob(&id).await.unwrap();

    let result = service.advance(&id, Some(-1)).await;
    assert!(matches!(
        result,
        Err(SessionError::Simulation {
            source: SimulationError::InvalidArgument { .. }
        })
    ));

    let after = service.repository().blob(&id).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(service.results(&id).await.unwrap().elapsed_years, 1);
}

#[tokio::test]
async fn oversized_request_is_capped() {
    let mut config = LottosimConfig::default();
    config.service.max_years_per_request = 4;
    let service = SessionService::new(InMemoryRepository::new(), &config);
    let id = SessionId::new("cap");
    service.create(id.clone(), small_custom(1)).await.unwrap();

    let results = service.advance(&id, Some(1_000)).await.unwrap();
    assert_eq!(results.elapsed_years, 4);
}

#[tokio::test]
async fn invalid_guess_is_rejected_at_create() {
    let service = service();
    let mut request = small_custom(1);
    request.guess = GuessSource::Provided(GuessInput::Flat(vec![2, 2, 9]));

    let result = service.create(SessionId::new("bad"), request).await;
    assert!(matches!(
        result,
        Err(SessionError::Simulation {
            source: SimulationError::InvalidGuess { .. }
        })
    ));
    assert!(service.repository().is_empty().await);
}

#[tokio::test]
async fn zero_price_custom_lottery_is_rejected() {
    let service = service();
    let mut request = small_custom(1);
    if let LotterySource::Custom(custom) = &mut request.lottery {
        custom.guess_price = Decimal::ZERO;
    }

    let result = service.create(SessionId::new("free"), request).await;
    assert!(matches!(
        result,
        Err(SessionError::Simulation {
            source: SimulationError::InvalidDefinition { .. }
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_advances_on_one_id_are_serialized() {
    let service = Arc::new(service());
    let id = SessionId::new("shared");
    service.create(id.clone(), small_custom(99)).await.unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&service);
            let id = id.clone();
            tokio::spawn(async move { service.advance(&id, Some(1)).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let results = service.results(&id).await.unwrap();
    assert_eq!(results.elapsed_years, 16);
    assert_eq!(results.elapsed_rounds, 16 * 156);

    // Same counters as one uninterrupted run from the same seed.
    let mut local = create(small_custom(99)).unwrap();
    local.advance(16).unwrap();
    assert_eq!(results, local.snapshot());
    assert_eq!(verify_accounting(&local), AccountingResult::Balanced);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_sessions_advance_independently() {
    let service = Arc::new(service());
    let ids: Vec<SessionId> = (0..8).map(|n| SessionId::new(format!("s{n}"))).collect();
    for (seed, id) in (0_u64..).zip(&ids) {
        service.create(id.clone(), small_custom(seed)).await.unwrap();
    }

    let tasks: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.advance(&id, Some(2)).await })
        })
        .collect();
    for task in tasks {
        let results = task.await.unwrap().unwrap();
        assert_eq!(results.elapsed_years, 2);
    }

    assert_eq!(service.repository().len().await, 8);
}

#[tokio::test]
async fn generated_ids_are_unique_sessions() {
    let service = service();
    let first = SessionId::generate();
    let second = SessionId::generate();
    assert_ne!(first, second);

    service.create(first.clone(), small_custom(1)).await.unwrap();
    service.create(second.clone(), small_custom(2)).await.unwrap();
    assert!(service.delete(&first).await.unwrap());
    assert!(service.results(&second).await.is_ok());
}
