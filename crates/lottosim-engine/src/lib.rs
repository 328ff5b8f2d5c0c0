//! Lottery definitions, draws, and the resumable simulation engine.
//!
//! The engine is synchronous and free of I/O. A caller builds a
//! [`Simulation`] with [`create`], advances it by whole simulated years,
//! reads a [`ResultsSnapshot`], and stores it between calls with
//! [`codec::encode`] / [`codec::decode`]. Each simulation owns its random
//! stream, so distinct simulations never share state.
//!
//! # Modules
//!
//! - [`definition`] -- [`LotteryDefinition`] factory and validator
//! - [`catalog`] -- Built-in named lotteries
//! - [`guess`] -- Guess generation and validation
//! - [`stream`] -- The serializable [`RandomStream`]
//! - [`draw`] -- Per-round draws
//! - [`scoring`] -- Match profiles and payouts
//! - [`simulation`] -- The [`Simulation`] state machine
//! - [`accounting`] -- Verification of the spend/win laws
//! - [`codec`] -- Versioned serialization
//! - [`error`] -- [`SimulationError`]
//!
//! # Usage
//!
//! ```
//! use lottosim_engine::{GuessSource, LotterySource, SimulationRequest, create};
//!
//! let mut sim = create(SimulationRequest {
//!     lottery: LotterySource::Named("lotto".to_owned()),
//!     guess: GuessSource::Generate,
//!     rounds_per_week: None,
//!     seed: Some(7),
//! })
//! .ok();
//!
//! if let Some(sim) = sim.as_mut() {
//!     sim.advance(10).ok();
//!     let results = sim.snapshot();
//!     assert_eq!(results.elapsed_years, 10);
//!     assert_eq!(results.elapsed_rounds, 10 * 52 * 3);
//! }
//! ```
//!
//! [`ResultsSnapshot`]: lottosim_types::ResultsSnapshot

pub mod accounting;
pub mod catalog;
pub mod codec;
pub mod definition;
pub mod draw;
pub mod error;
pub mod guess;
pub mod scoring;
pub mod simulation;
pub mod stream;

// Re-export primary types at crate root.
pub use accounting::{AccountingImbalance, AccountingResult, verify_accounting};
pub use codec::CodecError;
pub use definition::{
    CustomLottery, DefinitionError, Domain, LotteryDefinition, MAX_DOMAIN_SIZE, MAX_MONEY_SCALE,
    MAX_PICK_COUNT, Pool,
};
pub use error::SimulationError;
pub use guess::{Guess, GuessError, GuessInput};
pub use simulation::{
    AdvanceReport, DEFAULT_ROUNDS_PER_WEEK, GuessSource, LotterySource, MAX_ROUNDS_PER_WEEK,
    Simulation, SimulationRequest, WEEKS_PER_YEAR, create,
};
pub use stream::RandomStream;
