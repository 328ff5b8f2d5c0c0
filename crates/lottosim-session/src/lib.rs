//! Session layer for the Lottosim lottery simulator.
//!
//! The engine knows nothing about storage or concurrency. This crate owns
//! both: a [`SimulationRepository`] keeps simulations between requests, and
//! [`SessionService`] serializes every read-modify-write on a session id so
//! concurrent requests never lose an update.
//!
//! # Modules
//!
//! - [`config`] -- Typed `lottosim-config.yaml` loading
//! - [`repository`] -- Storage trait and the in-memory store
//! - [`service`] -- Create / advance / results / delete
//! - [`error`] -- [`SessionError`]

pub mod config;
pub mod error;
pub mod repository;
pub mod service;

pub use config::{
    ConfigError, EngineConfig, LoggingConfig, LottosimConfig, RunnerConfig, ServiceConfig,
    SessionSpec,
};
pub use error::SessionError;
pub use repository::{InMemoryRepository, SimulationRepository};
pub use service::SessionService;
