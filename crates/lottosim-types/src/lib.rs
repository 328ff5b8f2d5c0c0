//! Shared type definitions for the Lottosim lottery simulator.
//!
//! Types defined here cross crate boundaries: the engine produces them, the
//! session layer stores and returns them, and `TypeScript` bindings are
//! generated from them via `ts-rs` for the results dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- The [`SessionId`] a simulation is stored under
//! - [`profile`] -- [`MatchProfile`], the key of every reward table
//! - [`results`] -- [`ResultsSnapshot`] and [`CreatedSession`] payloads

pub mod ids;
pub mod profile;
pub mod results;

// Re-export all public types at crate root for convenience.
pub use ids::SessionId;
pub use profile::{MatchProfile, ParseProfileError};
pub use results::{CreatedSession, ResultsSnapshot};
