//! Helper Match - bridge between tutoring domain data and the external matching engine
//!
//! Helpers and helpees are encoded into the engine's JSON input documents,
//! handed to the engine through temporary files, and the engine's matches and
//! stats documents are decoded back into domain types.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchingError, MatchingResult};
pub use models::{BalancingCoefficients, Helpee, Helper, Match, MatchingSettings, PersonId, Stats};
pub use services::{ArtifactStore, EngineError, EnginePaths, MatchingEngine, ProcessEngine};
