// Service exports
pub mod artifacts;
pub mod engine;

pub use artifacts::{Artifact, ArtifactError, ArtifactStore};
pub use engine::{EngineError, EnginePaths, MatchingEngine, ProcessEngine};
