use std::fmt;
use std::time::Instant;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::core::{
    decode::{decode_matches, decode_stats},
    encode::encode_request,
};
use crate::models::{Helpee, Helper, Match, MatchesOutput, MatchingSettings, Stats, StatsOutput};
use crate::services::{
    Artifact, ArtifactError, ArtifactStore, EngineError, EnginePaths, MatchingEngine,
    ProcessEngine,
};

/// Errors that abort a matching run
///
/// A missing or `null` engine output is not an error; it resolves to the
/// empty defaults of [`decode_matches`] and [`decode_stats`].
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Failed to encode engine input: {0}")]
    Serialization(#[source] ArtifactError),

    #[error("Artifact error: {0}")]
    Artifact(#[source] ArtifactError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Failed to decode engine output: {0}")]
    Decode(#[source] ArtifactError),
}

impl From<ArtifactError> for MatchingError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Serialization(_) => MatchingError::Serialization(err),
            ArtifactError::Decode { .. } => MatchingError::Decode(err),
            ArtifactError::Io { .. } => MatchingError::Artifact(err),
        }
    }
}

/// Result of the matching process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub matches: Vec<Match>,
    pub stats: Stats,
}

/// Stages of one run, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Writing,
    Invoking,
    Reading,
    CleaningUp,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Writing => "writing",
            Phase::Invoking => "invoking",
            Phase::Reading => "reading",
            Phase::CleaningUp => "cleaning up",
        };
        f.write_str(name)
    }
}

/// The five artifacts owned by one run
struct RunArtifacts {
    helpees: Artifact,
    helpers: Artifact,
    balancing_coefficients: Artifact,
    matches: Artifact,
    stats: Artifact,
}

impl RunArtifacts {
    fn paths(&self) -> EnginePaths {
        EnginePaths {
            helpees: self.helpees.path().to_path_buf(),
            helpers: self.helpers.path().to_path_buf(),
            balancing_coefficients: self.balancing_coefficients.path().to_path_buf(),
            matches_out: self.matches.path().to_path_buf(),
            stats_out: self.stats.path().to_path_buf(),
        }
    }

    fn into_vec(self) -> Vec<Artifact> {
        vec![
            self.helpees,
            self.helpers,
            self.balancing_coefficients,
            self.matches,
            self.stats,
        ]
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Encode helpers, helpees and coefficients and write them to artifacts
/// 2. Invoke the engine on the five artifact paths
/// 3. Read and decode the matches and stats artifacts
/// 4. Delete all artifacts, whether or not an earlier stage failed
///
/// Every artifact is owned by exactly one run. If a stage fails before
/// cleanup, dropping the remaining handles removes their files.
#[derive(Debug, Clone)]
pub struct Matcher<E = ProcessEngine> {
    engine: E,
    store: ArtifactStore,
    defaults: MatchingSettings,
}

impl<E: MatchingEngine> Matcher<E> {
    pub fn new(engine: E, store: ArtifactStore) -> Self {
        Self {
            engine,
            store,
            defaults: MatchingSettings::default(),
        }
    }

    /// Replace the settings used by [`Matcher::match_with_defaults`]
    pub fn with_default_settings(mut self, settings: MatchingSettings) -> Self {
        self.defaults = settings;
        self
    }

    pub fn default_settings(&self) -> &MatchingSettings {
        &self.defaults
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn match_with_defaults(
        &self,
        helpers: &[Helper],
        helpees: &[Helpee],
    ) -> Result<MatchingResult, MatchingError> {
        self.match_persons(helpers, helpees, &self.defaults)
    }

    /// Run one blocking matching batch through the engine
    ///
    /// Output is all-or-nothing: on error no partial matches are returned.
    pub fn match_persons(
        &self,
        helpers: &[Helper],
        helpees: &[Helpee],
        settings: &MatchingSettings,
    ) -> Result<MatchingResult, MatchingError> {
        tracing::info!(
            "Matching {} helpers with {} helpees",
            helpers.len(),
            helpees.len()
        );

        let started = Instant::now();
        tracing::debug!("Matching phase: {}", Phase::Writing);
        let artifacts = self.write_inputs(helpers, helpees, settings)?;
        let pre_matching = started.elapsed();

        tracing::debug!("Matching phase: {}", Phase::Invoking);
        let invoked = Instant::now();
        let outcome = self
            .engine
            .invoke(&artifacts.paths())
            .map_err(MatchingError::from)
            .and_then(|()| {
                tracing::debug!("Matching phase: {}", Phase::Reading);
                self.read_outputs(&artifacts)
            });
        let engine_time = invoked.elapsed();

        tracing::debug!("Matching phase: {}", Phase::CleaningUp);
        let post_started = Instant::now();
        let cleanup = self.store.delete(artifacts.into_vec());

        let result = match (outcome, cleanup) {
            (Ok(result), Ok(())) => result,
            (Ok(_), Err(e)) => return Err(e.into()),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(cleanup_err)) => {
                tracing::warn!("Artifact cleanup failed after matching error: {}", cleanup_err);
                return Err(e);
            }
        };

        tracing::info!(
            "Matching done: {} matches (pre-matching {:?}, engine {:?}, post-matching {:?})",
            result.matches.len(),
            pre_matching,
            engine_time,
            post_started.elapsed()
        );
        tracing::debug!("Matching stats: {:?}", result.stats);

        Ok(result)
    }

    fn write_inputs(
        &self,
        helpers: &[Helper],
        helpees: &[Helpee],
        settings: &MatchingSettings,
    ) -> Result<RunArtifacts, MatchingError> {
        let input = encode_request(helpers, helpees, settings);

        // Handles created before a failing step are dropped, which removes them.
        Ok(RunArtifacts {
            helpees: self.store.create_with(&input.helpees)?,
            helpers: self.store.create_with(&input.helpers)?,
            balancing_coefficients: self.store.create_with(&input.balancing_coefficients)?,
            matches: self.store.create()?,
            stats: self.store.create()?,
        })
    }

    fn read_outputs(&self, artifacts: &RunArtifacts) -> Result<MatchingResult, MatchingError> {
        let matches: Option<MatchesOutput> = self.store.read(&artifacts.matches)?;
        let stats: Option<StatsOutput> = self.store.read(&artifacts.stats)?;

        if matches.is_none() {
            tracing::debug!("Engine reported no matches document, using empty list");
        }

        Ok(MatchingResult {
            matches: decode_matches(matches),
            stats: decode_stats(stats),
        })
    }
}

impl Matcher<ProcessEngine> {
    /// Matcher that spawns `program` and keeps artifacts in the system temp dir
    pub fn with_program(program: impl Into<std::path::PathBuf>) -> Self {
        Self::new(ProcessEngine::new(program), ArtifactStore::default())
    }
}
