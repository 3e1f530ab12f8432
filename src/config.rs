use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::models::{BalancingCoefficients, MatchingSettings};
use crate::services::{ArtifactStore, ProcessEngine};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Path to the matching engine executable
    pub program: PathBuf,
    /// Extra arguments placed before the five file paths
    #[serde(default)]
    pub args: Vec<String>,
    /// Where artifacts are created; the system temp dir when unset
    pub artifact_dir: Option<PathBuf>,
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,
}

fn default_artifact_prefix() -> String { "matching-".to_string() }

impl EngineSettings {
    pub fn process_engine(&self) -> ProcessEngine {
        ProcessEngine::new(&self.program).with_args(self.args.iter().cloned())
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(self.artifact_dir.clone(), self.artifact_prefix.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub balancing_coefficients: CoefficientsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoefficientsConfig {
    #[serde(default = "default_subject_matching")]
    pub subject_matching: f64,
    #[serde(default = "default_state")]
    pub state: f64,
    #[serde(default = "default_waiting_time")]
    pub waiting_time: f64,
    #[serde(default = "default_matching_priority")]
    pub matching_priority: f64,
}

impl Default for CoefficientsConfig {
    fn default() -> Self {
        Self {
            subject_matching: default_subject_matching(),
            state: default_state(),
            waiting_time: default_waiting_time(),
            matching_priority: default_matching_priority(),
        }
    }
}

fn default_subject_matching() -> f64 { BalancingCoefficients::default().subject_matching }
fn default_state() -> f64 { BalancingCoefficients::default().state }
fn default_waiting_time() -> f64 { BalancingCoefficients::default().waiting_time }
fn default_matching_priority() -> f64 { BalancingCoefficients::default().matching_priority }

impl MatchingConfig {
    pub fn settings(&self) -> MatchingSettings {
        let c = &self.balancing_coefficients;
        MatchingSettings {
            balancing_coefficients: BalancingCoefficients {
                subject_matching: c.subject_matching,
                state: c.state,
                waiting_time: c.waiting_time,
                matching_priority: c.matching_priority,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCHING_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCHING__ENGINE__PROGRAM -> engine.program
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MATCHING")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
