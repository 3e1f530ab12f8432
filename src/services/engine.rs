use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when invoking the matching engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid engine argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to start engine {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Engine exited abnormally ({}): {stderr}", describe_exit(.code))]
    Failed { code: Option<i32>, stderr: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// The five files of one engine run, in the engine's positional order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePaths {
    pub helpees: PathBuf,
    pub helpers: PathBuf,
    pub balancing_coefficients: PathBuf,
    pub matches_out: PathBuf,
    pub stats_out: PathBuf,
}

impl EnginePaths {
    pub fn inputs(&self) -> [&Path; 3] {
        [&self.helpees, &self.helpers, &self.balancing_coefficients]
    }

    pub fn outputs(&self) -> [&Path; 2] {
        [&self.matches_out, &self.stats_out]
    }

    /// All five paths as engine arguments
    pub fn args(&self) -> [&Path; 5] {
        [
            &self.helpees,
            &self.helpers,
            &self.balancing_coefficients,
            &self.matches_out,
            &self.stats_out,
        ]
    }

    /// Check what the engine itself requires of its arguments: inputs exist,
    /// outputs name a file inside an existing directory.
    pub fn validate(&self) -> Result<(), EngineError> {
        for input in self.inputs() {
            if !input.exists() {
                return Err(EngineError::InvalidArgument(format!(
                    "input file {} does not exist",
                    input.display()
                )));
            }
        }

        for output in self.outputs() {
            if output.file_name().is_none() {
                return Err(EngineError::InvalidArgument(format!(
                    "output {} is not a path to a file",
                    output.display()
                )));
            }
            let parent_exists = output
                .parent()
                .map(|p| p.as_os_str().is_empty() || p.is_dir())
                .unwrap_or(false);
            if !parent_exists {
                return Err(EngineError::InvalidArgument(format!(
                    "output folder for {} does not exist",
                    output.display()
                )));
            }
        }

        Ok(())
    }
}

/// Boundary to the external matching engine
///
/// An implementation reads the three input documents and writes the matches
/// and stats documents as a side effect. It must not interpret the outputs.
pub trait MatchingEngine: Send + Sync {
    fn invoke(&self, paths: &EnginePaths) -> Result<(), EngineError>;
}

impl<E: MatchingEngine + ?Sized> MatchingEngine for Arc<E> {
    fn invoke(&self, paths: &EnginePaths) -> Result<(), EngineError> {
        (**self).invoke(paths)
    }
}

/// Runs the engine as a blocking child process
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the five file paths
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn build_command(&self, paths: &EnginePaths) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(paths.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl MatchingEngine for ProcessEngine {
    fn invoke(&self, paths: &EnginePaths) -> Result<(), EngineError> {
        paths.validate()?;

        let mut cmd = self.build_command(paths);
        tracing::debug!("Running engine: {:?}", cmd);

        let output = cmd.output().map_err(|source| EngineError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        if !output.stdout.is_empty() {
            tracing::debug!("Engine stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            tracing::error!("Engine failed with {}: {}", output.status, stderr);
            return Err(EngineError::Failed {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &Path) -> EnginePaths {
        EnginePaths {
            helpees: dir.join("helpees.json"),
            helpers: dir.join("helpers.json"),
            balancing_coefficients: dir.join("coefficients.json"),
            matches_out: dir.join("matches.json"),
            stats_out: dir.join("stats.json"),
        }
    }

    fn touch_inputs(paths: &EnginePaths) {
        for input in paths.inputs() {
            std::fs::write(input, "[]").unwrap();
        }
    }

    #[test]
    fn test_args_follow_engine_order() {
        let paths = paths_in(Path::new("/tmp/run"));
        let args = paths.args();
        assert!(args[0].ends_with("helpees.json"));
        assert!(args[1].ends_with("helpers.json"));
        assert!(args[2].ends_with("coefficients.json"));
        assert!(args[3].ends_with("matches.json"));
        assert!(args[4].ends_with("stats.json"));
    }

    #[test]
    fn test_validate_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());

        let result = paths.validate();
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_missing_output_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = paths_in(dir.path());
        touch_inputs(&paths);
        paths.stats_out = dir.path().join("missing").join("stats.json");

        assert!(matches!(paths.validate(), Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        touch_inputs(&paths);

        let engine = ProcessEngine::new(dir.path().join("no-such-engine"));
        assert!(matches!(engine.invoke(&paths), Err(EngineError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        touch_inputs(&paths);

        let engine = ProcessEngine::new("sh").with_args(["-c", "echo boom >&2; exit 3", "engine"]);
        match engine.invoke(&paths) {
            Err(EngineError::Failed { code, stderr }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_receives_paths_positionally() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        touch_inputs(&paths);

        // $4 and $5 are the output paths
        let engine = ProcessEngine::new("sh")
            .with_args(["-c", "echo null > \"$4\"; echo '{}' > \"$5\"", "engine"]);
        engine.invoke(&paths).unwrap();

        assert_eq!(std::fs::read_to_string(&paths.matches_out).unwrap().trim(), "null");
        assert_eq!(std::fs::read_to_string(&paths.stats_out).unwrap().trim(), "{}");
    }
}
