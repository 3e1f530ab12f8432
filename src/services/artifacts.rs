use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;

/// Errors that can occur with artifact operations
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Malformed artifact {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Handle to one temporary JSON document
///
/// The backing file is removed when the handle is passed to
/// [`ArtifactStore::delete`], or at the latest when the handle is dropped.
#[derive(Debug)]
pub struct Artifact {
    path: TempPath,
}

impl Artifact {
    /// Stable path, suitable for handing to an external process
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Allocator for the temporary documents used to talk to the engine
///
/// Names get a random suffix and are created exclusively, so concurrent
/// pipelines never share a file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: Option<PathBuf>,
    prefix: String,
}

impl ArtifactStore {
    /// Create a store that places artifacts in `dir` (system temp dir when `None`)
    pub fn new(dir: Option<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir,
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Allocate a new, empty artifact
    pub fn create(&self) -> Result<Artifact, ArtifactError> {
        let dir = self.dir();
        let file = tempfile::Builder::new()
            .prefix(&self.prefix)
            .suffix(".json")
            .tempfile_in(&dir)
            .map_err(|source| ArtifactError::Io { path: dir, source })?;

        let artifact = Artifact {
            path: file.into_temp_path(),
        };
        tracing::trace!("Artifact created: {}", artifact.path().display());
        Ok(artifact)
    }

    /// Allocate an artifact and fill it with `document`
    pub fn create_with<T>(&self, document: &T) -> Result<Artifact, ArtifactError>
    where
        T: Serialize + ?Sized,
    {
        let artifact = self.create()?;
        self.write(&artifact, document)?;
        Ok(artifact)
    }

    /// Serialize `document` into the artifact, replacing prior contents
    pub fn write<T>(&self, artifact: &Artifact, document: &T) -> Result<(), ArtifactError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_vec(document).map_err(ArtifactError::Serialization)?;
        fs::write(artifact.path(), json).map_err(|source| ArtifactError::Io {
            path: artifact.path().to_path_buf(),
            source,
        })?;

        tracing::trace!("Artifact written: {}", artifact.path().display());
        Ok(())
    }

    /// Parse the artifact's current contents
    ///
    /// Returns `Ok(None)` when the document is absent: the file is missing,
    /// empty, or holds literal `null`.
    pub fn read<T>(&self, artifact: &Artifact) -> Result<Option<T>, ArtifactError>
    where
        T: DeserializeOwned,
    {
        let path = artifact.path();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Artifact missing on read: {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(ArtifactError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<T>>(&bytes).map_err(|source| ArtifactError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Remove every given artifact
    ///
    /// Files that are already gone are skipped. All artifacts are attempted;
    /// the first failure is returned.
    pub fn delete<I>(&self, artifacts: I) -> Result<(), ArtifactError>
    where
        I: IntoIterator<Item = Artifact>,
    {
        let mut first_error = None;

        for artifact in artifacts {
            let path = artifact.path().to_path_buf();
            match artifact.path.close() {
                Ok(()) => tracing::trace!("Artifact deleted: {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::trace!("Artifact already removed: {}", path.display());
                }
                Err(source) => {
                    tracing::warn!("Failed to delete artifact {}: {}", path.display(), source);
                    first_error.get_or_insert(ArtifactError::Io { path, source });
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(None, "matching-")
    }
}
