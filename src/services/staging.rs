//! Ephemeral directories for uploaded files.
//!
//! `StagingArea` is the temp-directory provider: it creates uniquely named directories under a
//! configurable root. Each directory is owned by a `StagingDir` guard which removes it recursively
//! when dropped, so cleanup also happens when a handler errors or panics.
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

const DIR_PREFIX: &str = "autograder-upload-";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging directory under {}", root.display())]
    CreateDir {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write staged file {name:?}")]
    WriteFile {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid upload file name: {0:?}")]
    InvalidName(String),

    #[error("file {0:?} is already staged")]
    DuplicateName(String),
}

#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh, uniquely named directory under the root.
    ///
    /// The root itself is created if missing; a root that exists but is not a directory fails.
    pub fn create_dir(&self) -> Result<StagingDir, StagingError> {
        let create = || -> io::Result<TempDir> {
            std::fs::create_dir_all(&self.root)?;
            tempfile::Builder::new()
                .prefix(DIR_PREFIX)
                .tempdir_in(&self.root)
        };

        let dir = create().map_err(|source| StagingError::CreateDir {
            root: self.root.clone(),
            source,
        })?;

        tracing::debug!(path = %dir.path().display(), "created staging directory");
        Ok(StagingDir { dir })
    }
}

/// A staging directory that is removed when dropped.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
}

impl StagingDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write one uploaded file and return the name it was stored under.
    ///
    /// Only the final path component of `name` is used, so a client cannot escape the directory.
    /// An already staged file is never overwritten.
    pub async fn write_file(&self, name: &str, contents: &[u8]) -> Result<String, StagingError> {
        let file_name = sanitize_file_name(name)?;
        let path = self.dir.path().join(&file_name);

        let write_error = |source: io::Error| match source.kind() {
            io::ErrorKind::AlreadyExists => StagingError::DuplicateName(file_name.clone()),
            _ => StagingError::WriteFile {
                name: file_name.clone(),
                source,
            },
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(write_error)?;
        file.write_all(contents).await.map_err(write_error)?;
        file.flush().await.map_err(write_error)?;

        Ok(file_name)
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        // TempDir removes the tree itself; this only leaves a trace in the logs.
        tracing::debug!(path = %self.dir.path().display(), "removing staging directory");
    }
}

/// The name an upload is stored under: its final path component.
pub fn sanitize_file_name(name: &str) -> Result<String, StagingError> {
    Path::new(name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| StagingError::InvalidName(name.to_string()))
}
