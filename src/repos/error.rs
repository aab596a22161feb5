/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt data in {}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid id: {0:?}")]
    InvalidId(String),
}
