//! A course store that just exists on disk as flat JSON files.
//!
//! Layout:
//! ```text
//! <root>/<course-id>/course.json   course config (assignments, LMS link)
//! <root>/<course-id>/users.json    roster: email -> user
//! ```
//!
//! Meant for tests and small deployments. A single read/write lock guards the whole tree.
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use crate::model::{Course, User, normalize_email};
use crate::repos::course_store::CourseStore;
use crate::repos::error::{RepoError, RepoResult};

const COURSE_FILENAME: &str = "course.json";
const USERS_FILENAME: &str = "users.json";

#[derive(Debug)]
pub struct DiskCourseStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl DiskCourseStore {
    pub async fn open(root: impl Into<PathBuf>) -> RepoResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| RepoError::Io {
                path: root.clone(),
                source,
            })?;

        tracing::debug!(root = %root.display(), "opened disk course store");

        Ok(Self {
            root,
            lock: RwLock::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn course_dir(&self, course_id: &str) -> RepoResult<PathBuf> {
        if !is_valid_id(course_id) {
            return Err(RepoError::InvalidId(course_id.to_string()));
        }
        Ok(self.root.join(course_id))
    }
}

#[async_trait]
impl CourseStore for DiskCourseStore {
    fn backend_name(&self) -> &'static str {
        "disk"
    }

    async fn get_course(&self, course_id: &str) -> RepoResult<Option<Course>> {
        // An id that could never have been stored is just an unknown course.
        if !is_valid_id(course_id) {
            return Ok(None);
        }
        let path = self.course_dir(course_id)?.join(COURSE_FILENAME);

        let _guard = self.lock.read().await;
        let course: Option<Course> = read_json(&path).await?;

        // The directory name is the course id; a stale id inside course.json never wins.
        Ok(course.map(|mut c| {
            if c.id != course_id {
                if !c.id.is_empty() {
                    tracing::warn!(
                        course = course_id,
                        stored_id = %c.id,
                        "course.json id does not match its directory"
                    );
                }
                c.id = course_id.to_string();
            }
            c
        }))
    }

    async fn get_users(&self, course_id: &str) -> RepoResult<HashMap<String, User>> {
        let path = self.course_dir(course_id)?.join(USERS_FILENAME);

        let _guard = self.lock.read().await;
        let stored: HashMap<String, User> = read_json(&path).await?.unwrap_or_default();

        let users = stored
            .into_iter()
            .map(|(key, mut user)| {
                if user.email.is_empty() {
                    user.email = key;
                }
                user.email = normalize_email(&user.email);
                (user.email.clone(), user)
            })
            .collect();

        Ok(users)
    }

    async fn save_course(&self, course: &Course) -> RepoResult<()> {
        let path = self.course_dir(&course.id)?.join(COURSE_FILENAME);

        let _guard = self.lock.write().await;
        write_json(&path, course).await
    }

    async fn save_users(&self, course_id: &str, users: &HashMap<String, User>) -> RepoResult<()> {
        let path = self.course_dir(course_id)?.join(USERS_FILENAME);

        let _guard = self.lock.write().await;
        write_json(&path, users).await
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> RepoResult<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| RepoError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> RepoResult<()> {
    let io_err = |source: io::Error| RepoError::Io {
        path: path.to_path_buf(),
        source,
    };

    let bytes = serde_json::to_vec_pretty(value).map_err(|source| RepoError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    // Write then rename so readers never see a half-written file.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

    Ok(())
}
