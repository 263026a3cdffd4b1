//! Profile picture storage on the local file system.
//!
//! Each user owns at most one file, named `profile_{user_id}.jpg` under the
//! upload directory. Saving overwrites; deleting is best-effort.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::{PROFILE_PICTURE_EXTENSION, PROFILE_PICTURE_PREFIX};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage for uploaded profile pictures.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` as the picture of `user_id` and return the stored path.
    async fn save(&self, bytes: &[u8], user_id: i32) -> AppResult<String>;

    /// Remove a stored picture. Failures are logged, never returned.
    async fn delete(&self, path: &str);
}

/// File store rooted at a single upload directory
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deterministic location of a user's picture
    pub fn path_for(&self, user_id: i32) -> PathBuf {
        self.root.join(format!(
            "{}{}.{}",
            PROFILE_PICTURE_PREFIX, user_id, PROFILE_PICTURE_EXTENSION
        ))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, bytes: &[u8], user_id: i32) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.path_for(user_id);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(user_id, path = %path.display(), size = bytes.len(), "Profile picture saved");

        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, path: &str) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path, "Profile picture removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path, "Profile picture already absent")
            }
            Err(e) => tracing::warn!(path, error = %e, "Failed to remove profile picture"),
        }
    }
}
