use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum LockError {
    #[error("timed out acquiring exclusive lock on {path}")]
    Timeout { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Exclusive, OS-level file lock scoped to the lifetime of the guard.
///
/// Backed by `flock`-style advisory locking, so separate handles contend
/// across processes and within one. Dropping the guard releases the lock;
/// the lock file itself is left in place.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block for up to `timeout` attempting to take the exclusive lock on
    /// `path`. The lock file and its parent directory are created if absent.
    pub async fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().read(true).write(true).create(true).open(path)?;
        let deadline = Instant::now() + timeout;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(Self { file, path: path.to_path_buf() });
                }
                Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
                    if Instant::now() >= deadline {
                        return Err(LockError::Timeout { path: path.to_path_buf() });
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(err) => return Err(LockError::Io(err)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_acquire_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("nested/deeper/state.lock");

        let lock = FileLock::acquire(&lock_path, Duration::from_millis(100)).await.unwrap();
        assert!(lock_path.exists());
        assert_eq!(lock.path(), lock_path);
    }

    #[tokio::test]
    async fn test_contended_lock_times_out() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("state.lock");

        let _held = FileLock::acquire(&lock_path, Duration::from_millis(100)).await.unwrap();

        let result = FileLock::acquire(&lock_path, Duration::from_millis(200)).await;
        assert!(matches!(result, Err(LockError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_released_lock_can_be_reacquired() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("state.lock");

        let held = FileLock::acquire(&lock_path, Duration::from_millis(100)).await.unwrap();
        drop(held);

        FileLock::acquire(&lock_path, Duration::from_millis(100)).await.unwrap();
    }

    #[tokio::test]
    async fn test_locks_on_different_paths_are_independent() {
        let dir = TempDir::new().unwrap();

        let _first = FileLock::acquire(&dir.path().join("a.lock"), Duration::from_millis(100))
            .await
            .unwrap();
        FileLock::acquire(&dir.path().join("b.lock"), Duration::from_millis(100)).await.unwrap();
    }
}
