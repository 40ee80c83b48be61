//! File-system access for the edit tool.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// What the edit tool needs from a file system.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read a file as UTF-8. `Ok(None)` if it does not exist.
    async fn read_to_string(&self, path: &str) -> io::Result<Option<String>>;
    /// Write a file, creating parent directories as needed.
    async fn write(&self, path: &str, content: &str) -> io::Result<()>;
}

/// The local disk, via `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_to_string(&self, path: &str) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, path: &str, content: &str) -> io::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, content).await
    }
}

/// In-memory file system. Useful for tests and for editing buffers that
/// never touch disk.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<String, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_to_string(&self, path: &str) -> io::Result<Option<String>> {
        Ok(self.get(path))
    }

    async fn write(&self, path: &str, content: &str) -> io::Result<()> {
        self.insert(path, content);
        Ok(())
    }
}

/// Per-path async locks, so read-resolve-write on one file is never
/// interleaved with another edit of the same file.
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `path`. Released when the guard drops.
    pub async fn lock(&self, path: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // unheld entries are only referenced by the map
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(path.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of paths currently locked or awaited.
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|l| Arc::strong_count(l) > 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn local_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.txt");
        let read = LocalFileSystem
            .read_to_string(path.to_str().unwrap())
            .await
            .unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn local_write_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("deep/nested/file.txt");
        let path = path.to_str().unwrap();
        LocalFileSystem.write(path, "hi").await.unwrap();
        assert_eq!(
            LocalFileSystem.read_to_string(path).await.unwrap().as_deref(),
            Some("hi")
        );
    }

    #[tokio::test]
    async fn memory_round_trip() {
        let fs = MemoryFileSystem::new().with_file("/a", "one");
        assert_eq!(fs.read_to_string("/a").await.unwrap().as_deref(), Some("one"));
        fs.write("/a", "two").await.unwrap();
        assert_eq!(fs.get("/a").as_deref(), Some("two"));
        assert!(fs.read_to_string("/b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn path_lock_released_on_drop() {
        let locks = PathLocks::new();
        let guard = locks.lock("/a").await;
        assert_eq!(locks.active(), 1);
        drop(guard);
        assert_eq!(locks.active(), 0);
        let _again = locks.lock("/a").await;
    }

    #[tokio::test]
    async fn different_paths_do_not_block() {
        let locks = PathLocks::new();
        let _a = locks.lock("/a").await;
        let _b = locks.lock("/b").await;
        assert_eq!(locks.active(), 2);
    }
}
