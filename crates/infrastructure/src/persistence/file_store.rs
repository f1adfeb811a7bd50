//! Directory-backed key-value store.
//!
//! Each key is stored in its own `<encoded-key>.json` file. Keys are
//! form-urlencoded so that any identity maps to a single flat file name.
//! Every write stages into its own temporary file in the same directory and
//! is renamed over the entry, so concurrent writers never share a staging
//! file and the last rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rdpgate_application::{KeyValueStore, StoreError};
use tempfile::NamedTempFile;
use tokio::fs;
use url::form_urlencoded;

/// Key-value store persisting one file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `directory`. The directory is created on first write.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the file path holding `key`.
    fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        self.directory.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.entry_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        fs::create_dir_all(&self.directory).await?;

        let directory = self.directory.clone();
        let path = self.entry_path(key);
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut staging = NamedTempFile::new_in(&directory)?;
            staging.write_all(value.as_bytes())?;
            staging.as_file().sync_all()?;
            staging.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("cache write task failed: {e}")))??;

        tracing::debug!(path = %path.display(), "cache entry written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_entry_path_is_flat() {
        let store = FileStore::new("/cache");
        assert_eq!(
            store.entry_path("team/alice@example.com"),
            PathBuf::from("/cache/team%2Falice%40example.com.json")
        );
    }

    #[tokio::test]
    async fn test_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("not-yet-created"));
        assert_eq!(store.get("alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("cache"));

        store.set("alice", "first".to_string()).await.unwrap();
        store.set("alice", "second".to_string()).await.unwrap();

        assert_eq!(store.get("alice").await.unwrap().as_deref(), Some("second"));
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("cache"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("alice.json")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_one_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("cache"));

        let values: Vec<String> = (0..16u8)
            .map(|i| char::from(b'a' + i).to_string().repeat(512 * 1024))
            .collect();
        let tasks: Vec<_> = values
            .iter()
            .cloned()
            .map(|value| {
                let store = store.clone();
                tokio::spawn(async move { store.set("alice", value).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = store.get("alice").await.unwrap().unwrap();
        assert!(values.contains(&stored));
        assert_eq!(std::fs::read_dir(dir.path().join("cache")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set("alice", "a".to_string()).await.unwrap();
        store.set("bob", "b".to_string()).await.unwrap();

        assert_eq!(store.get("alice").await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("bob").await.unwrap().as_deref(), Some("b"));
    }
}
