//! Artifact storage.
//!
//! Screenshots and reports are opaque bytes under a relative, `/`-separated key.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

use crate::error::StoreError;

/// Key to bytes sink for run artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `bytes` under `key`, replacing any previous value. Returns the
    /// artifact's location as it should appear in reports.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StoreError>;

    /// Read an artifact back.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Location an artifact has, or would have, under `key`.
    fn location(&self, key: &str) -> String;
}

/// Reject keys that would escape the store root.
fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("empty key".to_string()));
    }
    let path = Path::new(key);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// In-memory artifact store for testing.
#[derive(Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.artifacts.read().keys().cloned().collect()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StoreError> {
        validate_key(key)?;
        self.artifacts.write().insert(key.to_string(), bytes.to_vec());
        Ok(self.location(key))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.artifacts.read().get(key).cloned())
    }

    fn location(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}

/// File system artifact store rooted at a directory.
///
/// ```text
/// {root}/
/// ├── root.png
/// └── dt=20250314/
///     └── ui_health_report.json
/// ```
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// The root directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StoreError> {
        validate_key(key)?;
        let path = self.path_for(key);
        let parent = path.parent().unwrap_or(&self.root).to_path_buf();
        fs::create_dir_all(&parent).await?;

        // Each writer gets its own temp file next to the target; readers never
        // observe a half-written artifact.
        let target = path.clone();
        let data = bytes.to_vec();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&parent)?;
            tmp.write_all(&data)?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;

        debug!("Stored {} bytes at {:?}", bytes.len(), path);
        Ok(path.display().to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_store_put_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path().join("artifacts"));

        let location = store.put("dt=20250314/report.json", b"{}").await.unwrap();
        assert!(location.ends_with("report.json"));
        assert!(temp_dir.path().join("artifacts/dt=20250314/report.json").exists());

        let bytes = store.get("dt=20250314/report.json").await.unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn test_fs_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path());

        store.put("root.png", b"first").await.unwrap();
        store.put("root.png", b"second").await.unwrap();

        let bytes = store.get("root.png").await.unwrap().unwrap();
        assert_eq!(bytes, b"second");
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1, "no temp files left behind");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_to_same_key() {
        let temp_dir = TempDir::new().unwrap();
        let key = "dt=20250314/ui_health_report.json";

        let mut handles = Vec::new();
        for writer in 0..32u8 {
            let root = temp_dir.path().to_path_buf();
            handles.push(tokio::spawn(async move {
                let store = FsArtifactStore::new(root);
                store.put(key, &vec![writer; 200 * 1024]).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let store = FsArtifactStore::new(temp_dir.path());
        let bytes = store.get(key).await.unwrap().unwrap();
        assert_eq!(bytes.len(), 200 * 1024);
        assert!(bytes.iter().all(|b| *b == bytes[0]), "content from a single writer");

        let entries = std::fs::read_dir(temp_dir.path().join("dt=20250314")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_same_stem_keys_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path());

        let (png, json) = tokio::join!(store.put("x.png", b"png"), store.put("x.json", b"json"));
        png.unwrap();
        json.unwrap();
        assert_eq!(store.get("x.png").await.unwrap().unwrap(), b"png");
        assert_eq!(store.get("x.json").await.unwrap().unwrap(), b"json");
    }

    #[tokio::test]
    async fn test_fs_store_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path());
        assert!(store.get("nope.png").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path());

        for key in ["../evil.png", "/etc/passwd", "a/../../b", ""] {
            let result = store.put(key, b"x").await;
            assert!(matches!(result, Err(StoreError::InvalidKey(_))), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryArtifactStore::new();
        let location = store.put("b.png", b"1").await.unwrap();
        store.put("a.png", b"2").await.unwrap();

        assert_eq!(location, "memory://b.png");
        assert_eq!(store.keys(), vec!["a.png", "b.png"]);
        assert_eq!(store.get("a.png").await.unwrap(), Some(b"2".to_vec()));
    }
}
