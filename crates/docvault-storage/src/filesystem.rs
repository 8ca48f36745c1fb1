//! Local filesystem object store for development deployments.
//!
//! Objects are written to `{root}/{folder}/{id}.{ext}` and served by the API
//! under a public base URL. The relative path doubles as the remote id.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use docvault_core::{Error, ObjectStore, ResourceKind, Result, StoredObject, UploadObject};

/// Filesystem-backed object store.
pub struct FilesystemStore {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemStore {
    /// Create a store rooted at `root`, whose objects are reachable under
    /// `public_base_url`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a remote id to a path under the root, rejecting anything that
    /// could escape it.
    fn resolve(&self, remote_id: &str) -> Result<PathBuf> {
        let relative = Path::new(remote_id);
        let safe = !remote_id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(Error::Validation(format!(
                "invalid object path '{}'",
                remote_id
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Write, read back, and delete a probe file so misconfigured volumes
    /// fail at startup instead of on the first upload.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let probe_dir = self.root.join(".health-check");
        let probe = probe_dir.join("probe.bin");
        let data = b"storage-health-check";

        fs::create_dir_all(&probe_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", probe_dir, e))?;
        fs::write(&probe, data)
            .await
            .map_err(|e| format!("write({:?}): {}", probe, e))?;
        let read_back = fs::read(&probe)
            .await
            .map_err(|e| format!("read({:?}): {}", probe, e))?;
        if read_back != data {
            return Err("read-back mismatch".to_string());
        }
        fs::remove_file(&probe)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", probe, e))?;
        let _ = fs::remove_dir(&probe_dir).await;

        Ok(())
    }

    async fn write_atomic(&self, full_path: &Path, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, full_path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FilesystemStore {
    async fn upload(&self, data: &[u8], object: &UploadObject) -> Result<StoredObject> {
        let remote_id = format!(
            "{}/{}.{}",
            object.folder,
            object.desired_id,
            object.file_type.extension()
        );
        let full_path = self.resolve(&remote_id)?;

        debug!(
            subsystem = "storage",
            component = "filesystem",
            op = "upload",
            remote_id = %remote_id,
            size_bytes = data.len(),
            "Writing object"
        );

        self.write_atomic(&full_path, data).await.map_err(|e| {
            warn!(path = %full_path.display(), error = %e, "filesystem store: write failed");
            Error::Upload(format!("failed to write object: {}", e))
        })?;

        Ok(StoredObject {
            locator: self.delivery_url(&remote_id, object.kind),
            remote_id,
        })
    }

    async fn delete(&self, remote_id: &str, _kind: ResourceKind) -> Result<()> {
        let full_path = self.resolve(remote_id)?;
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }

    fn delivery_url(&self, remote_id: &str, _kind: ResourceKind) -> String {
        format!("{}/{}", self.public_base_url, remote_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::FileType;
    use tempfile::TempDir;

    fn object(id: &str) -> UploadObject {
        UploadObject {
            desired_id: id.to_string(),
            folder: "documents".to_string(),
            file_type: FileType::Png,
            kind: ResourceKind::Image,
        }
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_locator() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path(), "http://localhost:3000/files/");

        let stored = store.upload(b"png-bytes", &object("abc")).await.unwrap();

        assert_eq!(stored.remote_id, "documents/abc.png");
        assert_eq!(
            stored.locator,
            "http://localhost:3000/files/documents/abc.png"
        );
        let on_disk = std::fs::read(dir.path().join("documents/abc.png")).unwrap();
        assert_eq!(on_disk, b"png-bytes");
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_tolerates_missing() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path(), "http://localhost/files");
        let stored = store.upload(b"x", &object("gone")).await.unwrap();

        store
            .delete(&stored.remote_id, ResourceKind::Image)
            .await
            .unwrap();
        assert!(!dir.path().join("documents/gone.png").exists());

        // Second delete is a no-op
        store
            .delete(&stored.remote_id, ResourceKind::Image)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path(), "http://localhost/files");

        for bad in ["../etc/passwd", "/etc/passwd", "", "documents/../../x"] {
            let err = store.delete(bad, ResourceKind::Image).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_validate_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path(), "http://localhost/files");
        assert!(store.validate().await.is_ok());
        assert!(!dir.path().join(".health-check").exists());
    }
}
