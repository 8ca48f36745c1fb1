//! In-memory object store for tests.
//!
//! Records every call so tests can assert how many remote operations a
//! coordinator made, and can be configured to fail uploads or deletes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docvault_core::{Error, ObjectStore, ResourceKind, Result, StoredObject, UploadObject};

/// A recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Upload {
        desired_id: String,
        folder: String,
        size: usize,
    },
    Delete {
        remote_id: String,
        kind: ResourceKind,
    },
}

#[derive(Default)]
struct MockState {
    objects: HashMap<String, Vec<u8>>,
    calls: Vec<MockCall>,
    fail_uploads: bool,
    fail_deletes: bool,
}

/// Mock object store backed by a shared map.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect the other.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    state: Arc<Mutex<MockState>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload fails with an upload error.
    pub fn failing_uploads() -> Self {
        let store = Self::new();
        store.set_fail_uploads(true);
        store
    }

    /// Every delete fails with a request error.
    pub fn failing_deletes() -> Self {
        let store = Self::new();
        store.set_fail_deletes(true);
        store
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.lock().fail_uploads = fail;
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn upload_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, MockCall::Upload { .. }))
            .count()
    }

    pub fn delete_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, MockCall::Delete { .. }))
            .count()
    }

    /// Whether an object with this remote id is currently stored.
    pub fn contains(&self, remote_id: &str) -> bool {
        self.lock().objects.contains_key(remote_id)
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(&self, data: &[u8], object: &UploadObject) -> Result<StoredObject> {
        let mut state = self.lock();
        state.calls.push(MockCall::Upload {
            desired_id: object.desired_id.clone(),
            folder: object.folder.clone(),
            size: data.len(),
        });
        if state.fail_uploads {
            return Err(Error::Upload("mock upload failure".to_string()));
        }

        let remote_id = format!("{}/{}", object.folder, object.desired_id);
        state.objects.insert(remote_id.clone(), data.to_vec());
        Ok(StoredObject {
            locator: format!("mock://{}/{}", object.kind, remote_id),
            remote_id,
        })
    }

    async fn delete(&self, remote_id: &str, kind: ResourceKind) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(MockCall::Delete {
            remote_id: remote_id.to_string(),
            kind,
        });
        if state.fail_deletes {
            return Err(Error::Request("mock delete failure".to_string()));
        }
        state.objects.remove(remote_id);
        Ok(())
    }

    fn delivery_url(&self, remote_id: &str, kind: ResourceKind) -> String {
        format!("mock://{}/{}", kind, remote_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::FileType;

    fn object() -> UploadObject {
        UploadObject {
            desired_id: "id-1".to_string(),
            folder: "documents".to_string(),
            file_type: FileType::Pdf,
            kind: ResourceKind::Image,
        }
    }

    #[tokio::test]
    async fn test_records_calls_and_shares_state() {
        let store = MockObjectStore::new();
        let handle = store.clone();

        let stored = store.upload(b"abc", &object()).await.unwrap();
        assert!(handle.contains(&stored.remote_id));

        store
            .delete(&stored.remote_id, ResourceKind::Image)
            .await
            .unwrap();
        assert_eq!(handle.upload_count(), 1);
        assert_eq!(handle.delete_count(), 1);
        assert_eq!(handle.object_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let store = MockObjectStore::failing_uploads();
        assert!(matches!(
            store.upload(b"abc", &object()).await,
            Err(Error::Upload(_))
        ));
        assert_eq!(store.object_count(), 0);

        let store = MockObjectStore::failing_deletes();
        assert!(store.delete("x", ResourceKind::Image).await.is_err());
        assert_eq!(store.delete_count(), 1);
    }
}
