//! In-memory catalog for service and router tests.
//!
//! Implements both [`DocumentCatalog`] and [`CommentRepository`] over one
//! shared state so document deletes cascade to comments, matching the
//! PostgreSQL schema. Failure knobs let tests drive the coordinator's
//! error paths without a database.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use docvault_core::{
    new_v7, Comment, CommentRepository, Document, DocumentCatalog, Error, NewComment, NewDocument,
    Result,
};

/// How `insert` should fail, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertFailure {
    #[default]
    None,
    /// Title constraint violation, as if another request won the race.
    Conflict,
    /// Connection or commit failure.
    Unavailable,
}

#[derive(Default)]
struct MemoryState {
    documents: Vec<Document>,
    comments: Vec<Comment>,
    insert_failure: InsertFailure,
    blind_title_check: bool,
    insert_attempts: usize,
    clock_offset: i64,
}

/// Shared in-memory catalog. Clones see the same rows.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail the given way.
    pub fn fail_inserts(&self, failure: InsertFailure) {
        self.lock().insert_failure = failure;
    }

    /// Make `exists_by_title` always report `false`, so a duplicate title
    /// slips past the pre-check and is caught by the insert instead.
    pub fn blind_title_check(&self) {
        self.lock().blind_title_check = true;
    }

    /// Number of insert calls, successful or not.
    pub fn insert_attempts(&self) -> usize {
        self.lock().insert_attempts
    }

    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MemoryState {
    /// Strictly increasing timestamps so newest-first ordering is stable
    /// even when rows are created within the same clock tick.
    fn next_timestamp(&mut self) -> chrono::DateTime<Utc> {
        self.clock_offset += 1;
        Utc::now() + Duration::microseconds(self.clock_offset)
    }
}

fn page<T: Clone>(rows: &[T], offset: i64, limit: i64) -> Vec<T> {
    rows.iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl DocumentCatalog for MemoryCatalog {
    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        let state = self.lock();
        if state.blind_title_check {
            return Ok(false);
        }
        Ok(state.documents.iter().any(|d| d.title == title))
    }

    async fn insert(&self, doc: NewDocument) -> Result<Document> {
        let mut state = self.lock();
        state.insert_attempts += 1;

        match state.insert_failure {
            InsertFailure::Conflict => {
                return Err(Error::Conflict("title already exists".to_string()))
            }
            InsertFailure::Unavailable => {
                return Err(Error::Database(sqlx::Error::PoolTimedOut));
            }
            InsertFailure::None => {}
        }
        if state.documents.iter().any(|d| d.title == doc.title) {
            return Err(Error::Conflict("title already exists".to_string()));
        }

        let document = Document {
            id: new_v7(),
            title: doc.title,
            description: doc.description,
            file_path: doc.file_path,
            remote_id: doc.remote_id,
            file_type: doc.file_type,
            created_at: state.next_timestamp(),
        };
        state.documents.push(document.clone());
        Ok(document)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        Ok(self.lock().documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Document>, i64)> {
        let state = self.lock();
        let mut rows = state.documents.clone();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok((page(&rows, offset, limit), rows.len() as i64))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.lock();
        let before = state.documents.len();
        state.documents.retain(|d| d.id != id);
        let removed = state.documents.len() < before;
        if removed {
            state.comments.retain(|c| c.document_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CommentRepository for MemoryCatalog {
    async fn insert(&self, comment: NewComment) -> Result<Comment> {
        let mut state = self.lock();
        if !state.documents.iter().any(|d| d.id == comment.document_id) {
            return Err(Error::NotFound(format!(
                "document {} not found",
                comment.document_id
            )));
        }

        let comment = Comment {
            id: new_v7(),
            document_id: comment.document_id,
            content: comment.content,
            created_at: state.next_timestamp(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get(&self, document_id: Uuid, comment_id: Uuid) -> Result<Option<Comment>> {
        Ok(self
            .lock()
            .comments
            .iter()
            .find(|c| c.id == comment_id && c.document_id == document_id)
            .cloned())
    }

    async fn list(
        &self,
        document_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, i64)> {
        let state = self.lock();
        let mut rows: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.document_id == document_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok((page(&rows, offset, limit), rows.len() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::FileType;

    fn new_doc(title: &str) -> NewDocument {
        NewDocument {
            title: title.to_string(),
            description: None,
            file_path: format!("mock://{title}"),
            remote_id: format!("documents/{title}"),
            file_type: FileType::Pdf,
        }
    }

    #[tokio::test]
    async fn test_duplicate_title_conflicts() {
        let catalog = MemoryCatalog::new();
        DocumentCatalog::insert(&catalog, new_doc("a")).await.unwrap();
        let err = DocumentCatalog::insert(&catalog, new_doc("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(catalog.insert_attempts(), 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_comments() {
        let catalog = MemoryCatalog::new();
        let doc = DocumentCatalog::insert(&catalog, new_doc("a")).await.unwrap();
        CommentRepository::insert(
            &catalog,
            NewComment {
                document_id: doc.id,
                content: "hi".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(DocumentCatalog::delete(&catalog, doc.id).await.unwrap());
        assert_eq!(catalog.comment_count(), 0);
        assert!(!DocumentCatalog::delete(&catalog, doc.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let catalog = MemoryCatalog::new();
        for i in 0..3 {
            DocumentCatalog::insert(&catalog, new_doc(&format!("d{i}")))
                .await
                .unwrap();
        }
        let (rows, total) = DocumentCatalog::list(&catalog, 0, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows[0].title, "d2");
        assert_eq!(rows[1].title, "d1");
    }
}
