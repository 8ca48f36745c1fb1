//! Core traits for docvault collaborators.
//!
//! The upload coordinator depends only on these traits, so the catalog and
//! object store can be swapped for in-memory fakes in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::file_type::ResourceKind;
use crate::models::*;

// =============================================================================
// DOCUMENT CATALOG
// =============================================================================

/// Persistent store of document metadata rows.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    /// Check whether a document with this exact title exists.
    async fn exists_by_title(&self, title: &str) -> Result<bool>;

    /// Insert and commit a new document row.
    ///
    /// Returns `Error::Conflict` when the title uniqueness constraint is
    /// violated; any other failure is returned as-is.
    async fn insert(&self, doc: NewDocument) -> Result<Document>;

    /// Fetch a document by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Document>>;

    /// List documents newest first, returning the page and the total count.
    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Document>, i64)>;

    /// Delete a document (and, transitively, its comments).
    ///
    /// Returns `false` if no row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// COMMENT REPOSITORY
// =============================================================================

/// Persistent store of comments.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a new comment.
    async fn insert(&self, comment: NewComment) -> Result<Comment>;

    /// Fetch a comment, scoped to its owning document.
    async fn get(&self, document_id: Uuid, comment_id: Uuid) -> Result<Option<Comment>>;

    /// List a document's comments newest first, with the total count.
    async fn list(
        &self,
        document_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, i64)>;
}

// =============================================================================
// OBJECT STORE
// =============================================================================

/// Remote object store holding the uploaded bytes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes under the requested identifier.
    ///
    /// Fails with `Error::Upload` when the store is unreachable or rejects
    /// the object.
    async fn upload(&self, data: &[u8], object: &UploadObject) -> Result<StoredObject>;

    /// Delete a stored object.
    ///
    /// Callers treat failures as non-fatal; an object that is already gone
    /// counts as deleted.
    async fn delete(&self, remote_id: &str, kind: ResourceKind) -> Result<()>;

    /// Public delivery URL for a stored object.
    fn delivery_url(&self, remote_id: &str, kind: ResourceKind) -> String;
}
