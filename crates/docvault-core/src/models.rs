//! Domain models for documents, comments, and stored objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::file_type::{FileType, ResourceKind};

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Catalog row describing an uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Retrievable locator returned by the object store.
    pub file_path: String,
    /// Object store identifier, used for deletion. Not exposed over the API.
    #[serde(skip_serializing, default)]
    pub remote_id: String,
    pub file_type: FileType,
    pub created_at: DateTime<Utc>,
}

/// Row to insert once the remote upload has been confirmed.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub remote_id: String,
    pub file_type: FileType,
}

/// One page of documents, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

// =============================================================================
// COMMENTS
// =============================================================================

/// Comment attached to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Validated comment ready for insertion.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub document_id: Uuid,
    pub content: String,
}

/// One page of comments, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

// =============================================================================
// OBJECT STORE
// =============================================================================

/// Parameters for a single object upload.
#[derive(Debug, Clone)]
pub struct UploadObject {
    /// Caller-chosen identifier, unique per upload.
    pub desired_id: String,
    /// Logical folder the object is placed in.
    pub folder: String,
    pub file_type: FileType,
    pub kind: ResourceKind,
}

/// Confirmation returned by the object store after an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Retrievable URL for the stored bytes.
    pub locator: String,
    /// Identifier confirmed by the store; may differ from the desired id
    /// (e.g. prefixed with the folder).
    pub remote_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_serialization_hides_remote_id() {
        let doc = Document {
            id: Uuid::nil(),
            title: "Quarterly report".to_string(),
            description: None,
            file_path: "https://cdn.example.com/documents/abc.pdf".to_string(),
            remote_id: "documents/abc".to_string(),
            file_type: FileType::Pdf,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("remote_id").is_none());
        assert_eq!(json["file_type"], "pdf");
        assert_eq!(json["title"], "Quarterly report");
    }
}
