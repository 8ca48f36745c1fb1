//! Comments on documents.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use docvault_core::{
    normalize_comment_content, total_pages, Comment, CommentPage, CommentRepository,
    DocumentCatalog, Error, NewComment, PageRequest, Result,
};

/// Creates and lists comments scoped to an existing document.
#[derive(Clone)]
pub struct CommentService {
    catalog: Arc<dyn DocumentCatalog>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(catalog: Arc<dyn DocumentCatalog>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { catalog, comments }
    }

    async fn require_document(&self, document_id: Uuid) -> Result<()> {
        match self.catalog.get(document_id).await? {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(format!("document {} not found", document_id))),
        }
    }

    /// Add a comment. Content is trimmed before it is validated and stored.
    pub async fn create(&self, document_id: Uuid, content: &str) -> Result<Comment> {
        let content = normalize_comment_content(content)?;
        self.require_document(document_id).await?;

        let comment = self
            .comments
            .insert(NewComment {
                document_id,
                content,
            })
            .await?;

        info!(
            subsystem = "api",
            component = "comments",
            op = "create",
            document_id = %document_id,
            comment_id = %comment.id,
            "Comment created"
        );
        Ok(comment)
    }

    /// One page of a document's comments, newest first.
    pub async fn list(&self, document_id: Uuid, page: i64, page_size: i64) -> Result<CommentPage> {
        self.require_document(document_id).await?;

        let request = PageRequest::new(page, page_size).clamped();
        let (comments, total) = self
            .comments
            .list(document_id, request.offset(), request.limit())
            .await?;

        Ok(CommentPage {
            comments,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: total_pages(total, request.page_size),
        })
    }

    pub async fn get(&self, document_id: Uuid, comment_id: Uuid) -> Result<Option<Comment>> {
        self.comments.get(document_id, comment_id).await
    }
}
