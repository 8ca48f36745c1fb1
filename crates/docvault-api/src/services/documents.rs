//! Upload coordinator for documents.
//!
//! Creating a document is a two-phase operation: the bytes are uploaded to the
//! remote object store first, then the metadata row is committed to the
//! catalog. If the commit fails, the uploaded object is deleted again
//! (compensation) before the error is returned. All validation happens before
//! the first remote call.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use docvault_core::{
    normalize_description, normalize_title, total_pages, Document, DocumentCatalog, DocumentPage,
    Error, FileType, NewDocument, ObjectStore, PageRequest, ResourceKind, Result, UploadObject,
    MAX_UPLOAD_BYTES,
};

/// Folder that every uploaded object is placed under.
pub const UPLOAD_FOLDER: &str = "documents";

/// Delivery flag that makes the remote store serve the object as an attachment.
const ATTACHMENT_FLAG: &str = "fl_attachment";

/// A document upload as received from a caller.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Coordinates the object store and the document catalog.
#[derive(Clone)]
pub struct DocumentService {
    catalog: Arc<dyn DocumentCatalog>,
    store: Arc<dyn ObjectStore>,
}

impl DocumentService {
    pub fn new(catalog: Arc<dyn DocumentCatalog>, store: Arc<dyn ObjectStore>) -> Self {
        Self { catalog, store }
    }

    /// Validate, upload, and commit a new document.
    ///
    /// Checks run in order and stop at the first failure: title and
    /// description, title uniqueness, content type, size. None of them
    /// touch the object store.
    pub async fn create(&self, request: CreateDocument) -> Result<Document> {
        let start = Instant::now();

        let title = normalize_title(&request.title)?;
        let description = normalize_description(request.description.as_deref())?;

        if self.catalog.exists_by_title(&title).await? {
            return Err(Error::Conflict("title already exists".to_string()));
        }

        let file_type = FileType::from_mime(&request.content_type)?;

        if request.data.len() > MAX_UPLOAD_BYTES {
            return Err(Error::PayloadTooLarge {
                size: request.data.len(),
                max: MAX_UPLOAD_BYTES,
            });
        }

        // Phase 1: remote upload
        let kind = file_type.resource_kind();
        let object = UploadObject {
            desired_id: Uuid::new_v4().to_string(),
            folder: UPLOAD_FOLDER.to_string(),
            file_type,
            kind,
        };
        let stored = self
            .store
            .upload(&request.data, &object)
            .await
            .map_err(|e| match e {
                Error::Upload(_) => e,
                other => Error::Upload(other.to_string()),
            })?;

        debug!(
            subsystem = "api",
            component = "upload_coordinator",
            op = "create",
            remote_id = %stored.remote_id,
            size_bytes = request.data.len(),
            "Remote upload confirmed, committing catalog row"
        );

        // Phase 2: local commit
        let new_doc = NewDocument {
            title,
            description,
            file_path: stored.locator,
            remote_id: stored.remote_id.clone(),
            file_type,
        };
        let document = match self.catalog.insert(new_doc).await {
            Ok(document) => document,
            Err(err) => {
                self.compensate(&stored.remote_id, kind, &err).await;
                return Err(commit_error(err));
            }
        };

        info!(
            subsystem = "api",
            component = "upload_coordinator",
            op = "create",
            document_id = %document.id,
            remote_id = %document.remote_id,
            file_type = %document.file_type,
            duration_ms = start.elapsed().as_millis() as u64,
            "Document created"
        );

        Ok(document)
    }

    /// Delete the uploaded object after a failed commit.
    ///
    /// Best effort: a failure here is logged and the commit error is what the
    /// caller sees.
    async fn compensate(&self, remote_id: &str, kind: ResourceKind, cause: &Error) {
        warn!(
            subsystem = "api",
            component = "upload_coordinator",
            op = "compensate",
            remote_id = %remote_id,
            error = %cause,
            "Catalog commit failed, removing uploaded object"
        );

        if let Err(e) = self.store.delete(remote_id, kind).await {
            warn!(
                subsystem = "api",
                component = "upload_coordinator",
                op = "compensate",
                remote_id = %remote_id,
                error = %e,
                "Compensating delete failed, remote object is orphaned"
            );
        }
    }

    /// Delete a document and its remote object.
    ///
    /// Returns `false` without contacting the object store when the document
    /// does not exist. A failed remote delete is logged and does not stop the
    /// catalog row from being removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let Some(document) = self.catalog.get(id).await? else {
            return Ok(false);
        };

        if let Err(e) = self
            .store
            .delete(&document.remote_id, document.file_type.resource_kind())
            .await
        {
            warn!(
                subsystem = "api",
                component = "upload_coordinator",
                op = "delete",
                document_id = %id,
                remote_id = %document.remote_id,
                error = %e,
                "Remote delete failed, removing catalog row anyway"
            );
        }

        let deleted = self.catalog.delete(id).await?;
        if deleted {
            info!(
                subsystem = "api",
                component = "upload_coordinator",
                op = "delete",
                document_id = %id,
                "Document deleted"
            );
        }
        Ok(deleted)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        self.catalog.get(id).await
    }

    /// One page of documents, newest first.
    ///
    /// Out-of-range paging parameters are clamped rather than rejected.
    pub async fn list(&self, page: i64, page_size: i64) -> Result<DocumentPage> {
        let request = PageRequest::new(page, page_size).clamped();
        let (documents, total) = self
            .catalog
            .list(request.offset(), request.limit())
            .await?;

        Ok(DocumentPage {
            documents,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: total_pages(total, request.page_size),
        })
    }

    /// Public URL that renders the document inline.
    pub async fn view_url(&self, id: Uuid) -> Result<Option<String>> {
        Ok(self.catalog.get(id).await?.map(|doc| {
            if doc.remote_id.is_empty() {
                doc.file_path
            } else {
                self.store
                    .delivery_url(&doc.remote_id, doc.file_type.resource_kind())
            }
        }))
    }

    /// Public URL that makes the browser download the document.
    pub async fn download_url(&self, id: Uuid) -> Result<Option<String>> {
        Ok(self
            .catalog
            .get(id)
            .await?
            .map(|doc| attachment_url(&doc.file_path)))
    }
}

/// Map a catalog insert failure to the error returned after compensation.
fn commit_error(err: Error) -> Error {
    match err {
        conflict @ Error::Conflict(_) => conflict,
        other => Error::Persistence(other.to_string()),
    }
}

/// Insert the attachment flag after the first `/upload/` segment.
///
/// Locators without an `/upload/` segment are returned unchanged.
pub fn attachment_url(locator: &str) -> String {
    locator.replacen("/upload/", &format!("/upload/{}/", ATTACHMENT_FLAG), 1)
}
