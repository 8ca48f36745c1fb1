//! Service layer for business logic.

pub mod comments;
pub mod documents;

pub use comments::CommentService;
pub use documents::{attachment_url, CreateDocument, DocumentService, UPLOAD_FOLDER};
