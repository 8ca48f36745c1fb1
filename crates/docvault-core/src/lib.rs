//! # docvault-core
//!
//! Core types, traits, and abstractions for the docvault document backend.
//!
//! This crate provides the domain model (documents, comments, allow-listed
//! file types), the error taxonomy, and the collaborator traits that the
//! database, storage, and API crates implement or depend on.

pub mod error;
pub mod file_type;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use file_type::{FileType, ResourceKind, MAX_UPLOAD_BYTES};
pub use models::*;
pub use pagination::{
    total_pages, PageRequest, DEFAULT_COMMENT_PAGE_SIZE, DEFAULT_DOCUMENT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use traits::*;
pub use validation::{
    normalize_comment_content, normalize_description, normalize_title, MAX_COMMENT_CHARS,
    MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS,
};

/// Generate a new time-ordered UUIDv7 for primary keys.
pub fn new_v7() -> uuid::Uuid {
    uuid::Uuid::now_v7()
}
