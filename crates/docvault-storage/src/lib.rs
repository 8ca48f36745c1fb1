//! # docvault-storage
//!
//! Object store backends for docvault.
//!
//! - [`CloudinaryStore`]: signed upload/destroy against a Cloudinary-compatible API
//! - [`FilesystemStore`]: local directory, for development and single-node deployments
//! - `MockObjectStore` (feature `mock`): in-memory store that records calls
//!
//! All backends implement [`docvault_core::ObjectStore`].

pub mod cloudinary;
pub mod filesystem;
#[cfg(feature = "mock")]
pub mod mock;

pub use cloudinary::{sign_params, CloudinaryConfig, CloudinaryStore};
pub use filesystem::FilesystemStore;
#[cfg(feature = "mock")]
pub use mock::{MockCall, MockObjectStore};

pub use docvault_core::{ObjectStore, ResourceKind, StoredObject, UploadObject};
