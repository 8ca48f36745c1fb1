//! HTTP handler modules for docvault-api.

pub mod comments;
pub mod documents;
pub mod health;
