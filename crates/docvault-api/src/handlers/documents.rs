//! Document HTTP handlers.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docvault_core::{Document, DocumentPage, Error, DEFAULT_DOCUMENT_PAGE_SIZE};

use crate::{ApiError, AppState, CreateDocument};

/// Fallback when the client sends a file part without a content type.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Request body too large".to_string())
    } else {
        ApiError::BadRequest(format!("Multipart error: {}", e.body_text()))
    }
}

/// Upload a document.
///
/// # Multipart Fields
/// - `title`: unique title (required)
/// - `description`: free text (optional)
/// - `file`: PDF, PNG or JPEG, at most 10 MB (required)
///
/// # Returns
/// - 201 Created with the document
/// - 400 unsupported file type, 409 duplicate title, 413 file too large,
///   422 invalid fields, 502 remote storage failure
pub async fn create_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("title") => title = Some(field.text().await.map_err(multipart_error)?),
            Some("description") => {
                description = Some(field.text().await.map_err(multipart_error)?)
            }
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or(UNKNOWN_CONTENT_TYPE)
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                file = Some((content_type, data));
            }
            _ => {} // ignore unknown fields
        }
    }

    let title = title.ok_or_else(|| Error::Validation("title is required".to_string()))?;
    let (content_type, data) =
        file.ok_or_else(|| Error::Validation("file is required".to_string()))?;

    let document = state
        .documents
        .create(CreateDocument {
            title,
            description,
            content_type,
            data,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// List documents newest first.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<DocumentPage>, ApiError> {
    let page = state
        .documents
        .list(
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_DOCUMENT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    state
        .documents
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| document_not_found(id))
}

/// Redirect to the inline rendering of the stored file.
pub async fn view_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    let url = state
        .documents
        .view_url(id)
        .await?
        .ok_or_else(|| document_not_found(id))?;
    Ok(Redirect::temporary(&url))
}

/// Redirect to a URL that serves the stored file as an attachment.
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    let url = state
        .documents
        .download_url(id)
        .await?
        .ok_or_else(|| document_not_found(id))?;
    Ok(Redirect::temporary(&url))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.documents.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(document_not_found(id))
    }
}

pub(crate) fn document_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Document {} not found", id))
}
