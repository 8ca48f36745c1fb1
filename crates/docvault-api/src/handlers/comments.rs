//! Comment HTTP handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docvault_core::{Comment, CommentPage, DEFAULT_COMMENT_PAGE_SIZE};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.comments.create(document_id, &body.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// List a document's comments newest first (default page size 20).
pub async fn list_comments(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Query(query): Query<ListCommentsQuery>,
) -> Result<Json<CommentPage>, ApiError> {
    let page = state
        .comments
        .list(
            document_id,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_COMMENT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path((document_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Comment>, ApiError> {
    state
        .comments
        .get(document_id, comment_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Comment {} not found", comment_id)))
}
