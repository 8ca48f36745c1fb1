//! Comment repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use docvault_core::{new_v7, Comment, CommentRepository, Error, NewComment, Result};

/// PostgreSQL implementation of CommentRepository.
pub struct PgCommentRepository {
    pool: Pool<Postgres>,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn comment_from_row(row: PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        document_id: row.get("document_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment> {
        let row = sqlx::query(
            "INSERT INTO comment (id, document_id, content)
             VALUES ($1, $2, $3)
             RETURNING id, document_id, content, created_at",
        )
        .bind(new_v7())
        .bind(comment.document_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // The document was deleted between the existence check and the insert.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return Error::NotFound(format!(
                        "Document {} not found",
                        comment.document_id
                    ));
                }
            }
            Error::Database(e)
        })?;

        Ok(comment_from_row(row))
    }

    async fn get(&self, document_id: Uuid, comment_id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query(
            "SELECT id, document_id, content, created_at
             FROM comment
             WHERE id = $1 AND document_id = $2",
        )
        .bind(comment_id)
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(comment_from_row))
    }

    async fn list(
        &self,
        document_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, i64)> {
        let rows = sqlx::query(
            "SELECT id, document_id, content, created_at
             FROM comment
             WHERE document_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(document_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comment WHERE document_id = $1")
            .bind(document_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok((rows.into_iter().map(comment_from_row).collect(), total))
    }
}
