//! Document catalog repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use docvault_core::{new_v7, Document, DocumentCatalog, Error, FileType, NewDocument, Result};

/// Name of the title uniqueness constraint in the `document` table.
pub const TITLE_UNIQUE_CONSTRAINT: &str = "document_title_key";

const DOCUMENT_COLUMNS: &str =
    "id, title, description, file_path, remote_id, file_type, created_at";

/// PostgreSQL implementation of DocumentCatalog.
pub struct PgDocumentCatalog {
    pool: Pool<Postgres>,
}

impl PgDocumentCatalog {
    /// Create a new PgDocumentCatalog with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn document_from_row(row: &PgRow) -> Result<Document> {
    let file_type: String = row.get("file_type");
    Ok(Document {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        file_path: row.get("file_path"),
        remote_id: row.get("remote_id"),
        file_type: file_type.parse::<FileType>()?,
        created_at: row.get("created_at"),
    })
}

/// Map an insert failure. Only a title uniqueness violation is a conflict;
/// any other failure stays a database error.
fn map_insert_error(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && is_title_constraint(db_err.constraint()) {
            return Error::Conflict("title already exists".to_string());
        }
    }
    Error::Database(err)
}

fn is_title_constraint(constraint: Option<&str>) -> bool {
    matches!(constraint, None | Some(TITLE_UNIQUE_CONSTRAINT))
}

#[async_trait]
impl DocumentCatalog for PgDocumentCatalog {
    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM document WHERE title = $1)")
                .bind(title)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(exists)
    }

    async fn insert(&self, doc: NewDocument) -> Result<Document> {
        let id = new_v7();

        let row = sqlx::query(&format!(
            "INSERT INTO document (id, title, description, file_path, remote_id, file_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&doc.title)
        .bind(&doc.description)
        .bind(&doc.file_path)
        .bind(&doc.remote_id)
        .bind(doc.file_type.extension())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        debug!(
            subsystem = "db",
            component = "documents",
            op = "insert",
            document_id = %id,
            "Document row committed"
        );
        document_from_row(&row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        let row = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM document WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Document>, i64)> {
        let rows = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM document
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        let documents = rows
            .iter()
            .map(document_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok((documents, total))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // Comments go with the row via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM document WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_conflicts() {
        let err = map_insert_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_only_title_constraint_is_a_conflict() {
        assert!(is_title_constraint(Some(TITLE_UNIQUE_CONSTRAINT)));
        assert!(is_title_constraint(None));
        assert!(!is_title_constraint(Some("document_pkey")));
    }

    #[test]
    fn test_column_list_covers_model() {
        for column in [
            "id",
            "title",
            "description",
            "file_path",
            "remote_id",
            "file_type",
            "created_at",
        ] {
            assert!(DOCUMENT_COLUMNS.contains(column), "{column}");
        }
    }
}
