//! Uploaded file metadata repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::StoredFile};

pub struct FileRepository;

impl FileRepository {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        original_name: &str,
        filename: &str,
        path: &str,
        mime_type: &str,
        size: i64,
        file_type: &str,
        uploaded_by: &Uuid,
    ) -> AppResult<StoredFile> {
        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO files (original_name, filename, path, mime_type, size, file_type, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(original_name)
        .bind(filename)
        .bind(path)
        .bind(mime_type)
        .bind(size)
        .bind(file_type)
        .bind(uploaded_by)
        .fetch_one(pool)
        .await?;

        Ok(file)
    }

    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(r#"SELECT * FROM files WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(file)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<StoredFile>> {
        let files = sqlx::query_as::<_, StoredFile>(r#"SELECT * FROM files ORDER BY created_at DESC"#)
            .fetch_all(pool)
            .await?;

        Ok(files)
    }

    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM files WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
