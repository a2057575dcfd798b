//! Region repository

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{error::AppResult, models::Region};

pub struct RegionRepository;

impl RegionRepository {
    pub async fn create(
        conn: &mut PgConnection,
        name: &str,
        description: Option<&str>,
        leader_id: Option<Uuid>,
        created_by: &Uuid,
    ) -> AppResult<Region> {
        let region = sqlx::query_as::<_, Region>(
            r#"
            INSERT INTO regions (name, description, leader_id, updated_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(leader_id)
        .bind(created_by)
        .fetch_one(conn)
        .await?;

        Ok(region)
    }

    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Region>> {
        let region = sqlx::query_as::<_, Region>(r#"SELECT * FROM regions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(region)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Region>> {
        let regions = sqlx::query_as::<_, Region>(r#"SELECT * FROM regions ORDER BY name ASC"#)
            .fetch_all(pool)
            .await?;

        Ok(regions)
    }

    pub async fn find_by_leader(pool: &PgPool, leader_id: &Uuid) -> AppResult<Vec<Region>> {
        let regions = sqlx::query_as::<_, Region>(
            r#"SELECT * FROM regions WHERE leader_id = $1 ORDER BY name ASC"#,
        )
        .bind(leader_id)
        .fetch_all(pool)
        .await?;

        Ok(regions)
    }

    pub async fn count_led_by(conn: &mut PgConnection, leader_id: &Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM regions WHERE leader_id = $1"#,
        )
        .bind(leader_id)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }

    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        name: Option<&str>,
        description: Option<&str>,
        updated_by: &Uuid,
    ) -> AppResult<Region> {
        let region = sqlx::query_as::<_, Region>(
            r#"
            UPDATE regions
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_by = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(region)
    }

    pub async fn set_leader(
        conn: &mut PgConnection,
        id: &Uuid,
        leader_id: Option<Uuid>,
        updated_by: &Uuid,
    ) -> AppResult<Region> {
        let region = sqlx::query_as::<_, Region>(
            r#"
            UPDATE regions
            SET leader_id = $2, updated_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(leader_id)
        .bind(updated_by)
        .fetch_one(conn)
        .await?;

        Ok(region)
    }

    /// Delete a region; its routes are detached by the foreign key
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM regions WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
