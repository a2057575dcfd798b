//! Route repository

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Route, RouteSummary},
};

pub struct RouteRepository;

impl RouteRepository {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        region_id: Option<Uuid>,
        created_by: &Uuid,
    ) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (name, description, region_id, updated_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(region_id)
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        Ok(route)
    }

    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>(r#"SELECT * FROM routes WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(route)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(r#"SELECT * FROM routes ORDER BY name ASC"#)
            .fetch_all(pool)
            .await?;

        Ok(routes)
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(r#"SELECT * FROM routes WHERE id = ANY($1)"#)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        Ok(routes)
    }

    pub async fn find_summaries(pool: &PgPool, ids: &[Uuid]) -> AppResult<Vec<RouteSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let routes = sqlx::query_as::<_, RouteSummary>(
            r#"SELECT id, name, region_id FROM routes WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(routes)
    }

    /// Routes of several regions at once
    pub async fn find_by_regions(pool: &PgPool, region_ids: &[Uuid]) -> AppResult<Vec<Route>> {
        if region_ids.is_empty() {
            return Ok(Vec::new());
        }
        let routes = sqlx::query_as::<_, Route>(
            r#"SELECT * FROM routes WHERE region_id = ANY($1) ORDER BY name ASC"#,
        )
        .bind(region_ids)
        .fetch_all(pool)
        .await?;

        Ok(routes)
    }

    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        name: Option<&str>,
        description: Option<&str>,
        region_id: Option<Option<Uuid>>,
        active: Option<bool>,
        updated_by: &Uuid,
    ) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                region_id = CASE WHEN $4 THEN $5 ELSE region_id END,
                active = COALESCE($6, active),
                updated_by = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(region_id.is_some())
        .bind(region_id.flatten())
        .bind(active)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(route)
    }

    pub async fn deactivate(pool: &PgPool, id: &Uuid, updated_by: &Uuid) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET active = FALSE, updated_by = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(route)
    }

    /// Move routes into a region
    pub async fn attach_to_region(
        conn: &mut PgConnection,
        region_id: &Uuid,
        route_ids: &[Uuid],
        updated_by: &Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE routes
            SET region_id = $1, updated_by = $3, updated_at = NOW()
            WHERE id = ANY($2)
            "#,
        )
        .bind(region_id)
        .bind(route_ids)
        .bind(updated_by)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Detach one route; returns false when it was not in the region
    pub async fn detach_from_region(
        pool: &PgPool,
        region_id: &Uuid,
        route_id: &Uuid,
        updated_by: &Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE routes
            SET region_id = NULL, updated_by = $3, updated_at = NOW()
            WHERE id = $2 AND region_id = $1
            "#,
        )
        .bind(region_id)
        .bind(route_id)
        .bind(updated_by)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a route after clearing every user that holds it
    pub async fn delete(conn: &mut PgConnection, id: &Uuid) -> AppResult<bool> {
        sqlx::query(r#"UPDATE users SET route_id = NULL, updated_at = NOW() WHERE route_id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query(r#"DELETE FROM routes WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
