//! Work entry repository

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{WorkEntry, WorkEntryRow},
};

/// Listing filters. `leader_id` restricts to routes in regions that user leads.
#[derive(Debug, Clone, Default)]
pub struct WorkEntryFilter {
    pub user_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub leader_id: Option<Uuid>,
}

const ROW_SELECT: &str = r#"
    SELECT
        we.*,
        u.email AS user_email,
        u.first_name AS user_first_name,
        u.last_name AS user_last_name,
        u.paid_per_stop AS user_paid_per_stop,
        r.name AS route_name,
        r.region_id AS region_id,
        c.name AS car_name,
        c.license_plate AS car_license_plate,
        c.owner AS car_owner
    FROM work_entries we
    JOIN users u ON u.id = we.user_id
    LEFT JOIN routes r ON r.id = we.route_id
    LEFT JOIN cars c ON c.id = we.car_id
    LEFT JOIN regions rg ON rg.id = r.region_id
"#;

pub struct WorkEntryRepository;

impl WorkEntryRepository {
    pub async fn create(
        pool: &PgPool,
        user_id: &Uuid,
        route_id: Option<Uuid>,
        car_id: Option<Uuid>,
        stops_completed: i32,
        work_date: NaiveDate,
    ) -> AppResult<WorkEntry> {
        let entry = sqlx::query_as::<_, WorkEntry>(
            r#"
            INSERT INTO work_entries (user_id, route_id, car_id, stops_completed, work_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(route_id)
        .bind(car_id)
        .bind(stops_completed)
        .bind(work_date)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<WorkEntry>> {
        let entry = sqlx::query_as::<_, WorkEntry>(r#"SELECT * FROM work_entries WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(entry)
    }

    /// One entry with its joined user, route and car data
    pub async fn find_row(pool: &PgPool, id: &Uuid) -> AppResult<Option<WorkEntryRow>> {
        let sql = format!("{} WHERE we.id = $1", ROW_SELECT);
        let row = sqlx::query_as::<_, WorkEntryRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row)
    }

    pub async fn find_rows(pool: &PgPool, filter: &WorkEntryFilter) -> AppResult<Vec<WorkEntryRow>> {
        let sql = format!(
            r#"{}
            WHERE ($1::uuid IS NULL OR we.user_id = $1)
              AND ($2::uuid IS NULL OR we.route_id = $2)
              AND ($3::uuid IS NULL OR we.car_id = $3)
              AND ($4::uuid IS NULL OR r.region_id = $4)
              AND ($5::date IS NULL OR we.work_date >= $5)
              AND ($6::date IS NULL OR we.work_date <= $6)
              AND ($7::uuid IS NULL OR rg.leader_id = $7)
            ORDER BY we.work_date DESC, we.created_at DESC
            "#,
            ROW_SELECT
        );

        let rows = sqlx::query_as::<_, WorkEntryRow>(&sql)
            .bind(filter.user_id)
            .bind(filter.route_id)
            .bind(filter.car_id)
            .bind(filter.region_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.leader_id)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }

    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        route_id: Option<Option<Uuid>>,
        car_id: Option<Option<Uuid>>,
        stops_completed: Option<i32>,
        work_date: Option<NaiveDate>,
    ) -> AppResult<WorkEntry> {
        let entry = sqlx::query_as::<_, WorkEntry>(
            r#"
            UPDATE work_entries
            SET
                route_id = CASE WHEN $2 THEN $3 ELSE route_id END,
                car_id = CASE WHEN $4 THEN $5 ELSE car_id END,
                stops_completed = COALESCE($6, stops_completed),
                work_date = COALESCE($7, work_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(route_id.is_some())
        .bind(route_id.flatten())
        .bind(car_id.is_some())
        .bind(car_id.flatten())
        .bind(stops_completed)
        .bind(work_date)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM work_entries WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
