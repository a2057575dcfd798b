//! Complaint repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::{COMPLAINT_SORT_COLUMNS, DEFAULT_COMPLAINT_SORT},
    error::AppResult,
    models::{Complaint, ComplaintFilter, ComplaintStatusStats, NewComplaint},
};

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::text IS NULL OR address ILIKE '%' || $1 || '%')
      AND ($2::text IS NULL OR client ILIKE '%' || $2 || '%')
      AND ($3::text IS NULL OR courier ILIKE '%' || $3 || '%')
      AND ($4::uuid IS NULL OR user_id = $4)
      AND ($5::date IS NULL OR delivery_date >= $5)
      AND ($6::date IS NULL OR delivery_date <= $6)
      AND ($7::text IS NULL OR problem_type = $7)
      AND ($8::text IS NULL OR status = $8)
      AND ($9::int IS NULL OR EXTRACT(MONTH FROM delivery_date) = $9)
"#;

/// Whitelisted ORDER BY clause
pub fn order_clause(sort_by: Option<&str>, descending: bool) -> String {
    let column = sort_by
        .filter(|c| COMPLAINT_SORT_COLUMNS.contains(c))
        .unwrap_or(DEFAULT_COMPLAINT_SORT);
    let direction = if descending { "DESC" } else { "ASC" };
    format!("ORDER BY {} {}, id {}", column, direction, direction)
}

pub struct ComplaintRepository;

impl ComplaintRepository {
    pub async fn create(pool: &PgPool, new: &NewComplaint) -> AppResult<Complaint> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (
                complaint_number, client, description, problem_type, compensation_value,
                courier, address, delivery_date, comments, user_id, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.complaint_number)
        .bind(&new.client)
        .bind(&new.description)
        .bind(&new.problem_type)
        .bind(new.compensation_value)
        .bind(&new.courier)
        .bind(&new.address)
        .bind(new.delivery_date)
        .bind(&new.comments)
        .bind(new.user_id)
        .bind(&new.status)
        .fetch_one(pool)
        .await?;

        Ok(complaint)
    }

    /// Whether a complaint with identical identifying fields is already stored
    pub async fn exists_duplicate(pool: &PgPool, new: &NewComplaint) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM complaints
                WHERE complaint_number = $1
                  AND client = $2
                  AND description = $3
                  AND problem_type = $4
                  AND compensation_value IS NOT DISTINCT FROM $5
                  AND courier = $6
                  AND address = $7
                  AND delivery_date = $8
            )
            "#,
        )
        .bind(new.complaint_number)
        .bind(&new.client)
        .bind(&new.description)
        .bind(&new.problem_type)
        .bind(new.compensation_value)
        .bind(&new.courier)
        .bind(&new.address)
        .bind(new.delivery_date)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> AppResult<Option<Complaint>> {
        let complaint = sqlx::query_as::<_, Complaint>(r#"SELECT * FROM complaints WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(complaint)
    }

    /// One page of complaints plus the total match count
    pub async fn list(
        pool: &PgPool,
        filter: &ComplaintFilter,
        order: &str,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Complaint>, i64)> {
        let sql = format!(
            "SELECT * FROM complaints {} {} LIMIT $10 OFFSET $11",
            FILTER_CLAUSE, order
        );
        let complaints = sqlx::query_as::<_, Complaint>(&sql)
            .bind(&filter.search_address)
            .bind(&filter.search_client)
            .bind(&filter.search_courier)
            .bind(filter.user_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(&filter.problem_type)
            .bind(&filter.status)
            .bind(filter.month)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM complaints {}", FILTER_CLAUSE);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&filter.search_address)
            .bind(&filter.search_client)
            .bind(&filter.search_courier)
            .bind(filter.user_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(&filter.problem_type)
            .bind(&filter.status)
            .bind(filter.month)
            .fetch_one(pool)
            .await?;

        Ok((complaints, total))
    }

    pub async fn assign(pool: &PgPool, id: i32, user_id: &Uuid) -> AppResult<Complaint> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints SET user_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(complaint)
    }

    pub async fn set_status(pool: &PgPool, id: i32, status: &str) -> AppResult<Complaint> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(complaint)
    }

    pub async fn bulk_assign(pool: &PgPool, ids: &[i32], user_id: &Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"UPDATE complaints SET user_id = $2, updated_at = NOW() WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn bulk_set_status(pool: &PgPool, ids: &[i32], status: &str) -> AppResult<u64> {
        let result = sqlx::query(
            r#"UPDATE complaints SET status = $2, updated_at = NOW() WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .bind(status)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: i32) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM complaints WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count and compensation per status, optionally limited to a year and/or month
    pub async fn stats_by_status(
        pool: &PgPool,
        year: Option<i32>,
        month: Option<i32>,
    ) -> AppResult<Vec<ComplaintStatusStats>> {
        let rows = sqlx::query_as::<_, ComplaintStatusStats>(
            r#"
            SELECT
                status,
                COUNT(*) AS count,
                COUNT(compensation_value) AS compensated,
                SUM(compensation_value) AS total_compensation
            FROM complaints
            WHERE ($1::int IS NULL OR EXTRACT(YEAR FROM delivery_date) = $1)
              AND ($2::int IS NULL OR EXTRACT(MONTH FROM delivery_date) = $2)
            GROUP BY status
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
