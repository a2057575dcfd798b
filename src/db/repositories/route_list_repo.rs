//! Routes-list repository

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use crate::{error::AppResult, models::RouteList};

pub struct RouteListRepository;

impl RouteListRepository {
    /// Filtered listing, newest date first
    pub async fn list(
        pool: &PgPool,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        route: Option<&str>,
    ) -> AppResult<Vec<RouteList>> {
        let lists = sqlx::query_as::<_, RouteList>(
            r#"
            SELECT * FROM routes_lists
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
              AND ($3::text IS NULL OR route = $3)
            ORDER BY date DESC, id ASC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .bind(route)
        .fetch_all(pool)
        .await?;

        Ok(lists)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> AppResult<Option<RouteList>> {
        let list = sqlx::query_as::<_, RouteList>(r#"SELECT * FROM routes_lists WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(list)
    }

    pub async fn lock_by_id(conn: &mut PgConnection, id: i32) -> AppResult<Option<RouteList>> {
        let list = sqlx::query_as::<_, RouteList>(
            r#"SELECT * FROM routes_lists WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(list)
    }

    /// Lock the record with this route name on this date, if any
    pub async fn lock_by_route_and_date(
        conn: &mut PgConnection,
        route: &str,
        date: NaiveDate,
    ) -> AppResult<Option<RouteList>> {
        let list = sqlx::query_as::<_, RouteList>(
            r#"
            SELECT * FROM routes_lists
            WHERE route = $1 AND date = $2
            ORDER BY id ASC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(route)
        .bind(date)
        .fetch_optional(conn)
        .await?;

        Ok(list)
    }

    pub async fn create(
        conn: &mut PgConnection,
        route: &str,
        date: NaiveDate,
        number_of_stops: i32,
        number_of_packages: i32,
    ) -> AppResult<RouteList> {
        let list = sqlx::query_as::<_, RouteList>(
            r#"
            INSERT INTO routes_lists (route, date, number_of_stops, number_of_packages)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(route)
        .bind(date)
        .bind(number_of_stops)
        .bind(number_of_packages)
        .fetch_one(conn)
        .await?;

        Ok(list)
    }

    /// Add (or with negative deltas, subtract) stops and packages
    pub async fn adjust(
        conn: &mut PgConnection,
        id: i32,
        stops_delta: i32,
        packages_delta: i32,
    ) -> AppResult<RouteList> {
        let list = sqlx::query_as::<_, RouteList>(
            r#"
            UPDATE routes_lists
            SET number_of_stops = number_of_stops + $2,
                number_of_packages = number_of_packages + $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stops_delta)
        .bind(packages_delta)
        .fetch_one(conn)
        .await?;

        Ok(list)
    }

    pub async fn rename(pool: &PgPool, id: i32, route: &str) -> AppResult<RouteList> {
        let list = sqlx::query_as::<_, RouteList>(
            r#"UPDATE routes_lists SET route = $2 WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(route)
        .fetch_one(pool)
        .await?;

        Ok(list)
    }
}
