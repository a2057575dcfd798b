//! Car repository

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Car, CarSummary},
};

/// Column values for a new car
#[derive(Debug, Clone)]
pub struct NewCar {
    pub name: String,
    pub license_plate: String,
    pub status: String,
    pub owner: String,
    pub description: Option<String>,
    pub checkup_date: Option<NaiveDate>,
    pub oil_change_date: Option<NaiveDate>,
    pub tires_change_date: Option<NaiveDate>,
    pub brakes_change_date: Option<NaiveDate>,
}

/// Partial update. Date fields are tri-state: `Some(None)` clears the date.
#[derive(Debug, Clone, Default)]
pub struct CarChanges {
    pub name: Option<String>,
    pub license_plate: Option<String>,
    pub status: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub checkup_date: Option<Option<NaiveDate>>,
    pub oil_change_date: Option<Option<NaiveDate>>,
    pub tires_change_date: Option<Option<NaiveDate>>,
    pub brakes_change_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
}

pub struct CarRepository;

impl CarRepository {
    pub async fn create(pool: &PgPool, new: &NewCar, created_by: &Uuid) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (
                name, license_plate, status, owner, description,
                checkup_date, oil_change_date, tires_change_date, brakes_change_date,
                updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.license_plate)
        .bind(&new.status)
        .bind(&new.owner)
        .bind(&new.description)
        .bind(new.checkup_date)
        .bind(new.oil_change_date)
        .bind(new.tires_change_date)
        .bind(new.brakes_change_date)
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        Ok(car)
    }

    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(r#"SELECT * FROM cars WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(car)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(r#"SELECT * FROM cars ORDER BY name ASC"#)
            .fetch_all(pool)
            .await?;

        Ok(cars)
    }

    pub async fn find_summaries(pool: &PgPool, ids: &[Uuid]) -> AppResult<Vec<CarSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cars = sqlx::query_as::<_, CarSummary>(
            r#"SELECT id, name, license_plate, status, owner FROM cars WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(cars)
    }

    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        changes: &CarChanges,
        updated_by: &Uuid,
    ) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET
                name = COALESCE($2, name),
                license_plate = COALESCE($3, license_plate),
                status = COALESCE($4, status),
                owner = COALESCE($5, owner),
                description = COALESCE($6, description),
                checkup_date = CASE WHEN $7 THEN $8 ELSE checkup_date END,
                oil_change_date = CASE WHEN $9 THEN $10 ELSE oil_change_date END,
                tires_change_date = CASE WHEN $11 THEN $12 ELSE tires_change_date END,
                brakes_change_date = CASE WHEN $13 THEN $14 ELSE brakes_change_date END,
                active = COALESCE($15, active),
                updated_by = $16,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.license_plate)
        .bind(&changes.status)
        .bind(&changes.owner)
        .bind(&changes.description)
        .bind(changes.checkup_date.is_some())
        .bind(changes.checkup_date.flatten())
        .bind(changes.oil_change_date.is_some())
        .bind(changes.oil_change_date.flatten())
        .bind(changes.tires_change_date.is_some())
        .bind(changes.tires_change_date.flatten())
        .bind(changes.brakes_change_date.is_some())
        .bind(changes.brakes_change_date.flatten())
        .bind(changes.active)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(car)
    }

    pub async fn set_status(pool: &PgPool, id: &Uuid, status: &str, updated_by: &Uuid) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET status = $2, updated_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(car)
    }

    /// Mark inactive without removing the row
    pub async fn deactivate(pool: &PgPool, id: &Uuid, updated_by: &Uuid) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET active = FALSE, updated_by = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(car)
    }

    /// Delete a car after clearing every user that holds it
    pub async fn delete(conn: &mut PgConnection, id: &Uuid) -> AppResult<bool> {
        sqlx::query(r#"UPDATE users SET car_id = NULL, updated_at = NOW() WHERE car_id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query(r#"DELETE FROM cars WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
