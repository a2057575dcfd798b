//! Settings repository

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Setting, SettingValue},
};

pub struct SettingRepository;

impl SettingRepository {
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>(r#"SELECT * FROM settings ORDER BY key ASC"#)
            .fetch_all(pool)
            .await?;

        Ok(settings)
    }

    pub async fn find_by_key(pool: &PgPool, key: &str) -> AppResult<Option<Setting>> {
        let setting = sqlx::query_as::<_, Setting>(r#"SELECT * FROM settings WHERE key = $1"#)
            .bind(key)
            .fetch_optional(pool)
            .await?;

        Ok(setting)
    }

    /// Numeric values for a set of keys
    pub async fn numeric_values(pool: &PgPool, keys: &[&str]) -> AppResult<Vec<(String, Option<Decimal>)>> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let rows = sqlx::query_as::<_, (String, Option<Decimal>)>(
            r#"SELECT key, numeric_value FROM settings WHERE key = ANY($1)"#,
        )
        .bind(&keys)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Insert a setting unless the key already exists. Returns true when inserted.
    pub async fn insert_if_missing(
        pool: &PgPool,
        key: &str,
        value: &SettingValue,
        description: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO settings (key, numeric_value, text_value, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value.numeric())
        .bind(value.text())
        .bind(description)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_value(pool: &PgPool, key: &str, value: &SettingValue) -> AppResult<Setting> {
        let setting = sqlx::query_as::<_, Setting>(
            r#"
            UPDATE settings
            SET numeric_value = $2, text_value = $3, updated_at = NOW()
            WHERE key = $1
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value.numeric())
        .bind(value.text())
        .fetch_one(pool)
        .await?;

        Ok(setting)
    }
}
