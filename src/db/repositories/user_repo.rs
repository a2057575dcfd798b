//! User repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{User, UserSummary},
};

/// Column values for a new account
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub post_code: Option<String>,
    pub street: String,
    pub house_number: String,
    pub phone_number: String,
    pub role: String,
}

/// Profile fields; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub post_code: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
    pub password_hash: Option<String>,
}

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, new: &NewUser) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                email, password_hash, first_name, last_name, city,
                post_code, street, house_number, phone_number, role
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.city)
        .bind(&new.post_code)
        .bind(&new.street)
        .bind(&new.house_number)
        .bind(&new.phone_number)
        .bind(&new.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by ID inside a transaction, locking the row
    pub async fn find_by_id_for_update(conn: &mut PgConnection, id: &Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE LOWER(email) = LOWER($1)"#)
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_invitation_hash(pool: &PgPool, hash: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE invitation_token_hash = $1"#,
        )
        .bind(hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_reset_hash(pool: &PgPool, hash: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE password_reset_token_hash = $1"#,
        )
        .bind(hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// All users, newest first
    pub async fn list(pool: &PgPool) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(r#"SELECT * FROM users ORDER BY created_at DESC"#)
            .fetch_all(pool)
            .await?;

        Ok(users)
    }

    /// Summaries for a set of users (order not guaranteed)
    pub async fn find_summaries(pool: &PgPool, ids: &[Uuid]) -> AppResult<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = sqlx::query_as::<_, UserSummary>(
            r#"SELECT id, email, first_name, last_name, role FROM users WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Apply profile changes
    pub async fn update(
        conn: &mut PgConnection,
        id: &Uuid,
        changes: &ProfileChanges,
        updated_by: Option<Uuid>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                city = COALESCE($5, city),
                post_code = COALESCE($6, post_code),
                street = COALESCE($7, street),
                house_number = COALESCE($8, house_number),
                phone_number = COALESCE($9, phone_number),
                role = COALESCE($10, role),
                password_hash = COALESCE($11, password_hash),
                updated_by = COALESCE($12, updated_by),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.city)
        .bind(&changes.post_code)
        .bind(&changes.street)
        .bind(&changes.house_number)
        .bind(&changes.phone_number)
        .bind(&changes.role)
        .bind(&changes.password_hash)
        .bind(updated_by)
        .fetch_one(conn)
        .await?;

        Ok(user)
    }

    /// Update user role
    pub async fn update_role(pool: &PgPool, id: &Uuid, role: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn set_active(pool: &PgPool, id: &Uuid, active: bool, updated_by: &Uuid) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET active = $2, updated_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(active)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn set_paid_per_stop(
        pool: &PgPool,
        id: &Uuid,
        paid_per_stop: Decimal,
        updated_by: &Uuid,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET paid_per_stop = $2, updated_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(paid_per_stop)
        .bind(updated_by)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn set_password(pool: &PgPool, id: &Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                password_reset_token_hash = NULL,
                password_reset_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Update last login timestamp
    pub async fn update_last_login(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"UPDATE users SET last_login_at = NOW() WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Create a placeholder account for an invited address
    pub async fn create_invited(
        pool: &PgPool,
        email: &str,
        placeholder_password_hash: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
        invited_by: &Uuid,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                email, password_hash, role, invitation_token_hash,
                invitation_expires_at, updated_by
            )
            VALUES ($1, $2, 'user', $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(placeholder_password_hash)
        .bind(token_hash)
        .bind(expires_at)
        .bind(invited_by)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Refresh the invitation token of a user who never completed registration
    pub async fn renew_invitation(
        pool: &PgPool,
        id: &Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET invitation_token_hash = $2, invitation_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Fill in an invited account and clear its invitation
    pub async fn complete_registration(
        pool: &PgPool,
        id: &Uuid,
        profile: &NewUser,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                password_hash = $2,
                first_name = $3,
                last_name = $4,
                city = $5,
                post_code = $6,
                street = $7,
                house_number = $8,
                phone_number = $9,
                invitation_token_hash = NULL,
                invitation_expires_at = NULL,
                last_login_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.password_hash)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.city)
        .bind(&profile.post_code)
        .bind(&profile.street)
        .bind(&profile.house_number)
        .bind(&profile.phone_number)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn set_reset_token(
        pool: &PgPool,
        id: &Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_reset_token_hash = $2, password_reset_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Delete a user, detaching every car and route that points at them
    pub async fn delete(conn: &mut PgConnection, id: &Uuid) -> AppResult<bool> {
        sqlx::query(r#"UPDATE users SET car_id = NULL, route_id = NULL WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r#"
            UPDATE cars SET
                assigned_user_id = CASE WHEN assigned_user_id = $1 THEN NULL ELSE assigned_user_id END,
                updated_by = CASE WHEN updated_by = $1 THEN NULL ELSE updated_by END
            WHERE assigned_user_id = $1 OR updated_by = $1
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            UPDATE routes SET
                assigned_user_id = CASE WHEN assigned_user_id = $1 THEN NULL ELSE assigned_user_id END,
                updated_by = CASE WHEN updated_by = $1 THEN NULL ELSE updated_by END
            WHERE assigned_user_id = $1 OR updated_by = $1
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
