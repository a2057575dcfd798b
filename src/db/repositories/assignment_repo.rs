//! Row-level operations behind the user <-> car/route link
//!
//! Each asset table (`cars`, `routes`) stores its holder in
//! `assigned_user_id`, and `users` stores the asset in `car_id` / `route_id`.
//! These functions touch one side at a time; `AssignmentService` sequences
//! them inside a transaction.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::AppResult;

/// Which asset table a link refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Car,
    Route,
}

impl AssetKind {
    fn table(self) -> &'static str {
        match self {
            AssetKind::Car => "cars",
            AssetKind::Route => "routes",
        }
    }

    /// Column on `users` pointing at this asset
    fn user_column(self) -> &'static str {
        match self {
            AssetKind::Car => "car_id",
            AssetKind::Route => "route_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Car => "Car",
            AssetKind::Route => "Route",
        }
    }
}

pub struct AssignmentRepository;

impl AssignmentRepository {
    /// Lock the asset row and return its current holder.
    /// Outer `None` means the asset does not exist.
    pub async fn lock_asset(
        conn: &mut PgConnection,
        kind: AssetKind,
        asset_id: &Uuid,
    ) -> AppResult<Option<Option<Uuid>>> {
        let sql = format!(
            "SELECT assigned_user_id FROM {} WHERE id = $1 FOR UPDATE",
            kind.table()
        );
        let holder = sqlx::query_scalar::<_, Option<Uuid>>(&sql)
            .bind(asset_id)
            .fetch_optional(conn)
            .await?;

        Ok(holder)
    }

    /// Lock the assets of `kind` pointing at `user_id`, by asset row
    pub async fn lock_held_by(
        conn: &mut PgConnection,
        kind: AssetKind,
        user_id: &Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let sql = format!(
            "SELECT id FROM {} WHERE assigned_user_id = $1 ORDER BY id FOR UPDATE",
            kind.table()
        );
        let held = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(user_id)
            .fetch_all(conn)
            .await?;

        Ok(held)
    }

    /// Lock the user row and return the asset it currently holds.
    /// Outer `None` means the user does not exist.
    pub async fn lock_user(
        conn: &mut PgConnection,
        kind: AssetKind,
        user_id: &Uuid,
    ) -> AppResult<Option<Option<Uuid>>> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 FOR UPDATE",
            kind.user_column()
        );
        let held = sqlx::query_scalar::<_, Option<Uuid>>(&sql)
            .bind(user_id)
            .fetch_optional(conn)
            .await?;

        Ok(held)
    }

    /// Clear the user-side pointer of whoever holds `asset_id`
    pub async fn release_from_users(
        conn: &mut PgConnection,
        kind: AssetKind,
        asset_id: &Uuid,
    ) -> AppResult<()> {
        let sql = format!(
            "UPDATE users SET {col} = NULL, updated_at = NOW() WHERE {col} = $1",
            col = kind.user_column()
        );
        sqlx::query(&sql).bind(asset_id).execute(conn).await?;
        Ok(())
    }

    /// Set or clear the asset-side holder
    pub async fn set_holder(
        conn: &mut PgConnection,
        kind: AssetKind,
        asset_id: &Uuid,
        user_id: Option<Uuid>,
        actor: &Uuid,
    ) -> AppResult<()> {
        let sql = format!(
            "UPDATE {} SET assigned_user_id = $2, updated_by = $3, updated_at = NOW() WHERE id = $1",
            kind.table()
        );
        sqlx::query(&sql)
            .bind(asset_id)
            .bind(user_id)
            .bind(actor)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Point the user at the asset
    pub async fn set_user_asset(
        conn: &mut PgConnection,
        kind: AssetKind,
        user_id: &Uuid,
        asset_id: &Uuid,
    ) -> AppResult<()> {
        let sql = format!(
            "UPDATE users SET {} = $2, updated_at = NOW() WHERE id = $1",
            kind.user_column()
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(asset_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_columns() {
        assert_eq!(AssetKind::Car.table(), "cars");
        assert_eq!(AssetKind::Car.user_column(), "car_id");
        assert_eq!(AssetKind::Route.table(), "routes");
        assert_eq!(AssetKind::Route.user_column(), "route_id");
    }
}
