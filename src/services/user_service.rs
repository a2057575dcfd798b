//! User service

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{
        AssetKind, CarRepository, ProfileChanges, RouteRepository, UserRepository,
    },
    error::{AppError, AppResult},
    middleware::{AuthenticatedUser, roles::ensure_can_manage},
    models::{CarSummary, Role, RouteSummary, User, UserSummary},
    services::{
        assignment_service::{AssignmentOutcome, AssignmentService},
        auth_service::AuthService,
        mail_service::Mailer,
    },
    utils::fits_money_column,
};

/// A user together with the car and route they hold
#[derive(Debug, Clone)]
pub struct UserDetails {
    pub user: User,
    pub car: Option<CarSummary>,
    pub route: Option<RouteSummary>,
}

/// Admin-side update. Asset ids are tri-state: `Some(None)` unassigns.
#[derive(Debug, Clone, Default)]
pub struct AdminUserUpdate {
    pub profile: ProfileChanges,
    pub password: Option<String>,
    pub car_id: Option<Option<Uuid>>,
    pub route_id: Option<Option<Uuid>>,
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn get_details(pool: &PgPool, id: &Uuid) -> AppResult<UserDetails> {
        let user = Self::get_user_by_id(pool, id).await?;
        let mut details = Self::with_assets(pool, vec![user]).await?;
        details.pop().ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<UserDetails>> {
        let users = UserRepository::list(pool).await?;
        Self::with_assets(pool, users).await
    }

    /// Attach car and route summaries with one query per table
    pub async fn with_assets(pool: &PgPool, users: Vec<User>) -> AppResult<Vec<UserDetails>> {
        let car_ids: Vec<Uuid> = users.iter().filter_map(|u| u.car_id).collect();
        let route_ids: Vec<Uuid> = users.iter().filter_map(|u| u.route_id).collect();

        let cars: HashMap<Uuid, CarSummary> = CarRepository::find_summaries(pool, &car_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let routes: HashMap<Uuid, RouteSummary> = RouteRepository::find_summaries(pool, &route_ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| UserDetails {
                car: user.car_id.and_then(|id| cars.get(&id).cloned()),
                route: user.route_id.and_then(|id| routes.get(&id).cloned()),
                user,
            })
            .collect())
    }

    /// Summaries keyed by id, for embedding users in other resources
    pub async fn summaries<I>(pool: &PgPool, ids: I) -> AppResult<HashMap<Uuid, UserSummary>>
    where
        I: IntoIterator<Item = Uuid>,
    {
        let mut ids: Vec<Uuid> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(UserRepository::find_summaries(pool, &ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect())
    }

    /// Self-service profile edit. Email, role and assets are not touched.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: &Uuid,
        changes: ProfileChanges,
    ) -> AppResult<UserDetails> {
        let changes = ProfileChanges {
            email: None,
            role: None,
            password_hash: None,
            ..changes
        };

        let mut conn = pool.acquire().await?;
        UserRepository::update(&mut *conn, user_id, &changes, Some(*user_id)).await?;
        info!(user_id = %user_id, "Profile updated");

        Self::get_details(pool, user_id).await
    }

    /// Admin edit of any account, including its car and route
    pub async fn update_user(
        pool: &PgPool,
        mailer: &dyn Mailer,
        actor: &AuthenticatedUser,
        target_id: &Uuid,
        update: AdminUserUpdate,
    ) -> AppResult<UserDetails> {
        let requested_role = update
            .profile
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(AppError::Validation)?;

        let mut profile = update.profile;
        if let Some(password) = update.password.as_deref() {
            profile.password_hash = Some(AuthService::hash_password(password)?);
        }

        let target = Self::get_user_by_id(pool, target_id).await?;
        ensure_can_manage(actor.role, target.role(), requested_role)?;

        let mut tx = pool.begin().await?;

        // Asset rows are locked before the user row, as in AssignmentService
        let mut outcomes: Vec<(AssetKind, Uuid, AssignmentOutcome)> = Vec::new();
        for (kind, requested) in [
            (AssetKind::Car, update.car_id),
            (AssetKind::Route, update.route_id),
        ] {
            let Some(asset_id) = requested else { continue };
            let outcome =
                AssignmentService::assign_to_user(&mut *tx, kind, target_id, asset_id, &actor.id)
                    .await?;
            if let Some(asset_id) = asset_id {
                outcomes.push((kind, asset_id, outcome));
            }
        }

        AssignmentService::lock_user_assets(&mut *tx, target_id).await?;
        let target = UserRepository::find_by_id_for_update(&mut *tx, target_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        ensure_can_manage(actor.role, target.role(), requested_role)?;

        UserRepository::update(&mut *tx, target_id, &profile, Some(actor.id)).await?;
        tx.commit().await?;
        info!(user_id = %target_id, actor = %actor.id, "User updated");

        for (kind, asset_id, outcome) in &outcomes {
            AssignmentService::notify(pool, mailer, *kind, asset_id, outcome).await;
        }

        Self::get_details(pool, target_id).await
    }

    /// Delete an account and every reference cars and routes hold to it
    pub async fn delete_user(
        pool: &PgPool,
        actor: &AuthenticatedUser,
        target_id: &Uuid,
    ) -> AppResult<()> {
        if actor.id == *target_id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let mut tx = pool.begin().await?;
        AssignmentService::lock_user_assets(&mut *tx, target_id).await?;
        let target = UserRepository::find_by_id_for_update(&mut *tx, target_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        ensure_can_manage(actor.role, target.role(), None)?;

        UserRepository::delete(&mut *tx, target_id).await?;
        tx.commit().await?;

        info!(user_id = %target_id, actor = %actor.id, "User deleted");
        Ok(())
    }

    /// Promote the account with this email to admin
    pub async fn make_admin(pool: &PgPool, email: &str) -> AppResult<User> {
        let user = UserRepository::find_by_email(pool, email)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let user = UserRepository::update_role(pool, &user.id, Role::Admin.as_str()).await?;
        info!(user_id = %user.id, "User promoted to admin");
        Ok(user)
    }

    pub async fn set_active(
        pool: &PgPool,
        actor: &AuthenticatedUser,
        target_id: &Uuid,
        active: bool,
    ) -> AppResult<User> {
        if actor.id == *target_id && !active {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let target = Self::get_user_by_id(pool, target_id).await?;
        ensure_can_manage(actor.role, target.role(), None)?;

        let user = UserRepository::set_active(pool, target_id, active, &actor.id).await?;
        info!(user_id = %target_id, active, "User active flag changed");
        Ok(user)
    }

    pub async fn change_password(
        pool: &PgPool,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = Self::get_user_by_id(pool, user_id).await?;

        if !AuthService::verify_password(current_password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let hash = AuthService::hash_password(new_password)?;
        UserRepository::set_password(pool, user_id, &hash).await?;
        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    pub async fn set_paid_per_stop(
        pool: &PgPool,
        actor: &AuthenticatedUser,
        target_id: &Uuid,
        paid_per_stop: Decimal,
    ) -> AppResult<User> {
        let paid_per_stop = Self::pay_rate(paid_per_stop)?;
        let target = Self::get_user_by_id(pool, target_id).await?;
        ensure_can_manage(actor.role, target.role(), None)?;

        let user =
            UserRepository::set_paid_per_stop(pool, target_id, paid_per_stop, &actor.id)
                .await?;
        info!(user_id = %target_id, paid_per_stop = %user.paid_per_stop, "Pay rate changed");
        Ok(user)
    }

    /// Pay rates are non-negative and stored in cents
    fn pay_rate(value: Decimal) -> AppResult<Decimal> {
        if value < Decimal::ZERO {
            return Err(AppError::Validation(
                "paid_per_stop must not be negative".to_string(),
            ));
        }
        if !fits_money_column(&value) {
            return Err(AppError::Validation(
                "paid_per_stop must not exceed 99999999.99".to_string(),
            ));
        }
        Ok(value.round_dp(2))
    }
}
