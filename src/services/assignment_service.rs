//! Keeps the user <-> car/route link consistent on both sides
//!
//! Every path that changes who holds a car or route goes through here, on a
//! transaction connection, so that `cars.assigned_user_id = U` exactly when
//! `users.car_id = C` (and the same for routes).
//!
//! Lock order is asset rows first, then user rows.

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    db::repositories::{AssetKind, AssignmentRepository, CarRepository, RouteRepository, UserRepository},
    error::{AppError, AppResult},
    services::mail_service::{MailService, Mailer},
};

/// What an assignment call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentOutcome {
    pub previous_holder: Option<Uuid>,
    pub holder: Option<Uuid>,
    pub changed: bool,
}

impl AssignmentOutcome {
    /// The user who just received the asset, if any
    pub fn newly_assigned(&self) -> Option<Uuid> {
        if self.changed { self.holder } else { None }
    }
}

pub struct AssignmentService;

impl AssignmentService {
    /// Give `asset_id` to `user_id`, or release it when `user_id` is `None`
    pub async fn assign(
        conn: &mut PgConnection,
        kind: AssetKind,
        asset_id: &Uuid,
        user_id: Option<Uuid>,
        actor: &Uuid,
    ) -> AppResult<AssignmentOutcome> {
        let previous_holder = AssignmentRepository::lock_asset(&mut *conn, kind, asset_id)
            .await?
            .ok_or_else(|| AppError::not_found(kind.label()))?;

        let Some(user_id) = user_id else {
            AssignmentRepository::release_from_users(&mut *conn, kind, asset_id).await?;
            AssignmentRepository::set_holder(&mut *conn, kind, asset_id, None, actor).await?;

            if previous_holder.is_some() {
                info!(asset = kind.label(), asset_id = %asset_id, "Asset unassigned");
            }

            return Ok(AssignmentOutcome {
                previous_holder,
                holder: None,
                changed: previous_holder.is_some(),
            });
        };

        AssignmentRepository::lock_held_by(&mut *conn, kind, &user_id).await?;
        let held = AssignmentRepository::lock_user(&mut *conn, kind, &user_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

        if previous_holder == Some(user_id) && held == Some(*asset_id) {
            return Ok(AssignmentOutcome {
                previous_holder,
                holder: Some(user_id),
                changed: false,
            });
        }

        AssignmentRepository::release_from_users(&mut *conn, kind, asset_id).await?;

        if let Some(other) = held.filter(|other| other != asset_id) {
            AssignmentRepository::set_holder(&mut *conn, kind, &other, None, actor).await?;
        }

        AssignmentRepository::set_holder(&mut *conn, kind, asset_id, Some(user_id), actor).await?;
        AssignmentRepository::set_user_asset(&mut *conn, kind, &user_id, asset_id).await?;

        info!(
            asset = kind.label(),
            asset_id = %asset_id,
            user_id = %user_id,
            actor = %actor,
            "Asset assigned"
        );

        Ok(AssignmentOutcome {
            previous_holder,
            holder: Some(user_id),
            changed: true,
        })
    }

    /// Set which asset of `kind` a user holds, from the user's side.
    /// `None` releases whatever the user holds now.
    pub async fn assign_to_user(
        conn: &mut PgConnection,
        kind: AssetKind,
        user_id: &Uuid,
        asset_id: Option<Uuid>,
        actor: &Uuid,
    ) -> AppResult<AssignmentOutcome> {
        match asset_id {
            Some(asset_id) => Self::assign(conn, kind, &asset_id, Some(*user_id), actor).await,
            None => {
                AssignmentRepository::lock_held_by(&mut *conn, kind, user_id).await?;

                let held = AssignmentRepository::lock_user(&mut *conn, kind, user_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("User"))?;

                match held {
                    Some(current) => Self::assign(conn, kind, &current, None, actor).await,
                    None => Ok(AssignmentOutcome {
                        previous_holder: None,
                        holder: None,
                        changed: false,
                    }),
                }
            }
        }
    }

    /// Lock whatever cars and routes a user holds, ahead of the user row
    pub async fn lock_user_assets(conn: &mut PgConnection, user_id: &Uuid) -> AppResult<()> {
        for kind in [AssetKind::Car, AssetKind::Route] {
            AssignmentRepository::lock_held_by(&mut *conn, kind, user_id).await?;
        }
        Ok(())
    }

    /// Tell the new holder about the assignment. Runs after commit; lookup
    /// failures are logged and swallowed.
    pub async fn notify(
        pool: &PgPool,
        mailer: &dyn Mailer,
        kind: AssetKind,
        asset_id: &Uuid,
        outcome: &AssignmentOutcome,
    ) {
        let Some(user_id) = outcome.newly_assigned() else {
            return;
        };

        if let Err(e) = Self::send_notification(pool, mailer, kind, asset_id, &user_id).await {
            warn!(asset_id = %asset_id, user_id = %user_id, error = %e, "Assignment notification skipped");
        }
    }

    async fn send_notification(
        pool: &PgPool,
        mailer: &dyn Mailer,
        kind: AssetKind,
        asset_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let email = match kind {
            AssetKind::Car => {
                let car = CarRepository::find_by_id(pool, asset_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Car"))?;
                MailService::car_assigned(&user.email, &car.name, &car.license_plate)
            }
            AssetKind::Route => {
                let route = RouteRepository::find_by_id(pool, asset_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Route"))?;
                MailService::route_assigned(&user.email, &route.name)
            }
        };

        MailService::deliver(mailer, email).await;
        Ok(())
    }
}
