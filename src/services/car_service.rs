//! Car service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{AssetKind, CarChanges, CarRepository, NewCar},
    error::{AppError, AppResult},
    models::Car,
    services::{
        assignment_service::AssignmentService,
        mail_service::Mailer,
    },
};

pub struct CarService;

impl CarService {
    pub async fn create(pool: &PgPool, new: NewCar, actor: &Uuid) -> AppResult<Car> {
        let car = CarRepository::create(pool, &new, actor).await?;
        info!(car_id = %car.id, license_plate = %car.license_plate, "Car created");
        Ok(car)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Car>> {
        CarRepository::list(pool).await
    }

    pub async fn get(pool: &PgPool, id: &Uuid) -> AppResult<Car> {
        CarRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Car"))
    }

    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        changes: CarChanges,
        actor: &Uuid,
    ) -> AppResult<Car> {
        Self::get(pool, id).await?;
        let car = CarRepository::update(pool, id, &changes, actor).await?;
        info!(car_id = %id, actor = %actor, "Car updated");
        Ok(car)
    }

    pub async fn set_status(pool: &PgPool, id: &Uuid, status: &str, actor: &Uuid) -> AppResult<Car> {
        Self::get(pool, id).await?;
        let car = CarRepository::set_status(pool, id, status, actor).await?;
        info!(car_id = %id, status = %status, "Car status changed");
        Ok(car)
    }

    /// Hand the car to a user, or take it back with `None`
    pub async fn assign(
        pool: &PgPool,
        mailer: &dyn Mailer,
        id: &Uuid,
        user_id: Option<Uuid>,
        actor: &Uuid,
    ) -> AppResult<Car> {
        let mut tx = pool.begin().await?;
        let outcome = AssignmentService::assign(&mut *tx, AssetKind::Car, id, user_id, actor).await?;
        tx.commit().await?;

        AssignmentService::notify(pool, mailer, AssetKind::Car, id, &outcome).await;

        Self::get(pool, id).await
    }

    pub async fn soft_delete(pool: &PgPool, id: &Uuid, actor: &Uuid) -> AppResult<Car> {
        Self::get(pool, id).await?;
        let car = CarRepository::deactivate(pool, id, actor).await?;
        info!(car_id = %id, "Car deactivated");
        Ok(car)
    }

    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        let mut tx = pool.begin().await?;
        if !CarRepository::delete(&mut *tx, id).await? {
            return Err(AppError::not_found("Car"));
        }
        tx.commit().await?;

        info!(car_id = %id, "Car deleted");
        Ok(())
    }
}
