//! Route service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{AssetKind, RegionRepository, RouteRepository},
    error::{AppError, AppResult},
    models::Route,
    services::{assignment_service::AssignmentService, mail_service::Mailer},
};

/// Partial route update; `region_id: Some(None)` detaches the route
#[derive(Debug, Clone, Default)]
pub struct RouteChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub region_id: Option<Option<Uuid>>,
    pub active: Option<bool>,
}

pub struct RouteService;

impl RouteService {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        region_id: Option<Uuid>,
        actor: &Uuid,
    ) -> AppResult<Route> {
        if let Some(region_id) = region_id {
            Self::ensure_region(pool, &region_id).await?;
        }

        let route = RouteRepository::create(pool, name, description, region_id, actor).await?;
        info!(route_id = %route.id, name = %route.name, "Route created");
        Ok(route)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Route>> {
        RouteRepository::list(pool).await
    }

    pub async fn get(pool: &PgPool, id: &Uuid) -> AppResult<Route> {
        RouteRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Route"))
    }

    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        changes: RouteChanges,
        actor: &Uuid,
    ) -> AppResult<Route> {
        Self::get(pool, id).await?;
        if let Some(Some(region_id)) = changes.region_id {
            Self::ensure_region(pool, &region_id).await?;
        }

        let route = RouteRepository::update(
            pool,
            id,
            changes.name.as_deref(),
            changes.description.as_deref(),
            changes.region_id,
            changes.active,
            actor,
        )
        .await?;
        info!(route_id = %id, actor = %actor, "Route updated");
        Ok(route)
    }

    /// Hand the route to a user, or take it back with `None`
    pub async fn assign(
        pool: &PgPool,
        mailer: &dyn Mailer,
        id: &Uuid,
        user_id: Option<Uuid>,
        actor: &Uuid,
    ) -> AppResult<Route> {
        let mut tx = pool.begin().await?;
        let outcome =
            AssignmentService::assign(&mut *tx, AssetKind::Route, id, user_id, actor).await?;
        tx.commit().await?;

        AssignmentService::notify(pool, mailer, AssetKind::Route, id, &outcome).await;

        Self::get(pool, id).await
    }

    pub async fn soft_delete(pool: &PgPool, id: &Uuid, actor: &Uuid) -> AppResult<Route> {
        Self::get(pool, id).await?;
        let route = RouteRepository::deactivate(pool, id, actor).await?;
        info!(route_id = %id, "Route deactivated");
        Ok(route)
    }

    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        let mut tx = pool.begin().await?;
        if !RouteRepository::delete(&mut *tx, id).await? {
            return Err(AppError::not_found("Route"));
        }
        tx.commit().await?;

        info!(route_id = %id, "Route deleted");
        Ok(())
    }

    async fn ensure_region(pool: &PgPool, region_id: &Uuid) -> AppResult<()> {
        RegionRepository::find_by_id(pool, region_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Region"))
    }
}
