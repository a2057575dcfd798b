//! Region service
//!
//! Leaders only see regions they lead. Anything else looks missing to them.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{ProfileChanges, RegionRepository, RouteRepository, UserRepository},
    error::{AppError, AppResult},
    middleware::AuthenticatedUser,
    models::{Region, Role, Route, UserSummary},
    services::user_service::UserService,
};

/// Region with its leader and routes
#[derive(Debug, Clone)]
pub struct RegionDetails {
    pub region: Region,
    pub leader: Option<UserSummary>,
    pub routes: Vec<Route>,
}

pub struct RegionService;

impl RegionService {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        leader_id: Option<Uuid>,
        actor: &Uuid,
    ) -> AppResult<RegionDetails> {
        let mut tx = pool.begin().await?;
        let region = RegionRepository::create(&mut *tx, name, description, None, actor).await?;
        if let Some(leader_id) = leader_id {
            Self::assign_leader(&mut *tx, &region.id, &leader_id, actor).await?;
        }
        tx.commit().await?;

        info!(
            region_id = %region.id,
            name = %region.name,
            leader_id = ?leader_id,
            "Region created"
        );
        Self::details(pool, &region.id).await
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<RegionDetails>> {
        let regions = RegionRepository::list(pool).await?;
        Self::with_relations(pool, regions).await
    }

    /// Regions led by the caller
    pub async fn my_regions(pool: &PgPool, leader_id: &Uuid) -> AppResult<Vec<RegionDetails>> {
        let regions = RegionRepository::find_by_leader(pool, leader_id).await?;
        Self::with_relations(pool, regions).await
    }

    /// One region, hidden from leaders who do not lead it
    pub async fn get_visible(
        pool: &PgPool,
        actor: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<RegionDetails> {
        let details = Self::details(pool, id).await?;
        if actor.is_leader() && details.region.leader_id != Some(actor.id) {
            return Err(Self::hidden());
        }
        Ok(details)
    }

    pub async fn routes_visible(
        pool: &PgPool,
        actor: &AuthenticatedUser,
        id: &Uuid,
    ) -> AppResult<Vec<Route>> {
        Ok(Self::get_visible(pool, actor, id).await?.routes)
    }

    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        name: Option<&str>,
        description: Option<&str>,
        actor: &Uuid,
    ) -> AppResult<RegionDetails> {
        Self::get(pool, id).await?;
        RegionRepository::update(pool, id, name, description, actor).await?;
        info!(region_id = %id, actor = %actor, "Region updated");
        Self::details(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        if !RegionRepository::delete(pool, id).await? {
            return Err(AppError::not_found("Region"));
        }
        info!(region_id = %id, "Region deleted");
        Ok(())
    }

    /// Move routes into the region. Every id must exist.
    pub async fn add_routes(
        pool: &PgPool,
        id: &Uuid,
        route_ids: &[Uuid],
        actor: &Uuid,
    ) -> AppResult<RegionDetails> {
        Self::get(pool, id).await?;

        let mut wanted = route_ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let found = RouteRepository::find_by_ids(pool, &wanted).await?;
        if found.len() != wanted.len() {
            return Err(AppError::NotFound("One or more routes not found".to_string()));
        }

        let mut tx = pool.begin().await?;
        let moved = RouteRepository::attach_to_region(&mut *tx, id, &wanted, actor).await?;
        tx.commit().await?;

        info!(region_id = %id, routes = moved, "Routes added to region");
        Self::details(pool, id).await
    }

    pub async fn remove_route(
        pool: &PgPool,
        id: &Uuid,
        route_id: &Uuid,
        actor: &Uuid,
    ) -> AppResult<()> {
        Self::get(pool, id).await?;
        if !RouteRepository::detach_from_region(pool, id, route_id, actor).await? {
            return Err(AppError::NotFound("Route not found in this region".to_string()));
        }
        info!(region_id = %id, route_id = %route_id, "Route removed from region");
        Ok(())
    }

    /// Make a user the region's leader, promoting plain users
    pub async fn set_leader(
        pool: &PgPool,
        id: &Uuid,
        leader_id: &Uuid,
        actor: &Uuid,
    ) -> AppResult<RegionDetails> {
        Self::get(pool, id).await?;

        let mut tx = pool.begin().await?;
        Self::assign_leader(&mut *tx, id, leader_id, actor).await?;
        tx.commit().await?;

        info!(region_id = %id, leader_id = %leader_id, "Region leader set");
        Self::details(pool, id).await
    }

    /// Make `leader_id` lead the region, promoting plain users
    async fn assign_leader(
        conn: &mut PgConnection,
        id: &Uuid,
        leader_id: &Uuid,
        actor: &Uuid,
    ) -> AppResult<()> {
        let leader = UserRepository::find_by_id_for_update(&mut *conn, leader_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if leader.role() == Role::User {
            Self::change_role(&mut *conn, leader_id, Role::Leader, actor).await?;
        }
        RegionRepository::set_leader(&mut *conn, id, Some(*leader_id), actor).await?;
        Ok(())
    }

    /// Clear the leader; a leader left without regions becomes a plain user
    pub async fn remove_leader(pool: &PgPool, id: &Uuid, actor: &Uuid) -> AppResult<RegionDetails> {
        let region = Self::get(pool, id).await?;
        let leader_id = region
            .leader_id
            .ok_or_else(|| AppError::BadRequest("Region does not have a leader".to_string()))?;

        let mut tx = pool.begin().await?;
        RegionRepository::set_leader(&mut *tx, id, None, actor).await?;

        let remaining = RegionRepository::count_led_by(&mut *tx, &leader_id).await?;
        if remaining == 0
            && let Some(leader) = UserRepository::find_by_id_for_update(&mut *tx, &leader_id).await?
            && leader.role() == Role::Leader
        {
            Self::change_role(&mut *tx, &leader_id, Role::User, actor).await?;
        }
        tx.commit().await?;

        info!(region_id = %id, leader_id = %leader_id, "Region leader removed");
        Self::details(pool, id).await
    }

    async fn get(pool: &PgPool, id: &Uuid) -> AppResult<Region> {
        RegionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Region"))
    }

    async fn details(pool: &PgPool, id: &Uuid) -> AppResult<RegionDetails> {
        let region = Self::get(pool, id).await?;
        let mut details = Self::with_relations(pool, vec![region]).await?;
        details.pop().ok_or_else(|| AppError::not_found("Region"))
    }

    async fn with_relations(pool: &PgPool, regions: Vec<Region>) -> AppResult<Vec<RegionDetails>> {
        let region_ids: Vec<Uuid> = regions.iter().map(|r| r.id).collect();
        let leaders = UserService::summaries(pool, regions.iter().filter_map(|r| r.leader_id)).await?;

        let mut routes_by_region: HashMap<Uuid, Vec<Route>> = HashMap::new();
        for route in RouteRepository::find_by_regions(pool, &region_ids).await? {
            if let Some(region_id) = route.region_id {
                routes_by_region.entry(region_id).or_default().push(route);
            }
        }

        Ok(regions
            .into_iter()
            .map(|region| RegionDetails {
                leader: region.leader_id.and_then(|id| leaders.get(&id).cloned()),
                routes: routes_by_region.remove(&region.id).unwrap_or_default(),
                region,
            })
            .collect())
    }

    async fn change_role(
        conn: &mut PgConnection,
        user_id: &Uuid,
        role: Role,
        actor: &Uuid,
    ) -> AppResult<()> {
        let changes = ProfileChanges {
            role: Some(role.as_str().to_string()),
            ..Default::default()
        };
        UserRepository::update(conn, user_id, &changes, Some(*actor)).await?;
        info!(user_id = %user_id, role = %role, "Role changed with region leadership");
        Ok(())
    }

    fn hidden() -> AppError {
        AppError::NotFound("Region not found or access denied".to_string())
    }
}
