//! Work entry service
//!
//! Financials are never stored. Every read loads the pay rates once and
//! prices each returned entry with them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{
        CarRepository, RouteRepository, UserRepository, WorkEntryFilter, WorkEntryRepository,
    },
    error::{AppError, AppResult},
    middleware::AuthenticatedUser,
    models::{Financials, Rates, WorkEntryRow},
    services::setting_service::SettingService,
    utils::month_containing,
};

/// An entry with its derived money figures
#[derive(Debug, Clone)]
pub struct PricedEntry {
    pub row: WorkEntryRow,
    pub financials: Financials,
}

impl PricedEntry {
    pub fn price(row: WorkEntryRow, rates: &Rates) -> Self {
        let financials = Financials::compute(
            row.stops_completed,
            row.car_owner.as_deref(),
            row.user_paid_per_stop,
            rates,
        );
        Self { row, financials }
    }
}

/// Totals over a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_stops: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_driver_pay: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_profit: Decimal,
}

impl Totals {
    pub fn of(entries: &[PricedEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            acc.total_stops += i64::from(entry.row.stops_completed);
            acc.total_revenue += entry.financials.revenue;
            acc.total_driver_pay += entry.financials.driver_pay;
            acc.total_profit += entry.financials.company_profit;
            acc
        })
    }
}

/// Fields of a new entry; omitted route/car fall back to the caller's assignment
#[derive(Debug, Clone)]
pub struct NewWorkEntry {
    pub stops_completed: i32,
    pub work_date: NaiveDate,
    pub route_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
}

/// Partial update; route and car are tri-state
#[derive(Debug, Clone, Default)]
pub struct WorkEntryChanges {
    pub stops_completed: Option<i32>,
    pub work_date: Option<NaiveDate>,
    pub route_id: Option<Option<Uuid>>,
    pub car_id: Option<Option<Uuid>>,
}

pub struct WorkEntryService;

impl WorkEntryService {
    pub async fn create(
        pool: &PgPool,
        user_id: &Uuid,
        new: NewWorkEntry,
    ) -> AppResult<PricedEntry> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let route_id = new.route_id.or(user.route_id);
        let car_id = new.car_id.or(user.car_id);
        Self::ensure_references(pool, route_id, car_id).await?;

        let entry = WorkEntryRepository::create(
            pool,
            user_id,
            route_id,
            car_id,
            new.stops_completed,
            new.work_date,
        )
        .await?;
        info!(
            entry_id = %entry.id,
            user_id = %user_id,
            stops = entry.stops_completed,
            work_date = %entry.work_date,
            "Work entry created"
        );

        Self::priced(pool, &entry.id).await
    }

    /// The caller's own entries, optionally limited to one calendar month
    pub async fn my_entries(
        pool: &PgPool,
        user_id: &Uuid,
        month: Option<NaiveDate>,
    ) -> AppResult<Vec<PricedEntry>> {
        let mut filter = WorkEntryFilter {
            user_id: Some(*user_id),
            ..Default::default()
        };
        if let Some(month) = month {
            let (start, end) = month_containing(month)?;
            filter.start_date = Some(start);
            filter.end_date = Some(end);
        }

        Self::find_priced(pool, &filter).await
    }

    /// Management listing. A date range applies only when both ends are given.
    pub async fn list(
        pool: &PgPool,
        actor: &AuthenticatedUser,
        filter: WorkEntryFilter,
    ) -> AppResult<Vec<PricedEntry>> {
        let filter = Self::scoped(actor, filter);
        Self::find_priced(pool, &filter).await
    }

    pub async fn summary(
        pool: &PgPool,
        actor: &AuthenticatedUser,
        filter: WorkEntryFilter,
    ) -> AppResult<(Totals, Vec<PricedEntry>)> {
        let entries = Self::list(pool, actor, filter).await?;
        Ok((Totals::of(&entries), entries))
    }

    /// Entry owners and admins may read a single entry
    pub async fn get(pool: &PgPool, actor: &AuthenticatedUser, id: &Uuid) -> AppResult<PricedEntry> {
        let entry = Self::priced(pool, id).await?;
        if entry.row.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "You can only view your own work entries".to_string(),
            ));
        }
        Ok(entry)
    }

    pub async fn update(
        pool: &PgPool,
        user_id: &Uuid,
        id: &Uuid,
        changes: WorkEntryChanges,
    ) -> AppResult<PricedEntry> {
        let entry = WorkEntryRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Work entry"))?;
        if entry.user_id != *user_id {
            return Err(AppError::Forbidden(
                "You can only edit your own work entries".to_string(),
            ));
        }

        Self::ensure_references(pool, changes.route_id.flatten(), changes.car_id.flatten()).await?;

        WorkEntryRepository::update(
            pool,
            id,
            changes.route_id,
            changes.car_id,
            changes.stops_completed,
            changes.work_date,
        )
        .await?;
        info!(entry_id = %id, user_id = %user_id, "Work entry updated");

        Self::priced(pool, id).await
    }

    pub async fn delete(pool: &PgPool, user_id: &Uuid, id: &Uuid) -> AppResult<()> {
        let entry = WorkEntryRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Work entry"))?;
        if entry.user_id != *user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own work entries".to_string(),
            ));
        }

        WorkEntryRepository::delete(pool, id).await?;
        info!(entry_id = %id, user_id = %user_id, "Work entry deleted");
        Ok(())
    }

    /// Leaders only see entries on routes in regions they lead
    fn scoped(actor: &AuthenticatedUser, mut filter: WorkEntryFilter) -> WorkEntryFilter {
        if filter.start_date.is_none() || filter.end_date.is_none() {
            filter.start_date = None;
            filter.end_date = None;
        }
        filter.leader_id = actor.is_leader().then_some(actor.id);
        filter
    }

    async fn find_priced(pool: &PgPool, filter: &WorkEntryFilter) -> AppResult<Vec<PricedEntry>> {
        let rates = SettingService::rates(pool).await?;
        let rows = WorkEntryRepository::find_rows(pool, filter).await?;
        Ok(rows
            .into_iter()
            .map(|row| PricedEntry::price(row, &rates))
            .collect())
    }

    async fn priced(pool: &PgPool, id: &Uuid) -> AppResult<PricedEntry> {
        let row = WorkEntryRepository::find_row(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Work entry"))?;
        let rates = SettingService::rates(pool).await?;
        Ok(PricedEntry::price(row, &rates))
    }

    async fn ensure_references(
        pool: &PgPool,
        route_id: Option<Uuid>,
        car_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(route_id) = route_id
            && RouteRepository::find_by_id(pool, &route_id).await?.is_none()
        {
            return Err(AppError::not_found("Route"));
        }
        if let Some(car_id) = car_id
            && CarRepository::find_by_id(pool, &car_id).await?.is_none()
        {
            return Err(AppError::not_found("Car"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::Role;

    fn row(stops: i32, owner: Option<&str>, pay: &str) -> WorkEntryRow {
        WorkEntryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            route_id: None,
            car_id: None,
            stops_completed: stops,
            work_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user_email: "driver@example.com".to_string(),
            user_first_name: "Dana".to_string(),
            user_last_name: "Driver".to_string(),
            user_paid_per_stop: pay.parse().unwrap(),
            route_name: None,
            region_id: None,
            car_name: None,
            car_license_plate: None,
            car_owner: owner.map(str::to_string),
        }
    }

    fn actor(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "actor@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_totals_sum_every_entry() {
        let rates = Rates::default();
        let entries = vec![
            PricedEntry::price(row(100, Some("own_company"), "2.00"), &rates),
            PricedEntry::price(row(50, Some("parent_company"), "2.00"), &rates),
        ];

        let totals = Totals::of(&entries);
        assert_eq!(totals.total_stops, 150);
        assert_eq!(totals.total_revenue, Decimal::new(775, 0));
        assert_eq!(totals.total_driver_pay, Decimal::new(300, 0));
        assert_eq!(totals.total_profit, Decimal::new(475, 0));
    }

    #[test]
    fn test_totals_of_nothing_are_zero() {
        assert_eq!(Totals::of(&[]), Totals::default());
    }

    #[test]
    fn test_leaders_are_scoped_to_their_regions() {
        let leader = actor(Role::Leader);
        let filter = WorkEntryService::scoped(&leader, WorkEntryFilter::default());
        assert_eq!(filter.leader_id, Some(leader.id));

        let admin = actor(Role::Admin);
        let filter = WorkEntryService::scoped(&admin, WorkEntryFilter::default());
        assert_eq!(filter.leader_id, None);
    }

    #[test]
    fn test_half_open_date_range_is_dropped() {
        let filter = WorkEntryService::scoped(
            &actor(Role::Owner),
            WorkEntryFilter {
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                ..Default::default()
            },
        );
        assert_eq!(filter.start_date, None);
        assert_eq!(filter.end_date, None);
    }
}
