//! Routes-list service: daily totals and stop transfers between them

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::RouteListRepository,
    error::{AppError, AppResult},
    models::{Period, RouteList, TransferAmount},
    utils::period_range,
};

/// Listing filters. A complete `period` + `month` + `year` triple replaces the date range.
#[derive(Debug, Clone, Default)]
pub struct RouteListFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub route: Option<String>,
    pub period: Option<Period>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl RouteListFilter {
    /// Effective inclusive date bounds
    pub fn date_bounds(&self) -> AppResult<(Option<NaiveDate>, Option<NaiveDate>)> {
        match (self.period, self.month, self.year) {
            (Some(period), Some(month), Some(year)) => {
                let (start, end) = period_range(period, year, month)?;
                Ok((Some(start), Some(end)))
            }
            _ => Ok((self.start_date, self.end_date)),
        }
    }
}

/// Where transferred stops go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferTarget {
    /// An existing record, by id
    Existing(i32),
    /// A helper record with this route name on the source's date, created if absent
    Helper(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferResult {
    pub source_route: RouteList,
    pub target_route: RouteList,
}

pub struct RouteListService;

impl RouteListService {
    pub async fn list(pool: &PgPool, filter: RouteListFilter) -> AppResult<Vec<RouteList>> {
        let (start, end) = filter.date_bounds()?;
        RouteListRepository::list(pool, start, end, filter.route.as_deref()).await
    }

    pub async fn get(pool: &PgPool, id: i32) -> AppResult<RouteList> {
        RouteListRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route list with ID {} not found", id)))
    }

    pub async fn rename(pool: &PgPool, id: i32, route: &str) -> AppResult<RouteList> {
        Self::get(pool, id).await?;
        let list = RouteListRepository::rename(pool, id, route).await?;
        info!(route_list_id = id, route = %route, "Route list renamed");
        Ok(list)
    }

    /// Move stops and packages off `source_id`, atomically, with both rows locked
    pub async fn transfer(
        pool: &PgPool,
        source_id: i32,
        target: TransferTarget,
        amount: TransferAmount,
    ) -> AppResult<TransferResult> {
        let mut tx = pool.begin().await?;

        let source = RouteListRepository::lock_by_id(&mut *tx, source_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Source route with ID {} not found", source_id))
            })?;
        source.ensure_can_give(amount)?;

        let target_route = match &target {
            TransferTarget::Existing(target_id) => {
                let found = RouteListRepository::lock_by_id(&mut *tx, *target_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Target route with ID {} not found", target_id))
                    })?;
                found.ensure_can_receive_from(&source, amount)?;
                RouteListRepository::adjust(&mut *tx, found.id, amount.stops, amount.packages)
                    .await?
            }
            TransferTarget::Helper(name) => {
                match RouteListRepository::lock_by_route_and_date(&mut *tx, name, source.date).await? {
                    Some(found) => {
                        found.ensure_can_receive_from(&source, amount)?;
                        RouteListRepository::adjust(&mut *tx, found.id, amount.stops, amount.packages)
                            .await?
                    }
                    None => {
                        RouteListRepository::create(
                            &mut *tx,
                            name,
                            source.date,
                            amount.stops,
                            amount.packages,
                        )
                        .await?
                    }
                }
            }
        };

        let source_route =
            RouteListRepository::adjust(&mut *tx, source.id, -amount.stops, -amount.packages)
                .await?;

        tx.commit().await?;

        info!(
            source_id = source_route.id,
            target_id = target_route.id,
            stops = amount.stops,
            packages = amount.packages,
            "Route list transfer completed"
        );

        Ok(TransferResult {
            source_route,
            target_route,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    #[test]
    fn test_period_overrides_dates() {
        let filter = RouteListFilter {
            start_date: d(2020, 1, 1),
            end_date: d(2020, 12, 31),
            period: Some(Period::Second),
            month: Some(2),
            year: Some(2024),
            ..Default::default()
        };
        assert_eq!(filter.date_bounds().unwrap(), (d(2024, 2, 16), d(2024, 2, 29)));
    }

    #[test]
    fn test_incomplete_period_keeps_dates() {
        let filter = RouteListFilter {
            start_date: d(2024, 3, 1),
            period: Some(Period::First),
            month: Some(3),
            ..Default::default()
        };
        assert_eq!(filter.date_bounds().unwrap(), (d(2024, 3, 1), None));
    }

    #[test]
    fn test_invalid_month_rejected() {
        let filter = RouteListFilter {
            period: Some(Period::First),
            month: Some(13),
            year: Some(2024),
            ..Default::default()
        };
        assert!(matches!(
            filter.date_bounds().unwrap_err(),
            AppError::BadRequest(_)
        ));
    }
}
