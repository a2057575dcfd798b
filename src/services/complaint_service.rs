//! Complaint service

use std::collections::BTreeMap;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, complaint_status},
    db::repositories::{ComplaintRepository, UserRepository, complaint_repo::order_clause},
    error::{AppError, AppResult},
    models::{Complaint, ComplaintFilter, ComplaintStatusStats, NewComplaint},
};

/// Result of a bulk import
#[derive(Debug, Clone, Serialize)]
pub struct BulkCreateResult {
    pub created: Vec<Complaint>,
    pub skipped: Vec<NewComplaint>,
    pub total_processed: usize,
    pub total_created: usize,
    pub total_skipped: usize,
    pub message: String,
}

/// Result of a bulk assign or status change
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BulkUpdateResult {
    pub success: bool,
    pub message: String,
    pub updated_count: u64,
    pub total_count: usize,
}

/// Page request after defaults and bounds are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(total: i64, page: PageRequest) -> Self {
        let limit = i64::from(page.limit);
        Self {
            total,
            page: page.page,
            limit: page.limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplaintPage {
    pub data: Vec<Complaint>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatsPeriod {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

/// Aggregates over a year and/or month
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComplaintStats {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_compensation: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_compensation: Decimal,
    pub compensation_by_status: BTreeMap<String, f64>,
    pub period: StatsPeriod,
}

impl ComplaintStats {
    /// Fold per-status rows. `by_status` always covers every status; the
    /// other figures honor the optional status filter.
    pub fn from_rows(
        rows: &[ComplaintStatusStats],
        status: Option<&str>,
        period: StatsPeriod,
    ) -> Self {
        let mut by_status: BTreeMap<String, i64> = complaint_status::ALL
            .iter()
            .map(|s| (s.to_string(), 0))
            .collect();
        let mut compensation_by_status: BTreeMap<String, f64> = complaint_status::ALL
            .iter()
            .map(|s| (s.to_string(), 0.0))
            .collect();

        let mut total = 0;
        let mut compensated = 0;
        let mut total_compensation = Decimal::ZERO;

        for row in rows {
            let sum = row.total_compensation.unwrap_or_default();
            by_status.insert(row.status.clone(), row.count);
            compensation_by_status.insert(row.status.clone(), sum.to_f64().unwrap_or_default());

            if status.is_none_or(|s| s == row.status) {
                total += row.count;
                compensated += row.compensated;
                total_compensation += sum;
            }
        }

        let average_compensation = if compensated > 0 {
            (total_compensation / Decimal::from(compensated)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        Self {
            total,
            by_status,
            total_compensation,
            average_compensation,
            compensation_by_status,
            period,
        }
    }
}

pub struct ComplaintService;

impl ComplaintService {
    /// Import complaints, skipping rows identical to a stored one
    pub async fn create_many(pool: &PgPool, items: Vec<NewComplaint>) -> AppResult<BulkCreateResult> {
        let total_processed = items.len();
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        for item in items {
            if ComplaintRepository::exists_duplicate(pool, &item).await? {
                skipped.push(item);
            } else {
                created.push(ComplaintRepository::create(pool, &item).await?);
            }
        }

        let message = format!(
            "Processed {} complaints: {} created, {} skipped as duplicates",
            total_processed,
            created.len(),
            skipped.len()
        );
        info!(
            processed = total_processed,
            created = created.len(),
            skipped = skipped.len(),
            "Complaints imported"
        );

        Ok(BulkCreateResult {
            total_created: created.len(),
            total_skipped: skipped.len(),
            created,
            skipped,
            total_processed,
            message,
        })
    }

    pub async fn list(
        pool: &PgPool,
        mut filter: ComplaintFilter,
        page: PageRequest,
        sort_by: Option<&str>,
        descending: bool,
    ) -> AppResult<ComplaintPage> {
        if filter.start_date.is_none() || filter.end_date.is_none() {
            filter.start_date = None;
            filter.end_date = None;
        }
        if let Some(month) = filter.month {
            Self::check_month(month)?;
        }

        let order = order_clause(sort_by, descending);
        let (data, total) = ComplaintRepository::list(
            pool,
            &filter,
            &order,
            i64::from(page.limit),
            page.offset(),
        )
        .await?;

        Ok(ComplaintPage {
            data,
            meta: PageMeta::new(total, page),
        })
    }

    pub async fn get(pool: &PgPool, id: i32) -> AppResult<Complaint> {
        ComplaintRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| Self::missing(id))
    }

    pub async fn assign(pool: &PgPool, id: i32, user_id: &Uuid) -> AppResult<Complaint> {
        Self::get(pool, id).await?;
        Self::ensure_user(pool, user_id).await?;

        let complaint = ComplaintRepository::assign(pool, id, user_id).await?;
        info!(complaint_id = id, user_id = %user_id, "Complaint assigned");
        Ok(complaint)
    }

    pub async fn set_status(pool: &PgPool, id: i32, status: &str) -> AppResult<Complaint> {
        Self::get(pool, id).await?;

        let complaint = ComplaintRepository::set_status(pool, id, status).await?;
        info!(complaint_id = id, status = %status, "Complaint status changed");
        Ok(complaint)
    }

    pub async fn bulk_assign(
        pool: &PgPool,
        ids: &[i32],
        user_id: &Uuid,
    ) -> AppResult<BulkUpdateResult> {
        Self::ensure_user(pool, user_id).await?;

        let updated = ComplaintRepository::bulk_assign(pool, ids, user_id).await?;
        info!(updated, requested = ids.len(), user_id = %user_id, "Complaints bulk assigned");

        Ok(Self::bulk_result(
            updated,
            ids.len(),
            format!("Successfully assigned user to {} complaints", updated),
        ))
    }

    pub async fn bulk_set_status(
        pool: &PgPool,
        ids: &[i32],
        status: &str,
    ) -> AppResult<BulkUpdateResult> {
        let updated = ComplaintRepository::bulk_set_status(pool, ids, status).await?;
        info!(updated, requested = ids.len(), status = %status, "Complaint statuses bulk updated");

        Ok(Self::bulk_result(
            updated,
            ids.len(),
            format!("Successfully updated status to {} for {} complaints", status, updated),
        ))
    }

    pub async fn delete(pool: &PgPool, id: i32) -> AppResult<()> {
        if !ComplaintRepository::delete(pool, id).await? {
            return Err(Self::missing(id));
        }
        info!(complaint_id = id, "Complaint deleted");
        Ok(())
    }

    pub async fn stats(
        pool: &PgPool,
        year: Option<i32>,
        month: Option<i32>,
        status: Option<&str>,
    ) -> AppResult<ComplaintStats> {
        if let Some(year) = year
            && !(1900..=9999).contains(&year)
        {
            return Err(AppError::BadRequest("Invalid year provided".to_string()));
        }
        if let Some(month) = month {
            Self::check_month(month)?;
        }

        let rows = ComplaintRepository::stats_by_status(pool, year, month).await?;
        Ok(ComplaintStats::from_rows(
            &rows,
            status,
            StatsPeriod { year, month },
        ))
    }

    fn bulk_result(updated: u64, requested: usize, message: String) -> BulkUpdateResult {
        if updated == 0 {
            return BulkUpdateResult {
                success: false,
                message: "No complaints found with the provided IDs".to_string(),
                updated_count: 0,
                total_count: requested,
            };
        }
        BulkUpdateResult {
            success: true,
            message,
            updated_count: updated,
            total_count: requested,
        }
    }

    fn check_month(month: i32) -> AppResult<()> {
        if (1..=12).contains(&month) {
            Ok(())
        } else {
            Err(AppError::BadRequest("Invalid month provided".to_string()))
        }
    }

    async fn ensure_user(pool: &PgPool, user_id: &Uuid) -> AppResult<()> {
        UserRepository::find_by_id(pool, user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("User"))
    }

    fn missing(id: i32) -> AppError {
        AppError::NotFound(format!("Complaint with ID {} not found", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(status: &str, count: i64, compensated: i64, sum: Option<&str>) -> ComplaintStatusStats {
        ComplaintStatusStats {
            status: status.to_string(),
            count,
            compensated,
            total_compensation: sum.map(|s| s.parse().unwrap()),
        }
    }

    fn period() -> StatsPeriod {
        StatsPeriod {
            year: Some(2024),
            month: None,
        }
    }

    #[test]
    fn test_page_defaults_and_bounds() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(500)), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_total_pages_round_up() {
        let meta = PageMeta::new(21, PageRequest::new(Some(1), Some(10)));
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PageMeta::new(0, PageRequest::new(None, None)).total_pages, 0);
    }

    #[test]
    fn test_stats_cover_every_status() {
        let stats = ComplaintStats::from_rows(&[stat("accepted", 2, 2, Some("30"))], None, period());
        assert_eq!(stats.by_status.len(), complaint_status::ALL.len());
        assert_eq!(stats.by_status["accepted"], 2);
        assert_eq!(stats.by_status["empty"], 0);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_compensation, Decimal::from(15));
    }

    #[test]
    fn test_status_filter_limits_totals_not_breakdown() {
        let rows = [
            stat("accepted", 2, 1, Some("40")),
            stat("rejected", 5, 0, None),
        ];
        let stats = ComplaintStats::from_rows(&rows, Some("rejected"), period());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.total_compensation, Decimal::ZERO);
        assert_eq!(stats.average_compensation, Decimal::ZERO);
        assert_eq!(stats.by_status["accepted"], 2);
        assert_eq!(stats.compensation_by_status["accepted"], 40.0);
    }

    #[test]
    fn test_average_ignores_uncompensated_rows() {
        let rows = [stat("resolved", 4, 3, Some("10"))];
        let stats = ComplaintStats::from_rows(&rows, None, period());
        assert_eq!(stats.average_compensation, "3.33".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_bulk_result_without_matches_fails() {
        let result = ComplaintService::bulk_result(0, 3, "unused".to_string());
        assert!(!result.success);
        assert_eq!(result.total_count, 3);

        let result = ComplaintService::bulk_result(2, 3, "ok".to_string());
        assert!(result.success);
        assert_eq!(result.updated_count, 2);
    }
}
