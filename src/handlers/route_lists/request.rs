//! Routes-list request DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Period, TransferAmount},
    services::route_list_service::{RouteListFilter, TransferTarget},
    utils::sanitize_string,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RouteListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub route: Option<String>,
    pub period: Option<Period>,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl From<RouteListQuery> for RouteListFilter {
    fn from(q: RouteListQuery) -> Self {
        RouteListFilter {
            start_date: q.start_date,
            end_date: q.end_date,
            route: q.route.filter(|r| !r.trim().is_empty()),
            period: q.period,
            month: q.month,
            year: q.year,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenameRouteListRequest {
    #[validate(length(min = 1, max = 100))]
    pub route: String,
}

/// Move stops and packages to another record. An id picks an existing
/// record; otherwise `target_route` names a helper on the same date.
#[derive(Debug, Deserialize, Validate)]
pub struct TransferRequest {
    #[validate(length(max = 100))]
    pub target_route: Option<String>,

    pub target_route_id: Option<i32>,

    #[validate(range(min = 0))]
    pub number_of_stops: i32,

    #[validate(range(min = 0))]
    pub number_of_packages: i32,
}

impl TransferRequest {
    pub fn target(&self) -> AppResult<TransferTarget> {
        if let Some(id) = self.target_route_id {
            return Ok(TransferTarget::Existing(id));
        }
        match self.target_route.as_deref().map(sanitize_string) {
            Some(name) if !name.is_empty() => Ok(TransferTarget::Helper(name)),
            _ => Err(AppError::BadRequest(
                "Either target_route_id or target_route is required".to_string(),
            )),
        }
    }

    pub fn amount(&self) -> TransferAmount {
        TransferAmount {
            stops: self.number_of_stops,
            packages: self.number_of_packages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(json: &str) -> TransferRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_id_wins_over_name() {
        let req = transfer(
            r#"{"target_route": "Helper", "target_route_id": 4, "number_of_stops": 3, "number_of_packages": 5}"#,
        );
        assert_eq!(req.target().unwrap(), TransferTarget::Existing(4));
    }

    #[test]
    fn test_name_selects_helper() {
        let req = transfer(
            r#"{"target_route": " Helper A ", "number_of_stops": 3, "number_of_packages": 0}"#,
        );
        assert_eq!(
            req.target().unwrap(),
            TransferTarget::Helper("Helper A".to_string())
        );
    }

    #[test]
    fn test_target_required() {
        let req =
            transfer(r#"{"target_route": "  ", "number_of_stops": 1, "number_of_packages": 1}"#);
        assert!(req.target().is_err());
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        let q: RouteListQuery =
            serde_json::from_str(r#"{"period": "first", "month": 13, "year": 2024}"#).unwrap();
        assert!(q.validate().is_err());
    }
}
