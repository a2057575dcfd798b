//! Complaint request DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::complaint_status,
    error::{AppError, AppResult},
    models::{ComplaintFilter, NewComplaint},
    utils::{
        sanitize_string,
        validation::{validate_amount, validate_complaint_status},
    },
};

/// One complaint of a bulk import
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComplaintRequest {
    #[validate(range(min = 1))]
    pub complaint_number: i32,

    #[validate(length(min = 1, max = 255))]
    pub client: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 100))]
    pub problem_type: String,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_amount"))]
    pub compensation_value: Option<Decimal>,

    #[validate(length(min = 1, max = 255))]
    pub courier: String,

    #[validate(length(min = 1))]
    pub address: String,

    pub delivery_date: NaiveDate,

    pub comments: Option<String>,

    pub user_id: Option<Uuid>,

    #[validate(custom(function = "validate_complaint_status"))]
    pub status: Option<String>,
}

impl From<CreateComplaintRequest> for NewComplaint {
    fn from(req: CreateComplaintRequest) -> Self {
        NewComplaint {
            complaint_number: req.complaint_number,
            client: sanitize_string(&req.client),
            description: req.description.trim().to_string(),
            problem_type: sanitize_string(&req.problem_type),
            compensation_value: req.compensation_value.map(|v| v.round_dp(2)),
            courier: sanitize_string(&req.courier),
            address: sanitize_string(&req.address),
            delivery_date: req.delivery_date,
            comments: req.comments,
            user_id: req.user_id,
            status: req
                .status
                .unwrap_or_else(|| complaint_status::EMPTY.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkAssignRequest {
    #[validate(length(min = 1, message = "At least one complaint is required"))]
    pub complaint_ids: Vec<i32>,

    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkStatusRequest {
    #[validate(length(min = 1, message = "At least one complaint is required"))]
    pub complaint_ids: Vec<i32>,

    #[validate(custom(function = "validate_complaint_status"))]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(custom(function = "validate_complaint_status"))]
    pub status: String,
}

/// Listing query: pagination, filters and sorting
#[derive(Debug, Deserialize)]
pub struct ComplaintQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search_address: Option<String>,
    pub search_client: Option<String>,
    pub search_courier: Option<String>,
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub month: Option<i32>,
    pub problem_type: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ComplaintQuery {
    /// `ASC` or `DESC` in any case; descending when absent
    pub fn descending(&self) -> AppResult<bool> {
        match self.sort_order.as_deref() {
            None => Ok(true),
            Some(order) if order.eq_ignore_ascii_case("desc") => Ok(true),
            Some(order) if order.eq_ignore_ascii_case("asc") => Ok(false),
            Some(_) => Err(AppError::BadRequest(
                "sort_order must be ASC or DESC".to_string(),
            )),
        }
    }

    pub fn filter(&self) -> ComplaintFilter {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        ComplaintFilter {
            search_address: non_empty(&self.search_address),
            search_client: non_empty(&self.search_client),
            search_courier: non_empty(&self.search_courier),
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
            problem_type: non_empty(&self.problem_type),
            status: non_empty(&self.status),
            month: self.month,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(json: &str) -> ComplaintQuery {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_create_defaults_to_empty_status() {
        let req: CreateComplaintRequest = serde_json::from_str(
            r#"{
                "complaint_number": 7,
                "client": "  ACME  ",
                "description": "Parcel damaged",
                "problem_type": "damage",
                "compensation_value": 12.346,
                "courier": "Dana",
                "address": "Main St 1",
                "delivery_date": "2024-03-04"
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let new = NewComplaint::from(req);
        assert_eq!(new.status, "empty");
        assert_eq!(new.client, "ACME");
        assert_eq!(new.compensation_value, Some(Decimal::new(1235, 2)));
    }

    #[test]
    fn test_compensation_must_fit_money_column() {
        let req: CreateComplaintRequest = serde_json::from_str(
            r#"{
                "complaint_number": 8,
                "client": "ACME",
                "description": "Late",
                "problem_type": "delay",
                "compensation_value": 100000000000,
                "courier": "Dana",
                "address": "Main St 1",
                "delivery_date": "2024-03-04"
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let req: BulkStatusRequest =
            serde_json::from_str(r#"{"complaint_ids": [1], "status": "lost"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: BulkStatusRequest =
            serde_json::from_str(r#"{"complaint_ids": [], "status": "accepted"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_sort_order() {
        assert!(query("{}").descending().unwrap());
        assert!(!query(r#"{"sort_order": "asc"}"#).descending().unwrap());
        assert!(query(r#"{"sort_order": "DESC"}"#).descending().unwrap());
        assert!(query(r#"{"sort_order": "sideways"}"#).descending().is_err());
    }

    #[test]
    fn test_blank_searches_ignored() {
        let filter = query(r#"{"search_client": "  ", "search_courier": "dana", "page": 2}"#).filter();
        assert_eq!(filter.search_client, None);
        assert_eq!(filter.search_courier.as_deref(), Some("dana"));
    }
}
