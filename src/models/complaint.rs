//! Customer complaint model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Complaint database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i32,
    pub complaint_number: i32,
    pub client: String,
    pub description: String,
    pub problem_type: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub compensation_value: Option<Decimal>,
    pub courier: String,
    pub address: String,
    pub delivery_date: NaiveDate,
    pub comments: Option<String>,
    pub user_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input row of a bulk import. The fields up to `delivery_date` identify a duplicate.
#[derive(Debug, Clone, Serialize)]
pub struct NewComplaint {
    pub complaint_number: i32,
    pub client: String,
    pub description: String,
    pub problem_type: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub compensation_value: Option<Decimal>,
    pub courier: String,
    pub address: String,
    pub delivery_date: NaiveDate,
    pub comments: Option<String>,
    pub user_id: Option<Uuid>,
    pub status: String,
}

/// Filters for the paginated complaint listing
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub search_address: Option<String>,
    pub search_client: Option<String>,
    pub search_courier: Option<String>,
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub problem_type: Option<String>,
    pub status: Option<String>,
    /// Calendar month (1-12) of the delivery date, any year
    pub month: Option<i32>,
}

/// Per-status aggregate row
#[derive(Debug, Clone, FromRow)]
pub struct ComplaintStatusStats {
    pub status: String,
    pub count: i64,
    /// Rows with a compensation value
    pub compensated: i64,
    pub total_compensation: Option<Decimal>,
}
