//! Car model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Car database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub license_plate: String,
    pub status: String,
    pub owner: String,
    pub description: Option<String>,
    pub checkup_date: Option<NaiveDate>,
    pub oil_change_date: Option<NaiveDate>,
    pub tires_change_date: Option<NaiveDate>,
    pub brakes_change_date: Option<NaiveDate>,
    pub assigned_user_id: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact car view embedded in users and work entries
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CarSummary {
    pub id: Uuid,
    pub name: String,
    pub license_plate: String,
    pub status: String,
    pub owner: String,
}
