//! Work entry response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::Financials,
    services::work_entry_service::{PricedEntry, Totals},
};

#[derive(Debug, Serialize)]
pub struct EntryUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_per_stop: Decimal,
}

#[derive(Debug, Serialize)]
pub struct EntryRoute {
    pub id: Uuid,
    pub name: String,
    pub region_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct EntryCar {
    pub id: Uuid,
    pub name: String,
    pub license_plate: String,
    pub owner: String,
}

/// A work entry with the people and vehicles it references and its money figures
#[derive(Debug, Serialize)]
pub struct WorkEntryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub stops_completed: i32,
    pub work_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: EntryUser,
    pub route: Option<EntryRoute>,
    pub car: Option<EntryCar>,
    #[serde(flatten)]
    pub financials: Financials,
}

impl From<PricedEntry> for WorkEntryResponse {
    fn from(entry: PricedEntry) -> Self {
        let row = entry.row;

        let route = row.route_id.zip(row.route_name).map(|(id, name)| EntryRoute {
            id,
            name,
            region_id: row.region_id,
        });
        let car = match (row.car_id, row.car_name, row.car_license_plate, row.car_owner) {
            (Some(id), Some(name), Some(license_plate), Some(owner)) => Some(EntryCar {
                id,
                name,
                license_plate,
                owner,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            user_id: row.user_id,
            route_id: row.route_id,
            car_id: row.car_id,
            stops_completed: row.stops_completed,
            work_date: row.work_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: EntryUser {
                id: row.user_id,
                email: row.user_email,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
                paid_per_stop: row.user_paid_per_stop,
            },
            route,
            car,
            financials: entry.financials,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub totals: Totals,
    pub entries: Vec<WorkEntryResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rates, WorkEntryRow};

    #[test]
    fn test_response_carries_financials() {
        let car_id = Uuid::new_v4();
        let row = WorkEntryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            route_id: None,
            car_id: Some(car_id),
            stops_completed: 10,
            work_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user_email: "driver@example.com".to_string(),
            user_first_name: "Dana".to_string(),
            user_last_name: "Driver".to_string(),
            user_paid_per_stop: Decimal::new(2, 0),
            route_name: None,
            region_id: None,
            car_name: Some("Van 1".to_string()),
            car_license_plate: Some("AB-123".to_string()),
            car_owner: Some("own_company".to_string()),
        };

        let response = WorkEntryResponse::from(PricedEntry::price(row, &Rates::default()));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["revenue"], 60.0);
        assert_eq!(json["driver_pay"], 20.0);
        assert_eq!(json["company_profit"], 40.0);
        assert_eq!(json["car"]["id"], car_id.to_string());
        assert!(json["route"].is_null());
        assert_eq!(json["user"]["paid_per_stop"], 2.0);
    }
}
