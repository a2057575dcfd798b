//! Work entry request DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::repositories::WorkEntryFilter,
    services::work_entry_service::{NewWorkEntry, WorkEntryChanges},
    utils::serde_ext::double_option,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkEntryRequest {
    #[validate(range(min = 0, message = "Stops completed cannot be negative"))]
    pub stops_completed: i32,

    pub work_date: NaiveDate,

    pub route_id: Option<Uuid>,

    pub car_id: Option<Uuid>,
}

impl From<CreateWorkEntryRequest> for NewWorkEntry {
    fn from(req: CreateWorkEntryRequest) -> Self {
        NewWorkEntry {
            stops_completed: req.stops_completed,
            work_date: req.work_date,
            route_id: req.route_id,
            car_id: req.car_id,
        }
    }
}

/// Partial update. `null` clears the route or car.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWorkEntryRequest {
    #[validate(range(min = 0, message = "Stops completed cannot be negative"))]
    pub stops_completed: Option<i32>,

    pub work_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "double_option")]
    pub route_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub car_id: Option<Option<Uuid>>,
}

impl From<UpdateWorkEntryRequest> for WorkEntryChanges {
    fn from(req: UpdateWorkEntryRequest) -> Self {
        WorkEntryChanges {
            stops_completed: req.stops_completed,
            work_date: req.work_date,
            route_id: req.route_id,
            car_id: req.car_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MyEntriesQuery {
    pub month: Option<NaiveDate>,
}

/// Filters for the management listing
#[derive(Debug, Deserialize)]
pub struct WorkEntryQuery {
    pub user_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<WorkEntryQuery> for WorkEntryFilter {
    fn from(q: WorkEntryQuery) -> Self {
        WorkEntryFilter {
            user_id: q.user_id,
            route_id: q.route_id,
            car_id: q.car_id,
            region_id: q.region_id,
            start_date: q.start_date,
            end_date: q.end_date,
            leader_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub user_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<SummaryQuery> for WorkEntryFilter {
    fn from(q: SummaryQuery) -> Self {
        WorkEntryFilter {
            user_id: q.user_id,
            region_id: q.region_id,
            start_date: q.start_date,
            end_date: q.end_date,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_stops_rejected() {
        let req: CreateWorkEntryRequest =
            serde_json::from_str(r#"{"stops_completed": -1, "work_date": "2024-05-02"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateWorkEntryRequest =
            serde_json::from_str(r#"{"stops_completed": -5}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_can_clear_car() {
        let req: UpdateWorkEntryRequest = serde_json::from_str(r#"{"car_id": null}"#).unwrap();
        let changes = WorkEntryChanges::from(req);
        assert_eq!(changes.car_id, Some(None));
        assert_eq!(changes.route_id, None);
    }
}
