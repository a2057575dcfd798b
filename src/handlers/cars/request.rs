//! Car request DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{car_owner, car_status},
    db::repositories::{CarChanges, NewCar},
    utils::{
        sanitize_string,
        serde_ext::{blank_date, patch_date},
        validation::{validate_car_owner, validate_car_status},
    },
};

/// Create car request. Empty date strings mean "no date".
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 20))]
    pub license_plate: String,

    #[validate(custom(function = "validate_car_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_car_owner"))]
    pub owner: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "blank_date")]
    pub checkup_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "blank_date")]
    pub oil_change_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "blank_date")]
    pub tires_change_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "blank_date")]
    pub brakes_change_date: Option<NaiveDate>,
}

impl From<CreateCarRequest> for NewCar {
    fn from(req: CreateCarRequest) -> Self {
        NewCar {
            name: sanitize_string(&req.name),
            license_plate: sanitize_string(&req.license_plate).to_uppercase(),
            status: req.status.unwrap_or_else(|| car_status::AVAILABLE.to_string()),
            owner: req.owner.unwrap_or_else(|| car_owner::OWN_COMPANY.to_string()),
            description: req.description,
            checkup_date: req.checkup_date,
            oil_change_date: req.oil_change_date,
            tires_change_date: req.tires_change_date,
            brakes_change_date: req.brakes_change_date,
        }
    }
}

/// Partial car update. Dates accept `null` or `""` to clear.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub license_plate: Option<String>,

    #[validate(custom(function = "validate_car_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_car_owner"))]
    pub owner: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "patch_date")]
    pub checkup_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "patch_date")]
    pub oil_change_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "patch_date")]
    pub tires_change_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "patch_date")]
    pub brakes_change_date: Option<Option<NaiveDate>>,

    pub active: Option<bool>,
}

impl From<UpdateCarRequest> for CarChanges {
    fn from(req: UpdateCarRequest) -> Self {
        CarChanges {
            name: req.name.map(|n| sanitize_string(&n)),
            license_plate: req
                .license_plate
                .map(|p| sanitize_string(&p).to_uppercase()),
            status: req.status,
            owner: req.owner,
            description: req.description,
            checkup_date: req.checkup_date,
            oil_change_date: req.oil_change_date,
            tires_change_date: req.tires_change_date,
            brakes_change_date: req.brakes_change_date,
            active: req.active,
        }
    }
}

/// `null` or a missing id takes the car back
#[derive(Debug, Deserialize)]
pub struct AssignCarRequest {
    pub assigned_user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarStatusRequest {
    #[validate(custom(function = "validate_car_status"))]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let req: CreateCarRequest = serde_json::from_str(
            r#"{"name": "Van 3", "license_plate": "aa-12-bb", "checkup_date": ""}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let car = NewCar::from(req);
        assert_eq!(car.status, "available");
        assert_eq!(car.owner, "own_company");
        assert_eq!(car.license_plate, "AA-12-BB");
        assert_eq!(car.checkup_date, None);
    }

    #[test]
    fn test_bad_status_and_owner_rejected() {
        let req: CreateCarRequest = serde_json::from_str(
            r#"{"name": "Van", "license_plate": "X", "status": "stolen"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());

        let req: UpdateCarRequest = serde_json::from_str(r#"{"owner": "someone"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_can_clear_dates() {
        let req: UpdateCarRequest =
            serde_json::from_str(r#"{"oil_change_date": "", "brakes_change_date": "2024-06-01"}"#)
                .unwrap();
        let changes = CarChanges::from(req);
        assert_eq!(changes.oil_change_date, Some(None));
        assert_eq!(
            changes.brakes_change_date,
            Some(NaiveDate::from_ymd_opt(2024, 6, 1))
        );
        assert_eq!(changes.checkup_date, None);
    }
}
