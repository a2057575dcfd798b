//! User request DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH},
    db::repositories::ProfileChanges,
    services::user_service::AdminUserUpdate,
    utils::{sanitize_string, serde_ext::double_option, validation::validate_role},
};

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| sanitize_string(&v))
}

/// Self-service profile edit
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 20))]
    pub post_code: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub street: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub house_number: Option<String>,

    #[validate(length(min = 1, max = 30))]
    pub phone_number: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileChanges {
            first_name: clean(req.first_name),
            last_name: clean(req.last_name),
            city: clean(req.city),
            post_code: clean(req.post_code),
            street: clean(req.street),
            house_number: clean(req.house_number),
            phone_number: clean(req.phone_number),
            ..Default::default()
        }
    }
}

/// Admin edit of an account. `car_id` and `route_id` accept `null` to unassign.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 20))]
    pub post_code: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub street: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub house_number: Option<String>,

    #[validate(length(min = 1, max = 30))]
    pub phone_number: Option<String>,

    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub car_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub route_id: Option<Option<Uuid>>,
}

impl From<UpdateUserRequest> for AdminUserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        AdminUserUpdate {
            profile: ProfileChanges {
                email: req.email.map(|e| e.trim().to_lowercase()),
                first_name: clean(req.first_name),
                last_name: clean(req.last_name),
                city: clean(req.city),
                post_code: clean(req.post_code),
                street: clean(req.street),
                house_number: clean(req.house_number),
                phone_number: clean(req.phone_number),
                role: req.role,
                password_hash: None,
            },
            password: req.password,
            car_id: req.car_id,
            route_id: req.route_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct MakeAdminRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PaidPerStopRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_per_stop: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_are_tri_state() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"car_id": null}"#).unwrap();
        let update = AdminUserUpdate::from(req);
        assert_eq!(update.car_id, Some(None));
        assert_eq!(update.route_id, None);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"role": "superuser"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateUserRequest = serde_json::from_str(r#"{"role": "leader"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_profile_fields_are_trimmed() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"first_name": "  Ana ", "city": "Porto"}"#).unwrap();
        let changes = ProfileChanges::from(req);
        assert_eq!(changes.first_name.as_deref(), Some("Ana"));
        assert_eq!(changes.city.as_deref(), Some("Porto"));
        assert!(changes.email.is_none());
        assert!(changes.role.is_none());
    }

    #[test]
    fn test_paid_per_stop_accepts_numbers() {
        let req: PaidPerStopRequest = serde_json::from_str(r#"{"paid_per_stop": 1.75}"#).unwrap();
        assert_eq!(req.paid_per_stop, Decimal::new(175, 2));
    }
}
