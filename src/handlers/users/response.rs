//! User response DTOs

use serde::Serialize;

use crate::{
    models::{CarSummary, RouteSummary, User},
    services::user_service::UserDetails,
};

/// A user with the car and route they currently hold
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub car: Option<CarSummary>,
    pub route: Option<RouteSummary>,
}

impl From<UserDetails> for UserResponse {
    fn from(details: UserDetails) -> Self {
        Self {
            user: details.user,
            car: details.car,
            route: details.route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "driver@example.com".to_string(),
            password_hash: "argon2-hash".to_string(),
            first_name: "Dana".to_string(),
            last_name: "Driver".to_string(),
            city: "Lisbon".to_string(),
            post_code: None,
            street: "Main".to_string(),
            house_number: "1".to_string(),
            phone_number: "123".to_string(),
            car_id: None,
            route_id: None,
            role: "user".to_string(),
            active: true,
            paid_per_stop: Decimal::new(250, 2),
            invitation_token_hash: Some("invite-hash".to_string()),
            invitation_expires_at: None,
            password_reset_token_hash: Some("reset-hash".to_string()),
            password_reset_expires_at: None,
            last_login_at: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_secrets_never_serialized() {
        let json = serde_json::to_value(UserResponse {
            user: user(),
            car: None,
            route: None,
        })
        .unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("invitation_token_hash"));
        assert!(!obj.contains_key("password_reset_token_hash"));
        assert_eq!(json["email"], "driver@example.com");
        assert_eq!(json["paid_per_stop"], 2.5);
        assert!(json["car"].is_null());
        assert!(json["route"].is_null());
    }
}
