//! Authentication request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, roles},
    db::repositories::NewUser,
    utils::sanitize_string,
};

/// Self-registration
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: String,

    #[validate(nested)]
    #[serde(flatten)]
    pub profile: ProfileFields,
}

/// Personal details shared by signup and invitation completion
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileFields {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(max = 20))]
    pub post_code: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub street: String,

    #[validate(length(min = 1, max = 20))]
    pub house_number: String,

    #[validate(length(min = 1, max = 30))]
    pub phone_number: String,
}

impl ProfileFields {
    /// Column values for the account; the password hash is filled in by the service
    pub fn into_new_user(self, email: &str) -> NewUser {
        NewUser {
            email: email.trim().to_lowercase(),
            password_hash: String::new(),
            first_name: sanitize_string(&self.first_name),
            last_name: sanitize_string(&self.last_name),
            city: sanitize_string(&self.city),
            post_code: self.post_code.map(|p| sanitize_string(&p)),
            street: sanitize_string(&self.street),
            house_number: sanitize_string(&self.house_number),
            phone_number: sanitize_string(&self.phone_number),
            role: roles::USER.to_string(),
        }
    }
}

/// User login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Drop every refresh token of the user
    pub all_sessions: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ValidateInvitationRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteRegistrationRequest {
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: String,

    #[validate(nested)]
    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub new_password: String,
}
