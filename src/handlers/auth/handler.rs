//! Authentication handler implementations
//!
//! Every endpoint that hands out an access token also sets it as the
//! HTTP-only `jwt` cookie, and logout expires that cookie.

use axum::{
    Json,
    extract::State,
    http::{HeaderName, StatusCode, header::SET_COOKIE},
};
use validator::Validate;

use crate::{
    constants::AUTH_COOKIE_NAME,
    error::AppResult,
    handlers::{MessageResponse, users::UserResponse},
    middleware::{AuthenticatedUser, roles},
    services::{AuthService, UserService},
    state::AppState,
};

use super::{
    request::{
        CompleteRegistrationRequest, InviteRequest, LoginRequest, LogoutRequest,
        PasswordResetRequest, RefreshTokenRequest, ResetPasswordRequest, SignupRequest,
        ValidateInvitationRequest,
    },
    response::{
        AuthResponse, InvitationResponse, InviteResponse, RefreshResponse, SignupResponse,
    },
};

type CookieHeader = [(HeaderName, String); 1];

/// `Set-Cookie` value carrying an access token
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        AUTH_COOKIE_NAME, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn set_cookie(state: &AppState, token: &str, max_age_secs: i64) -> CookieHeader {
    let secure = state.config().server.is_production();
    [(SET_COOKIE, session_cookie(token, max_age_secs, secure))]
}

/// Register a new account and log it in
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, CookieHeader, Json<SignupResponse>)> {
    payload.validate()?;

    let new_user = payload.profile.into_new_user(&payload.email);
    let user = AuthService::signup(state.db(), new_user, &payload.password).await?;
    let (access_token, expires_in) = AuthService::generate_access_token(&user, state.config())?;
    let details = UserService::get_details(state.db(), &user.id).await?;

    Ok((
        StatusCode::CREATED,
        set_cookie(&state, &access_token, expires_in),
        Json(SignupResponse {
            message: "User registered successfully".to_string(),
            user: details.into(),
        }),
    ))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieHeader, Json<AuthResponse>)> {
    payload.validate()?;

    let (user, tokens) = AuthService::login(
        state.db(),
        &state.sessions(),
        state.config(),
        &payload.email,
        &payload.password,
    )
    .await?;
    let details = UserService::get_details(state.db(), &user.id).await?;

    let cookie = set_cookie(&state, &tokens.access_token, tokens.expires_in);
    Ok((cookie, Json(AuthResponse::new(tokens, details.into()))))
}

/// Rotate a refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<(CookieHeader, Json<RefreshResponse>)> {
    let tokens = AuthService::refresh_token(
        state.db(),
        &state.sessions(),
        state.config(),
        &payload.refresh_token,
    )
    .await?;

    let cookie = set_cookie(&state, &tokens.access_token, tokens.expires_in);
    Ok((cookie, Json(tokens.into())))
}

/// Logout: expire the cookie and optionally every refresh token
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    payload: Option<Json<LogoutRequest>>,
) -> AppResult<(CookieHeader, Json<MessageResponse>)> {
    let all_sessions = payload
        .and_then(|Json(p)| p.all_sessions)
        .unwrap_or(false);

    AuthService::logout(&state.sessions(), &auth_user.id, all_sessions).await?;

    Ok((
        set_cookie(&state, "", 0),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// Get current authenticated user
pub async fn profile(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserResponse>> {
    let details = UserService::get_details(state.db(), &auth_user.id).await?;
    Ok(Json(details.into()))
}

/// Invite someone by e-mail
pub async fn invite(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<InviteRequest>,
) -> AppResult<(StatusCode, Json<InviteResponse>)> {
    auth_user.require(roles::ADMIN)?;
    payload.validate()?;

    let user = AuthService::invite(
        state.db(),
        state.mailer(),
        state.config(),
        &payload.email.trim().to_lowercase(),
        &auth_user.id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            message: "Invitation sent successfully".to_string(),
            invitation: InvitationResponse {
                email: user.email,
                expires_at: user.invitation_expires_at,
            },
        }),
    ))
}

pub async fn validate_invitation(
    State(state): State<AppState>,
    Json(payload): Json<ValidateInvitationRequest>,
) -> AppResult<Json<InvitationResponse>> {
    payload.validate()?;

    let user = AuthService::validate_invitation(state.db(), &payload.token).await?;
    Ok(Json(InvitationResponse {
        email: user.email,
        expires_at: user.invitation_expires_at,
    }))
}

/// Finish an invitation and log the new account in
pub async fn complete_registration(
    State(state): State<AppState>,
    Json(payload): Json<CompleteRegistrationRequest>,
) -> AppResult<(CookieHeader, Json<AuthResponse>)> {
    payload.validate()?;

    // The stored e-mail wins; the placeholder row already carries it
    let profile = payload.profile.into_new_user("");
    let (user, tokens) = AuthService::complete_registration(
        state.db(),
        &state.sessions(),
        state.config(),
        &payload.token,
        profile,
        &payload.password,
    )
    .await?;
    let details = UserService::get_details(state.db(), &user.id).await?;

    let cookie = set_cookie(&state, &tokens.access_token, tokens.expires_in);
    Ok((cookie, Json(AuthResponse::new(tokens, details.into()))))
}

/// Always answers the same way so addresses cannot be probed
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;

    AuthService::request_password_reset(
        state.db(),
        state.mailer(),
        state.config(),
        &payload.email,
    )
    .await?;

    Ok(Json(MessageResponse::new(
        "If an account with that email exists, a password reset link has been sent",
    )))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;

    AuthService::reset_password(state.db(), &payload.token, &payload.new_password).await?;
    Ok(Json(MessageResponse::new("Password has been reset successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("abc", 3600, false);
        assert_eq!(
            cookie,
            "jwt=abc; Path=/; HttpOnly; SameSite=Strict; Max-Age=3600"
        );
        assert!(session_cookie("abc", 3600, true).ends_with("; Secure"));
    }

    #[test]
    fn test_cleared_cookie_expires_immediately() {
        let cookie = session_cookie("", 0, false);
        assert!(cookie.starts_with("jwt=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
