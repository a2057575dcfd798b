//! Authentication service
//!
//! Password login, JWT access tokens, Redis-backed refresh tokens, and the
//! one-time tokens used for invitations and password resets. One-time tokens
//! are mailed in clear and stored only as SHA-256 hashes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::{Config, JwtConfig},
    constants::{
        INVITATION_EXPIRY_HOURS, ONE_TIME_TOKEN_BYTES, PASSWORD_RESET_EXPIRY_HOURS, roles,
    },
    db::repositories::{NewUser, UserRepository},
    error::{AppError, AppResult},
    models::User,
    services::{
        mail_service::{MailService, Mailer},
        session_store::SessionStore,
    },
    utils::{generate_hex_token, hash_string},
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Tokens handed to a client after a successful login
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// A one-time token: the clear value goes out by mail, the hash is stored
#[derive(Debug, Clone)]
pub struct OneTimeToken {
    pub token: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeToken {
    pub fn generate(valid_for_hours: i64) -> Self {
        let token = generate_hex_token(ONE_TIME_TOKEN_BYTES);
        Self {
            hash: hash_string(&token),
            token,
            expires_at: Utc::now() + Duration::hours(valid_for_hours),
        }
    }
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new account
    pub async fn signup(pool: &PgPool, mut new_user: NewUser, password: &str) -> AppResult<User> {
        if UserRepository::find_by_email(pool, &new_user.email).await?.is_some() {
            return Err(AppError::AlreadyExists("User with this email already exists".to_string()));
        }

        new_user.password_hash = Self::hash_password(password)?;
        new_user.role = roles::USER.to_string();

        let user = UserRepository::create(pool, &new_user).await?;
        info!(user_id = %user.id, "User signed up");

        Ok(user)
    }

    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        sessions: &dyn SessionStore,
        config: &Config,
        email: &str,
        password: &str,
    ) -> AppResult<(User, IssuedTokens)> {
        let user = UserRepository::find_by_email(pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Placeholder accounts have no usable password yet
        if user.has_pending_invitation() {
            return Err(AppError::InvalidCredentials);
        }

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        UserRepository::update_last_login(pool, &user.id).await?;
        let tokens = Self::issue_tokens(sessions, &config.jwt, &user).await?;
        info!(user_id = %user.id, "User logged in");

        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        pool: &PgPool,
        sessions: &dyn SessionStore,
        config: &Config,
        refresh_token: &str,
    ) -> AppResult<IssuedTokens> {
        let user_id = Self::redeem_refresh_token(sessions, refresh_token).await?;

        let user = UserRepository::find_by_id(pool, &user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        Self::issue_tokens(sessions, &config.jwt, &user).await
    }

    /// Consume a refresh token and return its owner. Tokens are UUIDs;
    /// anything else is rejected before the store is touched.
    pub async fn redeem_refresh_token(
        sessions: &dyn SessionStore,
        refresh_token: &str,
    ) -> AppResult<Uuid> {
        let token = Uuid::parse_str(refresh_token).map_err(|_| AppError::InvalidToken)?;
        sessions.take(&token).await?.ok_or(AppError::InvalidToken)
    }

    /// Drop refresh tokens. Only `all_sessions` touches the store; the access
    /// cookie is cleared by the handler.
    pub async fn logout(
        sessions: &dyn SessionStore,
        user_id: &Uuid,
        all_sessions: bool,
    ) -> AppResult<()> {
        if all_sessions {
            sessions.revoke_all(user_id).await?;
            info!(user_id = %user_id, "All sessions revoked");
        }

        Ok(())
    }

    /// Invite someone by e-mail. Re-inviting a pending address renews its token.
    pub async fn invite(
        pool: &PgPool,
        mailer: &dyn Mailer,
        config: &Config,
        email: &str,
        invited_by: &Uuid,
    ) -> AppResult<User> {
        let invitation = OneTimeToken::generate(INVITATION_EXPIRY_HOURS);
        let existing = UserRepository::find_by_email(pool, email).await?;

        let user = match Self::pending_invitee(existing)? {
            Some(pending) => {
                UserRepository::renew_invitation(
                    pool,
                    &pending.id,
                    &invitation.hash,
                    invitation.expires_at,
                )
                .await?
            }
            None => {
                // Unusable until registration sets a real password
                let placeholder = Self::hash_password(&generate_hex_token(ONE_TIME_TOKEN_BYTES))?;
                UserRepository::create_invited(
                    pool,
                    email,
                    &placeholder,
                    &invitation.hash,
                    invitation.expires_at,
                    invited_by,
                )
                .await?
            }
        };

        info!(user_id = %user.id, invited_by = %invited_by, "Invitation created");

        MailService::deliver(
            mailer,
            MailService::invitation(&user.email, &invitation.token, &config.mail.frontend_url),
        )
        .await;

        Ok(user)
    }

    /// An address can be (re-)invited only while it has no finished account
    fn pending_invitee(existing: Option<User>) -> AppResult<Option<User>> {
        match existing {
            Some(user) if user.has_pending_invitation() => Ok(Some(user)),
            Some(_) => Err(AppError::AlreadyExists(
                "User with this email already exists".to_string(),
            )),
            None => Ok(None),
        }
    }

    /// Look up a pending invitation by its clear-text token
    pub async fn validate_invitation(pool: &PgPool, token: &str) -> AppResult<User> {
        let user = UserRepository::find_by_invitation_hash(pool, &hash_string(token)).await?;
        Self::live_invitation(user)
    }

    fn live_invitation(user: Option<User>) -> AppResult<User> {
        match user {
            Some(user) if !Self::is_expired(user.invitation_expires_at) => Ok(user),
            _ => Err(AppError::BadRequest(
                "Invalid or expired invitation token".to_string(),
            )),
        }
    }

    /// Turn an invitation into a full account and log it in
    pub async fn complete_registration(
        pool: &PgPool,
        sessions: &dyn SessionStore,
        config: &Config,
        token: &str,
        mut profile: NewUser,
        password: &str,
    ) -> AppResult<(User, IssuedTokens)> {
        let invited = Self::validate_invitation(pool, token).await?;

        profile.password_hash = Self::hash_password(password)?;
        let user = UserRepository::complete_registration(pool, &invited.id, &profile).await?;
        info!(user_id = %user.id, "Registration completed");

        let tokens = Self::issue_tokens(sessions, &config.jwt, &user).await?;
        Ok((user, tokens))
    }

    /// Start a password reset. Silent when the address is unknown.
    pub async fn request_password_reset(
        pool: &PgPool,
        mailer: &dyn Mailer,
        config: &Config,
        email: &str,
    ) -> AppResult<()> {
        let Some(user) = UserRepository::find_by_email(pool, email).await? else {
            return Ok(());
        };
        if !Self::can_reset(&user) {
            return Ok(());
        }

        let reset = OneTimeToken::generate(PASSWORD_RESET_EXPIRY_HOURS);
        UserRepository::set_reset_token(pool, &user.id, &reset.hash, reset.expires_at).await?;
        info!(user_id = %user.id, "Password reset requested");

        MailService::deliver(
            mailer,
            MailService::password_reset(&user.email, &reset.token, &config.mail.frontend_url),
        )
        .await;

        Ok(())
    }

    /// Invited placeholders and deactivated accounts get no reset mail
    fn can_reset(user: &User) -> bool {
        user.active && !user.has_pending_invitation()
    }

    /// Finish a password reset
    pub async fn reset_password(pool: &PgPool, token: &str, new_password: &str) -> AppResult<()> {
        let user = UserRepository::find_by_reset_hash(pool, &hash_string(token)).await?;
        let user = Self::live_reset(user)?;

        let hash = Self::hash_password(new_password)?;
        UserRepository::set_password(pool, &user.id, &hash).await?;
        info!(user_id = %user.id, "Password reset completed");

        Ok(())
    }

    fn live_reset(user: Option<User>) -> AppResult<User> {
        match user {
            Some(user) if !Self::is_expired(user.password_reset_expires_at) => Ok(user),
            _ => Err(AppError::BadRequest(
                "Invalid or expired reset token".to_string(),
            )),
        }
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Sign an access token for a user
    pub fn generate_access_token(user: &User, config: &Config) -> AppResult<(String, i64)> {
        Self::access_token(user, &config.jwt)
    }

    fn access_token(user: &User, jwt: &JwtConfig) -> AppResult<(String, i64)> {
        Self::sign(&user.id, &user.email, &user.role, &jwt.secret, jwt.expiry_hours)
    }

    fn sign(
        user_id: &Uuid,
        email: &str,
        role: &str,
        secret: &str,
        expiry_hours: i64,
    ) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expiry_hours * 3600))
    }

    async fn issue_tokens(
        sessions: &dyn SessionStore,
        jwt: &JwtConfig,
        user: &User,
    ) -> AppResult<IssuedTokens> {
        let (access_token, expires_in) = Self::access_token(user, jwt)?;
        let refresh_token = Uuid::new_v4();

        let ttl = jwt.refresh_token_expiry_days.max(1) as u64 * 24 * 60 * 60;
        sessions.save(&refresh_token, &user.id, ttl).await?;

        Ok(IssuedTokens {
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in,
        })
    }

    fn is_expired(expires_at: Option<DateTime<Utc>>) -> bool {
        expires_at.is_none_or(|at| at < Utc::now())
    }
}
