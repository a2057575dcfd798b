//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    constants::AUTH_COOKIE_NAME,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::Role,
    services::AuthService,
    state::AppState,
};

use super::roles;

/// Authenticated user, loaded fresh from the database on every request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Fail with 403 unless the user holds one of `required`
    pub fn require(&self, required: &[Role]) -> AppResult<()> {
        if roles::permits(self.role, required) {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Pull the access token from `Authorization: Bearer` or the auth cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(token) = extract_token(request.headers()) else {
        debug!(path = %path, "Auth failed: no bearer token or auth cookie");
        return Err(AppError::Unauthorized);
    };

    let claims = AuthService::verify_token(&token, &state.config().jwt.secret).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: token verification failed");
        e
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

    let user = UserRepository::find_by_id(state.db(), &user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.active {
        debug!(path = %path, user_id = %user_id, "Auth failed: account deactivated");
        return Err(AppError::Forbidden("Account is deactivated".to_string()));
    }

    let user = AuthenticatedUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role(),
    };

    debug!(path = %path, user_id = %user.id, role = %user.role, "User authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert(COOKIE, HeaderValue::from_static("jwt=cookie-token"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; jwt=cookie-token; lang=de"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn test_missing_or_malformed() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        headers.insert(COOKIE, HeaderValue::from_static("jwtx=nope; jwt="));
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_require_uses_role_hierarchy() {
        let owner = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "o@x.y".into(),
            role: Role::Owner,
        };
        assert!(owner.require(roles::ADMIN).is_ok());
        assert!(owner.require(roles::LEADER).is_err());
    }
}
