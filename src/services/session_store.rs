//! Refresh-token storage
//!
//! Each token is its own key, `refresh_token:{token}`, holding the owner's
//! id. A per-user set lists the live tokens so every session can be revoked
//! at once. Tokens are always looked up by exact key.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Remember `token` as a session of `user_id` for `ttl_secs`
    async fn save(&self, token: &Uuid, user_id: &Uuid, ttl_secs: u64) -> AppResult<()>;

    /// Remove `token` and return its owner. A token can be taken once.
    async fn take(&self, token: &Uuid) -> AppResult<Option<Uuid>>;

    /// Drop every session of `user_id`
    async fn revoke_all(&self, user_id: &Uuid) -> AppResult<()>;
}

/// Sessions kept in Redis
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn token_key(token: &Uuid) -> String {
        format!("refresh_token:{}", token)
    }

    fn user_key(user_id: &Uuid) -> String {
        format!("refresh_tokens:{}", user_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, token: &Uuid, user_id: &Uuid, ttl_secs: u64) -> AppResult<()> {
        let mut redis = self.redis.clone();
        let user_key = Self::user_key(user_id);

        let _: () = redis::pipe()
            .atomic()
            .set_ex(Self::token_key(token), user_id.to_string(), ttl_secs)
            .ignore()
            .sadd(&user_key, token.to_string())
            .ignore()
            .expire(&user_key, ttl_secs as i64)
            .ignore()
            .query_async(&mut redis)
            .await?;

        Ok(())
    }

    async fn take(&self, token: &Uuid) -> AppResult<Option<Uuid>> {
        let mut redis = self.redis.clone();

        let owner: Option<String> = redis::cmd("GETDEL")
            .arg(Self::token_key(token))
            .query_async(&mut redis)
            .await?;

        let Some(user_id) = owner.and_then(|id| Uuid::parse_str(&id).ok()) else {
            return Ok(None);
        };

        redis
            .srem::<_, _, ()>(Self::user_key(&user_id), token.to_string())
            .await?;
        Ok(Some(user_id))
    }

    async fn revoke_all(&self, user_id: &Uuid) -> AppResult<()> {
        let mut redis = self.redis.clone();
        let user_key = Self::user_key(user_id);

        let tokens: Vec<String> = redis.smembers(&user_key).await?;
        let mut keys: Vec<String> = tokens
            .iter()
            .filter_map(|t| Uuid::parse_str(t).ok())
            .map(|t| Self::token_key(&t))
            .collect();
        keys.push(user_key);

        redis.del::<_, ()>(keys).await?;
        Ok(())
    }
}
