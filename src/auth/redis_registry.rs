//! Redis-backed refresh session registry

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, Script};
use tracing::info;
use uuid::Uuid;

use super::session::{session_key, SessionRegistry};
use crate::error::Result;

/// Deletes KEYS[1] only while it still holds ARGV[1]
const CONSUME_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
else
    return 0
end
"#;

/// Registry shared by every node of the deployment
#[derive(Clone)]
pub struct RedisSessionRegistry {
    connection: ConnectionManager,
    ttl_secs: u64,
}

impl RedisSessionRegistry {
    /// Connect to Redis. Records expire after `ttl_secs`.
    pub async fn connect(url: &str, ttl_secs: u64) -> Result<Self> {
        info!("Connecting to Redis session registry...");

        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        info!("Redis session registry connected");

        Ok(Self {
            connection,
            ttl_secs,
        })
    }

    /// Check Redis connectivity
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl SessionRegistry for RedisSessionRegistry {
    async fn insert(&self, user_id: Uuid, token_id: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .set_ex(session_key(user_id), token_id, self.ttl_secs)
            .await?;
        Ok(())
    }

    async fn validate(&self, user_id: Uuid, token_id: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let stored: Option<String> = conn.get(session_key(user_id)).await?;
        Ok(stored.as_deref() == Some(token_id))
    }

    async fn invalidate(&self, user_id: Uuid) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: i64 = conn.del(session_key(user_id)).await?;
        Ok(())
    }

    async fn consume(&self, user_id: Uuid, token_id: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let deleted: i64 = Script::new(CONSUME_SCRIPT)
            .key(session_key(user_id))
            .arg(token_id)
            .invoke_async(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}
