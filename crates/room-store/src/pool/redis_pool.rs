//! Redis connection pool using deadpool-redis.
//!
//! Every round-trip issued through the pool, connection checkout included, is
//! bounded by the configured command timeout.

use deadpool_redis::{Config, Connection, Pool, Runtime};
use room_core::RoomError;
use std::future::Future;
use std::time::Duration;

/// Keys requested per `SCAN` step
const SCAN_BATCH: usize = 100;

/// Redis pool configuration
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// Redis connection URL (e.g., `redis://localhost:6379`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: usize,
    /// Upper bound for a single round-trip or connection checkout
    pub command_timeout: Duration,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 10,
            command_timeout: Duration::from_secs(2),
        }
    }
}

impl From<&room_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &room_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
            command_timeout: config.command_timeout(),
        }
    }
}

/// Error type for Redis pool operations
#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("Failed to get connection from pool: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis round-trip exceeded {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl RedisPoolError {
    /// Whether the failure means Redis could not be reached in time
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::CreatePool(_) | Self::GetConnection(_) | Self::Timeout(_) => true,
            Self::Redis(e) => {
                e.is_io_error()
                    || e.is_connection_refusal()
                    || e.is_connection_dropped()
                    || e.is_timeout()
            }
        }
    }
}

impl From<RedisPoolError> for RoomError {
    fn from(err: RedisPoolError) -> Self {
        if err.is_unavailable() {
            RoomError::unavailable(err.to_string())
        } else {
            RoomError::internal(err.to_string())
        }
    }
}

/// Result type for Redis pool operations
pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Managed Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
    command_timeout: Duration,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("status", &self.pool.status())
            .field("command_timeout", &self.command_timeout)
            .finish()
    }
}

impl RedisPool {
    /// Create a new Redis pool with the given configuration.
    ///
    /// No connection is opened until the first checkout.
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let cfg = Config::from_url(&config.url);
        let pool = cfg
            .builder()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?
            .max_size(config.max_connections)
            .wait_timeout(Some(config.command_timeout))
            .create_timeout(Some(config.command_timeout))
            .recycle_timeout(Some(config.command_timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?;

        // Redact credentials from URL for logging
        let safe_url = config.url.split('@').next_back().unwrap_or(&config.url);
        tracing::info!(
            url = %safe_url,
            max_connections = config.max_connections,
            command_timeout_ms = config.command_timeout.as_millis() as u64,
            "Redis pool created"
        );

        Ok(Self {
            pool,
            command_timeout: config.command_timeout,
        })
    }

    /// Create a new Redis pool from room-common config
    pub fn from_config(config: &room_common::RedisConfig) -> RedisResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> RedisResult<Connection> {
        self.pool.get().await.map_err(RedisPoolError::GetConnection)
    }

    /// Configured round-trip bound
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Await a single round-trip, failing with `Timeout` past the bound
    pub async fn bounded<T, F>(&self, round_trip: F) -> RedisResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        tokio::time::timeout(self.command_timeout, round_trip)
            .await
            .map_err(|_| RedisPoolError::Timeout(self.command_timeout))?
            .map_err(RedisPoolError::from)
    }

    /// Check if the pool is healthy by pinging Redis
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        self.bounded(redis::cmd("PING").query_async::<String>(&mut conn))
            .await?;
        Ok(())
    }

    /// Get the raw value of a key
    pub async fn get_raw(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.get().await?;
        self.bounded(redis::cmd("GET").arg(key).query_async(&mut conn))
            .await
    }

    /// Get the raw values of several keys in one round-trip.
    ///
    /// Keys that do not exist yield `None` at their position.
    pub async fn get_many_raw(&self, keys: &[String]) -> RedisResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.get().await?;
        self.bounded(redis::cmd("MGET").arg(keys).query_async(&mut conn))
            .await
    }

    /// Set a key only if it does not exist (`SET NX`).
    ///
    /// Returns `false` when the key was already present.
    pub async fn set_if_absent(&self, key: &str, value: &str) -> RedisResult<bool> {
        let mut conn = self.get().await?;
        let reply: Option<String> = self
            .bounded(
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("NX")
                    .query_async(&mut conn),
            )
            .await?;
        Ok(reply.is_some())
    }

    /// Delete a key
    pub async fn delete(&self, key: &str) -> RedisResult<bool> {
        let mut conn = self.get().await?;
        let deleted: i64 = self
            .bounded(redis::cmd("DEL").arg(key).query_async(&mut conn))
            .await?;
        Ok(deleted > 0)
    }

    /// Scan keys matching a pattern using cursor-based iteration.
    ///
    /// Each `SCAN` step is bounded separately. Keys may repeat across steps
    /// while the key space is changing, so the result is deduplicated.
    pub async fn scan_keys(&self, pattern: &str) -> RedisResult<Vec<String>> {
        let mut conn = self.get().await?;
        let mut cursor: u64 = 0;
        let mut all_keys = Vec::new();

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = self
                .bounded(
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn),
                )
                .await?;

            all_keys.extend(keys);
            cursor = next_cursor;

            if cursor == 0 {
                break;
            }
        }

        all_keys.sort_unstable();
        all_keys.dedup();
        Ok(all_keys)
    }
}
