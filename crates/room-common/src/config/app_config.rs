//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use room_core::LivenessPolicy;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub store: StoreConfig,
    /// Present whenever a Redis address was configured
    pub redis: Option<RedisConfig>,
    pub presence: PresenceConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(ConfigError::InvalidValue("APP_ENV", s.to_string())),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which presence store backs the room operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process map, single process only
    #[default]
    Memory,
    /// Shared Redis key space
    Redis,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Redis => write!(f, "redis"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            _ => Err(ConfigError::InvalidValue("ROOM_STORE_BACKEND", s.to_string())),
        }
    }
}

/// Store selection
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
    /// Prepended to every room key; empty keys rooms by their bare ID
    #[serde(default)]
    pub key_prefix: String,
    #[serde(default = "default_redis_command_timeout_ms")]
    pub command_timeout_ms: u64,
    #[serde(default = "default_redis_max_write_retries")]
    pub max_write_retries: u32,
}

impl RedisConfig {
    /// Create a configuration for `url` with default tuning
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_redis_max_connections(),
            key_prefix: String::new(),
            command_timeout_ms: default_redis_command_timeout_ms(),
            max_write_retries: default_redis_max_write_retries(),
        }
    }

    /// Build a connection URL from discrete host settings
    #[must_use]
    pub fn url_from_parts(
        host: &str,
        port: u16,
        user: Option<&str>,
        password: Option<&str>,
    ) -> String {
        match (user, password) {
            (Some(user), Some(password)) => format!("redis://{user}:{password}@{host}:{port}"),
            (None, Some(password)) => format!("redis://:{password}@{host}:{port}"),
            (Some(user), None) => format!("redis://{user}@{host}:{port}"),
            (None, None) => format!("redis://{host}:{port}"),
        }
    }

    /// Per round-trip bound
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Liveness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    #[serde(default = "default_heartbeat_timeout_ms")]
    pub heartbeat_timeout_ms: u64,
    /// Defaults to two thirds of the heartbeat timeout
    #[serde(default)]
    pub sweep_interval_ms: Option<u64>,
    /// Rooms swept at once; defaults to half the Redis pool on that backend
    #[serde(default)]
    pub sweep_concurrency: Option<usize>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_ms: default_heartbeat_timeout_ms(),
            sweep_interval_ms: None,
            sweep_concurrency: None,
        }
    }
}

impl PresenceConfig {
    /// Build the validated liveness policy
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if the sweep interval is not
    /// within two thirds of the heartbeat timeout.
    pub fn policy(&self) -> Result<LivenessPolicy, ConfigError> {
        let timeout = Duration::from_millis(self.heartbeat_timeout_ms);
        let policy = match self.sweep_interval_ms {
            Some(interval) => {
                LivenessPolicy::with_sweep_interval(timeout, Duration::from_millis(interval))
                    .map_err(|e| ConfigError::InvalidValue("SWEEP_INTERVAL_MS", e.to_string()))?
            }
            None => LivenessPolicy::new(timeout)
                .map_err(|e| ConfigError::InvalidValue("HEARTBEAT_TIMEOUT_MS", e.to_string()))?,
        };
        Ok(policy)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "room-presence".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_redis_port() -> u16 {
    6379
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_redis_command_timeout_ms() -> u64 {
    2_000
}

fn default_redis_max_write_retries() -> u32 {
    8
}

fn default_heartbeat_timeout_ms() -> u64 {
    9_000
}

impl Default for AppConfig {
    /// Memory-backed configuration with default tuning
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            api: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            store: StoreConfig::default(),
            redis: None,
            presence: PresenceConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a value fails to parse or the selected backend
    /// lacks its required settings
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let app = AppSettings {
            name: vars.string("APP_NAME").unwrap_or_else(default_app_name),
            env: vars.parse("APP_ENV")?.unwrap_or_default(),
        };

        let api = ServerConfig {
            host: vars.string("API_HOST").unwrap_or_else(default_host),
            port: vars.parse("API_PORT")?.unwrap_or_else(default_port),
        };

        let store = StoreConfig {
            backend: vars.parse("ROOM_STORE_BACKEND")?.unwrap_or_default(),
        };

        let redis_url = match vars.string("REDIS_URL") {
            Some(url) => Some(url),
            None => match vars.string("REDIS_HOST") {
                Some(host) => Some(RedisConfig::url_from_parts(
                    &host,
                    vars.parse("REDIS_PORT")?.unwrap_or_else(default_redis_port),
                    vars.string("REDIS_USER").as_deref(),
                    vars.string("REDIS_PSWD").as_deref(),
                )),
                None => None,
            },
        };

        let redis = match redis_url {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: vars
                    .parse("REDIS_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_redis_max_connections),
                key_prefix: vars.string("REDIS_KEY_PREFIX").unwrap_or_default(),
                command_timeout_ms: vars
                    .parse("REDIS_COMMAND_TIMEOUT_MS")?
                    .unwrap_or_else(default_redis_command_timeout_ms),
                max_write_retries: vars
                    .parse("REDIS_MAX_WRITE_RETRIES")?
                    .unwrap_or_else(default_redis_max_write_retries),
            }),
            None => None,
        };

        if store.backend == StoreBackend::Redis && redis.is_none() {
            return Err(ConfigError::MissingVar("REDIS_URL"));
        }

        let presence = PresenceConfig {
            heartbeat_timeout_ms: vars
                .parse("HEARTBEAT_TIMEOUT_MS")?
                .unwrap_or_else(default_heartbeat_timeout_ms),
            sweep_interval_ms: vars.parse("SWEEP_INTERVAL_MS")?,
            sweep_concurrency: vars.parse("SWEEP_CONCURRENCY")?,
        };
        // Reject an unusable liveness policy at startup
        presence.policy()?;

        let cors = CorsConfig {
            allowed_origins: vars
                .string("CORS_ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        Ok(Self {
            app,
            api,
            store,
            redis,
            presence,
            cors,
        })
    }
}

/// Variable lookup with typed parsing
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
    {
        self.string(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
            })
            .transpose()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
