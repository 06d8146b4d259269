//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and calling room operations.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use room_api::{create_app, create_app_state};
use room_common::{AppConfig, RedisConfig, StoreBackend};
use room_service::{ExpirySweeper, OpResponse, SweeperHandle};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Liveness threshold used by test servers
pub const TEST_HEARTBEAT_TIMEOUT_MS: u64 = 300;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    sweeper: Option<SweeperHandle>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a memory-backed server without a background sweeper
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(), false).await
    }

    /// Start a memory-backed server with the expiry sweeper running
    pub async fn start_with_sweeper() -> Result<Self> {
        Self::start_with_config(test_config(), true).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig, sweeper: bool) -> Result<Self> {
        // Create app state
        let state = create_app_state(config).await?;

        let sweeper = sweeper.then(|| ExpirySweeper::new(state.rooms_handle()).spawn());

        // Build application
        let app = create_app(state);

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Create HTTP client
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            sweeper,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with query parameters
    pub async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).query(query).send().await?)
    }

    /// Make a POST request with query parameters and no body
    pub async fn post_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).query(query).send().await?)
    }

    /// Call a room operation and decode its envelope, expecting HTTP 200
    pub async fn op<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<OpResponse<T>> {
        let response = self.get_query(path, query).await?;
        assert_json(response, StatusCode::OK).await
    }

    /// Stop the background sweeper, if one is running
    pub async fn stop_sweeper(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }
    }
}

/// Memory-backed configuration with a short liveness threshold
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.presence.heartbeat_timeout_ms = TEST_HEARTBEAT_TIMEOUT_MS;
    config
}

/// Redis-backed configuration in a fresh key namespace, if `REDIS_URL` is set
pub fn redis_test_config() -> Option<AppConfig> {
    dotenvy::dotenv().ok();
    let url = std::env::var("REDIS_URL").ok()?;

    let mut redis = RedisConfig::new(url);
    redis.key_prefix = format!(
        "integration:{}:{}:",
        chrono::Utc::now().timestamp_millis(),
        crate::fixtures::unique_suffix()
    );

    let mut config = test_config();
    config.store.backend = StoreBackend::Redis;
    config.redis = Some(redis);
    Some(config)
}

/// Helper to check if a Redis test environment is available
pub fn check_redis_env() -> Option<AppConfig> {
    let config = redis_test_config();
    if config.is_none() {
        eprintln!("Skipping test: REDIS_URL not set");
    }
    config
}

/// Wait long enough for any heartbeat taken now to be expired
pub async fn wait_past_threshold() {
    tokio::time::sleep(Duration::from_millis(TEST_HEARTBEAT_TIMEOUT_MS + 100)).await;
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
