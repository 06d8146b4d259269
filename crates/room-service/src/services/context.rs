//! Service context - dependency container for services
//!
//! Holds the store, the clock, the liveness policy and the sweep fan-out
//! shared by the request path and the sweeper.

use std::sync::Arc;

use room_core::{
    LivenessPolicy, RoomError, RoomResult, SharedClock, SharedRoomStore, SystemClock, Timestamp,
};

/// Rooms swept at the same time when nothing else is configured
pub const DEFAULT_SWEEP_CONCURRENCY: usize = 8;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: SharedRoomStore,
    clock: SharedClock,
    policy: LivenessPolicy,
    sweep_concurrency: usize,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("backend", &self.store.backend())
            .field("policy", &self.policy)
            .field("sweep_concurrency", &self.sweep_concurrency)
            .finish()
    }
}

impl ServiceContext {
    /// Create a context reading the system clock
    pub fn new(store: SharedRoomStore, policy: LivenessPolicy) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            policy,
            sweep_concurrency: DEFAULT_SWEEP_CONCURRENCY,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Get the room store
    pub fn store(&self) -> &SharedRoomStore {
        &self.store
    }

    /// Get the clock
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Get the liveness policy
    pub fn policy(&self) -> &LivenessPolicy {
        &self.policy
    }

    /// Upper bound on rooms swept at once
    pub fn sweep_concurrency(&self) -> usize {
        self.sweep_concurrency
    }

    /// Current time in epoch milliseconds
    pub fn now(&self) -> Timestamp {
        self.clock.now_millis()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    store: Option<SharedRoomStore>,
    clock: Option<SharedClock>,
    policy: Option<LivenessPolicy>,
    sweep_concurrency: Option<usize>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            clock: None,
            policy: None,
            sweep_concurrency: None,
        }
    }

    pub fn store(mut self, store: SharedRoomStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Defaults to the system clock
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to `LivenessPolicy::default()`
    pub fn policy(mut self, policy: LivenessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Defaults to `DEFAULT_SWEEP_CONCURRENCY`; zero is raised to one
    pub fn sweep_concurrency(mut self, limit: usize) -> Self {
        self.sweep_concurrency = Some(limit.max(1));
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `RoomError::InvalidArgument` if no store was given
    pub fn build(self) -> RoomResult<ServiceContext> {
        Ok(ServiceContext {
            store: self
                .store
                .ok_or_else(|| RoomError::invalid("store is required"))?,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            policy: self.policy.unwrap_or_default(),
            sweep_concurrency: self
                .sweep_concurrency
                .unwrap_or(DEFAULT_SWEEP_CONCURRENCY),
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
