//! Liveness policy - heartbeat threshold and the sweep cadence derived from it

use std::time::Duration;

use super::Timestamp;
use crate::error::{RoomError, RoomResult};

/// Default liveness threshold (9 seconds)
pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_millis(9_000);

/// Heartbeat threshold plus the sweep interval that enforces it.
///
/// The sweep interval never exceeds two thirds of the threshold, so a silent
/// user is evicted within one threshold plus one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessPolicy {
    heartbeat_timeout: Duration,
    sweep_interval: Duration,
}

impl LivenessPolicy {
    /// Create a policy whose sweep interval is exactly two thirds of the threshold
    pub fn new(heartbeat_timeout: Duration) -> RoomResult<Self> {
        Self::validate_timeout(heartbeat_timeout)?;
        Ok(Self {
            heartbeat_timeout,
            sweep_interval: Self::max_sweep_interval(heartbeat_timeout),
        })
    }

    /// Create a policy with an explicit sweep interval
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the interval is zero or longer than two
    /// thirds of the threshold.
    pub fn with_sweep_interval(
        heartbeat_timeout: Duration,
        sweep_interval: Duration,
    ) -> RoomResult<Self> {
        Self::validate_timeout(heartbeat_timeout)?;

        let max = Self::max_sweep_interval(heartbeat_timeout);
        if sweep_interval.is_zero() || sweep_interval > max {
            return Err(RoomError::invalid(format!(
                "sweep interval {}ms must be within 1..={}ms for a {}ms heartbeat timeout",
                sweep_interval.as_millis(),
                max.as_millis(),
                heartbeat_timeout.as_millis()
            )));
        }

        Ok(Self {
            heartbeat_timeout,
            sweep_interval,
        })
    }

    fn validate_timeout(heartbeat_timeout: Duration) -> RoomResult<()> {
        // Below 3ms the two-thirds interval would round down to zero.
        if heartbeat_timeout < Duration::from_millis(3) {
            return Err(RoomError::invalid(format!(
                "heartbeat timeout {}ms is too short",
                heartbeat_timeout.as_millis()
            )));
        }
        Ok(())
    }

    fn max_sweep_interval(heartbeat_timeout: Duration) -> Duration {
        heartbeat_timeout * 2 / 3
    }

    /// Maximum allowed age of a heartbeat
    #[must_use]
    pub fn heartbeat_timeout(&self) -> Duration {
        self.heartbeat_timeout
    }

    /// Period of the expiry sweep
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Threshold in milliseconds, for comparisons against timestamps
    #[must_use]
    pub fn timeout_millis(&self) -> i64 {
        i64::try_from(self.heartbeat_timeout.as_millis()).unwrap_or(i64::MAX)
    }

    /// A heartbeat is stale once strictly more than the threshold has elapsed
    #[must_use]
    pub fn is_expired(&self, heartbeat_time: Timestamp, now: Timestamp) -> bool {
        now.saturating_sub(heartbeat_time) > self.timeout_millis()
    }
}

impl Default for LivenessPolicy {
    fn default() -> Self {
        Self {
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
            sweep_interval: Self::max_sweep_interval(DEFAULT_HEARTBEAT_TIMEOUT),
        }
    }
}
