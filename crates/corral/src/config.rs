//! Pool configuration.

use std::time::Duration;

/// Connection pool configuration.
///
/// Immutable once the pool is built. The admission ceiling for the whole
/// pool is [`capacity`](PoolConfig::capacity), i.e. `max_size + max_idle`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of connections eagerly created at `init`
    pub core_size: usize,
    /// Maximum number of idle connections
    pub max_idle: usize,
    /// Maximum number of checked-out connections
    pub max_size: usize,
    /// How long an idle connection may sit unused.
    ///
    /// Reserved: carried on the configuration surface but not enforced —
    /// no reaper closes idle connections today.
    pub idle_timeout: Duration,
    /// Whether an exhausted checkout blocks for `wait_timeout` instead of
    /// failing immediately
    pub wait_blocking: bool,
    /// Maximum time a blocked checkout waits for a connection to be freed
    pub wait_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            core_size: 8,
            max_idle: 3,
            max_size: 15,
            idle_timeout: Duration::from_secs(60),
            wait_blocking: true,
            wait_timeout: Duration::from_secs(1),
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with the given max size.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Default::default()
        }
    }

    /// Set the number of eagerly created core connections.
    pub fn core_size(mut self, n: usize) -> Self {
        self.core_size = n;
        self
    }

    /// Set the maximum idle connection count.
    pub fn max_idle(mut self, n: usize) -> Self {
        self.max_idle = n;
        self
    }

    /// Set the idle timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Enable/disable blocking when the pool is exhausted.
    pub fn wait_blocking(mut self, enabled: bool) -> Self {
        self.wait_blocking = enabled;
        self
    }

    /// Set the maximum wait for a blocked checkout.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Total number of connections the pool will ever admit.
    pub fn capacity(&self) -> usize {
        self.max_size + self.max_idle
    }
}
