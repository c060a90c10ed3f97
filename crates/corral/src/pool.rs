//! The borrow/return state machine.
//!
//! A single mutex guards the idle queue and the `total`/`using` counters,
//! so the checkout decision (reuse idle / mint new / block / fail) and the
//! counter mutation it implies are one atomic step. Factory and
//! health-check I/O always run outside the lock.

use std::collections::VecDeque;
use std::time::Instant;

use corral_core::{Error, ManageConnection, Result};
use parking_lot::{Condvar, Mutex};

use crate::config::PoolConfig;

/// Pool statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total number of connections (active + idle)
    pub total_connections: usize,
    /// Number of idle connections
    pub idle_connections: usize,
    /// Number of checked-out connections
    pub active_connections: usize,
    /// Number of callers blocked waiting for a connection
    pub pending_checkouts: usize,
}

/// State behind the pool mutex.
///
/// Invariant whenever the lock is released: `idle.len() + using == total`.
struct Shared<C> {
    idle: VecDeque<C>,
    total: usize,
    using: usize,
    waiting: usize,
    usable: bool,
}

/// A bounded pool of reusable connections.
///
/// The pool admits at most `max_size + max_idle` connections. Checkout
/// prefers an idle connection, mints a new one while under the ceiling,
/// and otherwise either fails immediately or blocks until a connection is
/// checked back in (bounded by the configured wait timeout).
///
/// Construction is two-phase: build the pool, then call
/// [`init`](Pool::init) exactly once before the first checkout. The pool
/// is an ordinary `Sync` object — share it behind an `Arc`, there is no
/// process-global instance.
pub struct Pool<M: ManageConnection> {
    manager: M,
    config: PoolConfig,
    on_discard: Option<Box<dyn Fn(&Error) + Send + Sync>>,
    shared: Mutex<Shared<M::Connection>>,
    freed: Condvar,
}

impl<M: ManageConnection> Pool<M> {
    /// Create a new pool. No connections are minted until [`init`](Pool::init).
    pub fn new(manager: M, config: PoolConfig) -> Self {
        Self {
            manager,
            config,
            on_discard: None,
            shared: Mutex::new(Shared {
                idle: VecDeque::new(),
                total: 0,
                using: 0,
                waiting: 0,
                usable: false,
            }),
            freed: Condvar::new(),
        }
    }

    /// Install an observer invoked whenever a connection is discarded for
    /// failing its health check, on either the checkout or check-in path.
    ///
    /// Check-in discards are otherwise only logged; the observer is the
    /// hook for reacting to systemic health degradation.
    pub fn on_discard<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.on_discard = Some(Box::new(observer));
        self
    }

    /// Get the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// One-time setup: eagerly mint the core connections and mark the pool
    /// usable.
    ///
    /// Each core connection is health-checked; ones that fail are skipped
    /// with a warning, without retry. An unhealthy core set is not an
    /// `init` failure — the pool simply starts smaller and refills lazily.
    ///
    /// Returns [`Error::AlreadyInitialized`] on a second call.
    pub fn init(&self) -> Result<()> {
        let mut shared = self.shared.lock();
        if shared.usable {
            return Err(Error::AlreadyInitialized);
        }

        let want = self.config.core_size.min(self.config.capacity());
        if want < self.config.core_size {
            tracing::warn!(
                core_size = self.config.core_size,
                capacity = self.config.capacity(),
                "core_size exceeds pool capacity, clamping eager set"
            );
        }

        for _ in 0..want {
            let mut conn = self.manager.connect();
            match self.manager.check(&mut conn) {
                Ok(()) => {
                    shared.idle.push_back(conn);
                    shared.total += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "core connection failed its initial health check, skipping"
                    );
                }
            }
        }

        shared.usable = true;
        tracing::debug!(idle = shared.idle.len(), "pool initialized");
        Ok(())
    }

    /// Check out a connection.
    ///
    /// Policy, in priority order:
    ///
    /// 1. An idle connection exists: pop it, health-check it, hand it out.
    ///    A failed check discards the connection and returns
    ///    [`Error::Unhealthy`].
    /// 2. No idle connection but the pool is under capacity: mint a fresh
    ///    one via the manager. Fresh connections are trusted and not
    ///    probed.
    /// 3. At capacity with blocking disabled: [`Error::Exhausted`],
    ///    without sleeping.
    /// 4. At capacity with blocking enabled: wait until a check-in frees a
    ///    connection or the wait timeout elapses. A freed connection
    ///    obtained this way is handed out without a second health check
    ///    (it was probed on check-in moments earlier).
    ///
    /// Fails with [`Error::NotInitialized`] before [`init`](Pool::init).
    pub fn checkout(&self) -> Result<PooledConnection<'_, M>> {
        let mut shared = self.shared.lock();
        if !shared.usable {
            return Err(Error::NotInitialized);
        }

        if let Some(conn) = shared.idle.pop_front() {
            shared.using += 1;
            drop(shared);
            return self.vet(conn);
        }

        if shared.total < self.config.capacity() {
            shared.total += 1;
            shared.using += 1;
            drop(shared);
            let conn = self.manager.connect();
            tracing::debug!("minted new connection");
            return Ok(PooledConnection::new(self, conn));
        }

        if !self.config.wait_blocking {
            return Err(Error::Exhausted);
        }

        shared.waiting += 1;
        let deadline = Instant::now() + self.config.wait_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                shared.waiting -= 1;
                return Err(Error::WaitTimeout);
            }

            let timed_out = self.freed.wait_for(&mut shared, remaining).timed_out();

            if let Some(conn) = shared.idle.pop_front() {
                shared.using += 1;
                shared.waiting -= 1;
                drop(shared);
                tracing::trace!("checkout satisfied by freed connection");
                return Ok(PooledConnection::new(self, conn));
            }

            if timed_out {
                shared.waiting -= 1;
                return Err(Error::WaitTimeout);
            }
        }
    }

    /// Get the current pool statistics.
    pub fn stats(&self) -> PoolStats {
        let shared = self.shared.lock();
        PoolStats {
            total_connections: shared.total,
            idle_connections: shared.idle.len(),
            active_connections: shared.using,
            pending_checkouts: shared.waiting,
        }
    }

    /// Check if the pool has admitted its full complement of connections.
    pub fn at_capacity(&self) -> bool {
        self.shared.lock().total >= self.config.capacity()
    }

    /// Health-check a connection popped from the idle queue.
    fn vet(&self, mut conn: M::Connection) -> Result<PooledConnection<'_, M>> {
        match self.manager.check(&mut conn) {
            Ok(()) => Ok(PooledConnection::new(self, conn)),
            Err(health) => {
                drop(conn);
                {
                    let mut shared = self.shared.lock();
                    shared.using = shared.using.saturating_sub(1);
                    shared.total = shared.total.saturating_sub(1);
                }
                let err = Error::Unhealthy(health);
                tracing::warn!(error = %err, "discarding unhealthy connection at checkout");
                self.notify_discard(&err);
                Err(err)
            }
        }
    }

    /// Check a connection back in.
    ///
    /// Check-in never fails from the caller's point of view. A connection
    /// that fails its health check is dropped and the pool shrinks; the
    /// failure is logged and reported to the discard observer.
    fn check_in(&self, mut conn: M::Connection) {
        match self.manager.check(&mut conn) {
            Ok(()) => {
                {
                    let mut shared = self.shared.lock();
                    shared.idle.push_back(conn);
                    shared.using = shared.using.saturating_sub(1);
                }
                self.freed.notify_one();
            }
            Err(health) => {
                drop(conn);
                {
                    let mut shared = self.shared.lock();
                    shared.using = shared.using.saturating_sub(1);
                    shared.total = shared.total.saturating_sub(1);
                }
                let err = Error::Unhealthy(health);
                tracing::error!(error = %err, "discarding unhealthy connection at check-in");
                self.notify_discard(&err);
            }
        }
    }

    /// Remove a checked-out connection from the pool's books entirely.
    fn detach(&self) {
        let mut shared = self.shared.lock();
        shared.using = shared.using.saturating_sub(1);
        shared.total = shared.total.saturating_sub(1);
    }

    fn notify_discard(&self, err: &Error) {
        if let Some(observer) = &self.on_discard {
            observer(err);
        }
    }
}

/// A connection checked out from the pool.
///
/// Dereferences to the underlying connection. On drop the connection is
/// checked back in, where it is health-checked and either returned to the
/// idle queue or discarded.
pub struct PooledConnection<'a, M: ManageConnection> {
    pool: &'a Pool<M>,
    conn: Option<M::Connection>,
}

impl<'a, M: ManageConnection> PooledConnection<'a, M> {
    fn new(pool: &'a Pool<M>, conn: M::Connection) -> Self {
        Self {
            pool,
            conn: Some(conn),
        }
    }

    /// Detach the connection from the pool permanently.
    ///
    /// The pool forgets the connection and its slot frees up; the caller
    /// owns it from here on.
    pub fn take(mut self) -> M::Connection {
        let conn = self.conn.take().expect("connection already taken");
        self.pool.detach();
        conn
    }
}

impl<M: ManageConnection> std::fmt::Debug for PooledConnection<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection").finish_non_exhaustive()
    }
}

impl<M: ManageConnection> std::ops::Deref for PooledConnection<'_, M> {
    type Target = M::Connection;

    fn deref(&self) -> &Self::Target {
        self.conn.as_ref().expect("connection already taken")
    }
}

impl<M: ManageConnection> std::ops::DerefMut for PooledConnection<'_, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().expect("connection already taken")
    }
}

impl<M: ManageConnection> Drop for PooledConnection<'_, M> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.check_in(conn);
        }
    }
}
