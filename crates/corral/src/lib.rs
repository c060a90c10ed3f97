//! Bounded pooling for reusable network-client connections.
//!
//! A pool holds a fixed-capacity set of connections so callers can borrow
//! one, use it, and hand it back without paying connection-setup cost per
//! request. The caller supplies the connection itself through a
//! [`ManageConnection`]: a factory that mints connections and a
//! health-check probe that decides whether one is safe to reuse.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use corral::{FnManager, Pool, PoolConfig};
//!
//! let config = PoolConfig::new(4)
//!     .core_size(2)
//!     .max_idle(2)
//!     .wait_timeout(Duration::from_millis(100));
//!
//! // A stand-in client; a real manager would dial a server here.
//! let manager = FnManager::new(|| String::from("client"), |_conn: &mut String| Ok(()));
//!
//! let pool = Pool::new(manager, config);
//! pool.init().expect("first init");
//!
//! let conn = pool.checkout().expect("checkout");
//! assert_eq!(&*conn, "client");
//! drop(conn); // checked back in, health-checked, and kept for reuse
//!
//! assert_eq!(pool.stats().idle_connections, 2);
//! ```
//!
//! # Lifecycle
//!
//! Construction is two-phase: [`Pool::new`] followed by exactly one
//! [`Pool::init`], which eagerly mints the configured core connections.
//! Checkouts before `init` fail with [`Error::NotInitialized`].
//!
//! Checked-out connections are RAII guards ([`PooledConnection`]): drop
//! returns the connection to the pool, where it is health-checked and
//! either queued for reuse or discarded.

pub mod config;
pub mod pool;

pub use config::PoolConfig;
pub use pool::{Pool, PoolStats, PooledConnection};

pub use corral_core::{Error, FnManager, HealthError, ManageConnection, Result};
