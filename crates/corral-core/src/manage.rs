//! The connection-manager seam between the pool and the pooled client.
//!
//! The pool never talks to the network itself. Callers supply a
//! [`ManageConnection`] that mints connections and probes their liveness;
//! the pool only decides when to call each operation.

use std::marker::PhantomData;

use crate::error::HealthError;

/// Mints new connections and probes existing ones for liveness.
///
/// The two operations correspond to the factory and health-check halves of
/// the pool contract:
///
/// - [`connect`](ManageConnection::connect) is infallible: it is assumed to
///   never block indefinitely and to always hand back a usable instance.
///   Connections fresh from the factory are trusted and handed out without
///   a probe.
/// - [`check`](ManageConnection::check) is a lightweight liveness probe
///   (typically a ping). The pool runs it on every checkout of an idle
///   connection and on every check-in.
///
/// There is no close hook. A connection evicted for bad health is simply
/// dropped; resource release happens in the connection's own `Drop`.
pub trait ManageConnection: Send + Sync + 'static {
    /// The opaque connection handle this manager produces.
    type Connection: Send;

    /// Mint a new connection.
    fn connect(&self) -> Self::Connection;

    /// Probe a connection for liveness.
    fn check(&self, conn: &mut Self::Connection) -> Result<(), HealthError>;
}

/// A [`ManageConnection`] built from two closures.
///
/// Handy when the factory and probe are simple enough that a dedicated
/// manager type would be noise:
///
/// ```
/// use corral_core::{FnManager, ManageConnection};
///
/// let manager = FnManager::new(|| vec![0u8; 16], |_conn: &mut Vec<u8>| Ok(()));
/// let mut conn = manager.connect();
/// assert!(manager.check(&mut conn).is_ok());
/// ```
pub struct FnManager<C, F, H> {
    connect: F,
    check: H,
    _marker: PhantomData<fn() -> C>,
}

impl<C, F, H> FnManager<C, F, H>
where
    C: Send + 'static,
    F: Fn() -> C + Send + Sync + 'static,
    H: Fn(&mut C) -> Result<(), HealthError> + Send + Sync + 'static,
{
    /// Build a manager from a factory closure and a health-check closure.
    pub fn new(connect: F, check: H) -> Self {
        Self {
            connect,
            check,
            _marker: PhantomData,
        }
    }
}

impl<C, F, H> ManageConnection for FnManager<C, F, H>
where
    C: Send + 'static,
    F: Fn() -> C + Send + Sync + 'static,
    H: Fn(&mut C) -> Result<(), HealthError> + Send + Sync + 'static,
{
    type Connection = C;

    fn connect(&self) -> C {
        (self.connect)()
    }

    fn check(&self, conn: &mut C) -> Result<(), HealthError> {
        (self.check)(conn)
    }
}
