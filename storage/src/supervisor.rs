//! Connection supervisor: owns the single storage connection and restores it after failures.
//!
//! Two states, [`ConnectionState::Connected`] and [`ConnectionState::Disconnected`]. Starts
//! Disconnected; [`ConnectionSupervisor::connect`] must succeed once before traffic is accepted.
//! A reported failure flips the state to Disconnected and spawns one background reconnection
//! loop; the operation that failed is not replayed.
//!
//! State changes are published on a `tokio::sync::watch` channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify, RwLock};
use tracing::{debug, error, info, warn};

use crate::error::{Result, StorageError};
use crate::retry::RetryPolicy;
use crate::store::{Connector, MessageStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

pub struct ConnectionSupervisor<C: Connector> {
    connector: C,
    policy: RetryPolicy,
    /// Cloned out for each operation; the lock is never held across a query.
    connection: RwLock<Option<C::Connection>>,
    state: watch::Sender<ConnectionState>,
    /// True while a connect loop runs; at most one loop at a time.
    reconnecting: AtomicBool,
    shut_down: AtomicBool,
    shutdown_notify: Notify,
}

impl<C: Connector> ConnectionSupervisor<C> {
    /// Creates a Disconnected supervisor. Nothing connects until [`Self::connect`].
    pub fn new(connector: C, policy: RetryPolicy) -> Arc<Self> {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Arc::new(Self {
            connector,
            policy,
            connection: RwLock::new(None),
            state,
            reconnecting: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            shutdown_notify: Notify::new(),
        })
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Resolves once the state equals `target`.
    pub async fn wait_for(&self, target: ConnectionState) {
        let mut rx = self.state.subscribe();
        // Err only if the sender is dropped, which cannot happen while `self` is borrowed.
        let _ = rx.wait_for(|state| *state == target).await;
    }

    /// Initial connect, retried in the caller's task according to the policy.
    pub async fn connect(&self) -> Result<()> {
        if self.reconnecting.swap(true, Ordering::AcqRel) {
            return Err(StorageError::ConnectionFailure(
                "connect already in progress".to_string(),
            ));
        }
        let outcome = self.connect_loop().await;
        self.reconnecting.store(false, Ordering::Release);
        outcome
    }

    /// Current connection handle. Rejects immediately while Disconnected.
    pub async fn handle(&self) -> Result<C::Connection> {
        if self.state() == ConnectionState::Disconnected {
            return Err(StorageError::ConnectionFailure(
                "storage is disconnected".to_string(),
            ));
        }
        self.connection
            .read()
            .await
            .clone()
            .ok_or_else(|| StorageError::ConnectionFailure("storage is disconnected".to_string()))
    }

    /// Routes an operation failure: errors the policy treats as reconnect-worthy drop the
    /// connection and start the reconnection loop (if one is not already running).
    pub fn report_failure(self: &Arc<Self>, error: &StorageError) {
        if !self.policy.should_reconnect(error) {
            return;
        }
        let previous = self.state.send_replace(ConnectionState::Disconnected);
        if previous == ConnectionState::Connected {
            warn!(error = %error, "Storage connection lost");
        }
        self.spawn_reconnect();
    }

    fn spawn_reconnect(self: &Arc<Self>) {
        if self.shut_down.load(Ordering::Acquire) {
            return;
        }
        if self.reconnecting.swap(true, Ordering::AcqRel) {
            debug!("Reconnection already in progress");
            return;
        }

        info!(
            delay_ms = self.policy.delay.as_millis() as u64,
            "Starting storage reconnection"
        );
        let supervisor = Arc::clone(self);
        tokio::spawn(async move {
            let stale = supervisor.connection.write().await.take();
            if let Some(stale) = stale {
                tokio::spawn(async move { stale.close().await });
            }
            let outcome = supervisor.connect_loop().await;
            supervisor.reconnecting.store(false, Ordering::Release);
            match outcome {
                // A failure reported between publishing Connected and clearing the flag was
                // absorbed by this loop; pick it up now.
                Ok(()) if supervisor.state() == ConnectionState::Disconnected => {
                    supervisor.spawn_reconnect();
                }
                Ok(()) => {}
                Err(e) => {
                    error!(error = %e, "Storage reconnection stopped; remaining disconnected");
                }
            }
        });
    }

    async fn connect_loop(&self) -> Result<()> {
        let mut failures: u32 = 0;
        loop {
            // Registered before the flag check so a shutdown in between is not missed.
            let shutdown = self.shutdown_notify.notified();
            tokio::pin!(shutdown);
            shutdown.as_mut().enable();

            if self.shut_down.load(Ordering::Acquire) {
                return Err(shut_down_error());
            }

            match self.connector.connect().await {
                Ok(connection) => {
                    let mut slot = self.connection.write().await;
                    // Checked under the lock; shutdown publishes Disconnected while holding it.
                    if self.shut_down.load(Ordering::Acquire) {
                        drop(slot);
                        connection.close().await;
                        return Err(shut_down_error());
                    }
                    *slot = Some(connection);
                    self.state.send_replace(ConnectionState::Connected);
                    drop(slot);
                    info!(attempts = failures + 1, "Storage connected");
                    return Ok(());
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    if self.policy.is_exhausted(failures) {
                        error!(attempts = failures, error = %e, "Giving up on storage connection");
                        return Err(e);
                    }
                    let delay = self.policy.delay_after(failures);
                    warn!(
                        attempt = failures,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Storage connect failed, retrying"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = &mut shutdown => return Err(shut_down_error()),
                    }
                }
            }
        }
    }

    /// Stops any reconnection loop, closes the connection and stays Disconnected for good.
    pub async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
        self.shutdown_notify.notify_waiters();
        self.state.send_replace(ConnectionState::Disconnected);
        let connection = {
            let mut slot = self.connection.write().await;
            // Overrides a Connected published by a loop that installed before seeing the flag.
            self.state.send_replace(ConnectionState::Disconnected);
            slot.take()
        };
        if let Some(connection) = connection {
            connection.close().await;
        }
        info!("Storage supervisor shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

fn shut_down_error() -> StorageError {
    StorageError::ConnectionFailure("storage supervisor shut down".to_string())
}
