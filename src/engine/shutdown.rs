// src/engine/shutdown.rs

//! Shutdown request flag shared between signal listeners and the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{info, warn};

/// Set once when shutdown is requested; checked at the top of the loop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolves after [`ShutdownFlag::request`] has been called.
    pub async fn wait(&self) {
        while !self.is_requested() {
            self.wake.notified().await;
        }
    }
}

/// Request shutdown on Ctrl-C (and SIGTERM on unix).
pub fn spawn_signal_listener(flag: ShutdownFlag) {
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            warn!(error = %e, "failed to listen for shutdown signals");
            return;
        }
        info!("shutdown signal received");
        flag.request();
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_returns_after_request() {
        let flag = ShutdownFlag::new();
        let waiter = flag.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });

        assert!(!flag.is_requested());
        flag.request();
        handle.await.unwrap();
        assert!(flag.is_requested());
    }
}
