// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::errors::Result;
use crate::exec::ProcessBackend;
use crate::watch::NotificationBackend;

use super::core::CoreRuntime;
use super::shutdown::ShutdownFlag;
use super::{LoopEvent, RunSummary};

/// Drives the core in response to notifications, child exits, a periodic
/// tick and shutdown requests.
///
/// This is a thin async shell around `CoreRuntime`: it owns every wait, and
/// the core does the work for whichever source woke it up.
pub struct Runtime<B: NotificationBackend, P: ProcessBackend> {
    core: CoreRuntime<B, P>,
    shutdown: ShutdownFlag,
    reap_interval: Duration,
}

impl<B: NotificationBackend, P: ProcessBackend> fmt::Debug for Runtime<B, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("reap_interval", &self.reap_interval)
            .field("shutdown_requested", &self.shutdown.is_requested())
            .finish_non_exhaustive()
    }
}

impl<B: NotificationBackend, P: ProcessBackend> Runtime<B, P> {
    pub fn new(core: CoreRuntime<B, P>, shutdown: ShutdownFlag, reap_interval: Duration) -> Self {
        Self {
            core,
            shutdown,
            reap_interval,
        }
    }

    /// Main event loop.
    ///
    /// The shutdown flag is only checked between wake-ups; work started for
    /// one wake-up always runs to completion.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("logwatch runtime started");

        let mut child_exits = ChildExitSignal::new();
        let mut tick = tokio::time::interval(self.reap_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.shutdown.is_requested() {
            let event = tokio::select! {
                records = self.core.wait_for_events(self.reap_interval) => {
                    LoopEvent::Notifications(records)
                }
                _ = child_exits.recv() => LoopEvent::ChildExited,
                _ = tick.tick() => LoopEvent::Tick,
                _ = self.shutdown.wait() => LoopEvent::ShutdownRequested,
            };

            trace!(?event, "runtime woke up");

            let step = self.core.step(event);
            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        let summary = self.core.shutdown();
        info!(
            matches = summary.matches,
            actions_started = summary.actions.spawned,
            actions_suppressed = summary.actions.suppressed,
            "runtime exiting"
        );
        Ok(summary)
    }
}

/// Wakes the loop when the process receives SIGCHLD.
///
/// Only records that *something* exited; the core then polls every child.
struct ChildExitSignal {
    #[cfg(unix)]
    inner: Option<tokio::signal::unix::Signal>,
}

impl ChildExitSignal {
    #[cfg(unix)]
    fn new() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        let inner = match signal(SignalKind::child()) {
            Ok(sig) => Some(sig),
            Err(err) => {
                warn!(error = %err, "SIGCHLD listener unavailable; relying on periodic reaping");
                None
            }
        };
        Self { inner }
    }

    #[cfg(not(unix))]
    fn new() -> Self {
        Self {}
    }

    #[cfg(unix)]
    async fn recv(&mut self) {
        match self.inner.as_mut() {
            Some(sig) => {
                if sig.recv().await.is_none() {
                    debug!("SIGCHLD stream closed");
                    self.inner = None;
                    std::future::pending::<()>().await;
                }
            }
            None => std::future::pending::<()>().await,
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) {
        std::future::pending::<()>().await
    }
}
