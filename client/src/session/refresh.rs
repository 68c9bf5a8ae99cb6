//! # Refresh Coordinator
//!
//! Collapses concurrent session refreshes into one network call.
//!
//! ```text
//!            first caller                     leader settles
//!   Idle ──────────────────▶ Refreshing ─────────────────────▶ Idle
//!                            │  later callers park on a
//!                            │  oneshot continuation
//!                            ▼
//!                         waiters[]  ◀── all released with the same outcome
//! ```
//!
//! The leader swaps the phase back to `Idle` and takes the waiter queue in
//! one critical section, then releases every waiter. A caller arriving after
//! that swap starts a fresh refresh instead of joining a finished one.
//!
//! A leader can be dropped mid-refresh when the task that owns it is
//! aborted. Its waiters are then woken without an outcome and go round
//! again: the first one back leads a new refresh, the rest join it.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::core::error::Result;

/// What every participant of one refresh observes.
pub type RefreshOutcome = Result<()>;

enum Phase {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    },
}

pub struct RefreshCoordinator {
    phase: Mutex<Phase>,
    refreshes: AtomicUsize,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self {
            phase: Mutex::new(Phase::Idle),
            refreshes: AtomicUsize::new(0),
        }
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lead a refresh, or join the one already in flight.
    ///
    /// Only the leader runs `refresh`. Waiters get the leader's outcome; if
    /// the leader's future is dropped before it settles, they retry and one
    /// of them takes over with its own `refresh`.
    pub async fn refresh_or_join<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        loop {
            let waiter = {
                let mut phase = self.phase.lock();
                match &mut *phase {
                    Phase::Refreshing { waiters } => {
                        let (tx, rx) = oneshot::channel();
                        waiters.push(tx);
                        Some(rx)
                    }
                    Phase::Idle => {
                        *phase = Phase::Refreshing {
                            waiters: Vec::new(),
                        };
                        None
                    }
                }
            };

            let Some(rx) = waiter else { break };
            tracing::debug!("Joining in-flight session refresh");
            match rx.await {
                Ok(outcome) => return outcome,
                Err(_) => tracing::debug!("Refresh leader went away, retrying"),
            }
        }

        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let mut guard = LeaderGuard {
            coordinator: self,
            settled: false,
        };
        let outcome = refresh().await;
        guard.settle(outcome.clone());
        outcome
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.phase.lock(), Phase::Refreshing { .. })
    }

    /// Number of refreshes led so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn take_waiters(&self) -> Vec<oneshot::Sender<RefreshOutcome>> {
        match std::mem::replace(&mut *self.phase.lock(), Phase::Idle) {
            Phase::Refreshing { waiters } => waiters,
            Phase::Idle => Vec::new(),
        }
    }

    fn release(&self, outcome: RefreshOutcome) {
        let waiters = self.take_waiters();

        if !waiters.is_empty() {
            tracing::debug!(waiters = waiters.len(), ok = outcome.is_ok(), "Releasing refresh waiters");
        }
        for waiter in waiters {
            // A waiter whose caller went away has dropped its receiver
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Settles the queue even when the leader is dropped mid-refresh.
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    fn settle(&mut self, outcome: RefreshOutcome) {
        self.settled = true;
        self.coordinator.release(outcome);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            // Dropping the senders wakes the waiters so one can take over
            let waiters = self.coordinator.take_waiters();
            tracing::warn!(waiters = waiters.len(), "Session refresh abandoned by its leader");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ClientError;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let coordinator = RefreshCoordinator::new();
        let slow = || async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        };

        let (a, b, c) = tokio::join!(
            coordinator.refresh_or_join(slow),
            coordinator.refresh_or_join(slow),
            coordinator.refresh_or_join(slow),
        );

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(coordinator.refresh_count(), 1);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_waiters_receive_leader_failure() {
        let coordinator = RefreshCoordinator::new();
        let failing = || async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(ClientError::SessionExpired)
        };

        let (a, b) = tokio::join!(
            coordinator.refresh_or_join(failing),
            coordinator.refresh_or_join(failing),
        );

        assert_eq!(a, Err(ClientError::SessionExpired));
        assert_eq!(b, Err(ClientError::SessionExpired));
        assert_eq!(coordinator.refresh_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_settle_starts_new_cycle() {
        let coordinator = RefreshCoordinator::new();

        coordinator.refresh_or_join(|| async { Ok(()) }).await.unwrap();
        coordinator.refresh_or_join(|| async { Ok(()) }).await.unwrap();

        assert_eq!(coordinator.refresh_count(), 2);
    }

    #[tokio::test]
    async fn test_dropped_leader_hands_over_to_waiter() {
        let coordinator = Arc::new(RefreshCoordinator::new());

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_join(|| async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok(())
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(coordinator.is_refreshing());

        let waiter = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_join(|| async { Err(ClientError::SessionExpired) })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        leader.abort();
        let outcome = waiter.await.expect("waiter task should finish");

        // The waiter led the second refresh and saw its own outcome
        assert_eq!(outcome, Err(ClientError::SessionExpired));
        assert!(!coordinator.is_refreshing());
        assert_eq!(coordinator.refresh_count(), 2);
    }
}
