//! # Async Tasks
//!
//! Spawning of background requests. Each request runs on the Tokio runtime
//! behind a [`futures::future::Abortable`], so the view that started it can
//! cancel it on navigation. A cancelled request sends no event.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_channel::Sender;
use futures::future::{abortable, AbortHandle};
use tokio::task::JoinHandle;

use super::events::AppEvent;
use super::state::View;

/// Handle to one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    owner: Option<View>,
    abort: AbortHandle,
    finished: Arc<AtomicBool>,
}

impl RequestHandle {
    /// View whose lifetime bounds this request; `None` for requests that
    /// must complete regardless of navigation.
    pub fn owner(&self) -> Option<View> {
        self.owner
    }

    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

/// In-flight requests started by the app.
#[derive(Default)]
pub(crate) struct Requests {
    inflight: Vec<(RequestHandle, JoinHandle<()>)>,
}

impl Requests {
    /// Spawn `request` and deliver its event to `event_tx` unless cancelled first.
    pub(crate) fn spawn<F>(
        &mut self,
        owner: Option<View>,
        event_tx: Sender<AppEvent>,
        request: F,
    ) -> RequestHandle
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        self.prune();

        let (task, abort) = abortable(async move {
            let event = request.await;
            if event_tx.send(event).await.is_err() {
                tracing::debug!("App dropped before request completed");
            }
        });

        let finished = Arc::new(AtomicBool::new(false));
        let handle = RequestHandle {
            owner,
            abort,
            finished: finished.clone(),
        };

        let join = tokio::spawn(async move {
            if task.await.is_err() {
                tracing::debug!(owner = ?owner, "Request cancelled");
            }
            finished.store(true, Ordering::Release);
        });

        self.inflight.push((handle.clone(), join));
        handle
    }

    /// Cancel every unfinished request owned by `view` (or the same page with
    /// other parameters). Returns how many were cancelled.
    pub(crate) fn cancel_owned_by(&mut self, view: &View) -> usize {
        let mut cancelled = 0;
        self.inflight.retain(|(handle, _)| {
            let owned = handle.owner.is_some_and(|owner| owner.same_page(view));
            if owned && !handle.is_finished() {
                handle.cancel();
                cancelled += 1;
            }
            !owned
        });
        cancelled
    }

    pub(crate) fn cancel_all(&mut self) {
        for (handle, _) in self.inflight.drain(..) {
            handle.cancel();
        }
    }

    /// Join handles of everything still tracked, leaving the list empty.
    pub(crate) fn take_all(&mut self) -> Vec<JoinHandle<()>> {
        self.inflight.drain(..).map(|(_, join)| join).collect()
    }

    fn prune(&mut self) {
        self.inflight.retain(|(handle, _)| !handle.is_finished());
    }
}
