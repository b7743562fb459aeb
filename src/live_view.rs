//! Query results kept fresh by a change feed.
//!
//! A live view runs its query once, then re-runs it in full whenever a
//! relevant change notification arrives. Nothing is patched in place.

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::actor_framework::Change;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Handle to a background refresh task. Dropping it stops the task.
pub struct LiveView<T> {
    state: watch::Receiver<ViewState<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> LiveView<T> {
    /// Starts the view. `changes` must be subscribed before any write the view
    /// is expected to observe.
    pub fn spawn<Id, R, F, Fut, E>(mut changes: broadcast::Receiver<Change<Id>>, relevant: R, fetch: F) -> Self
    where
        Id: Clone + Send + Sync + 'static,
        R: Fn(&Change<Id>) -> bool + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send,
        E: Display + Send + 'static,
    {
        let (tx, rx) = watch::channel(ViewState::Loading);
        let task = tokio::spawn(async move {
            refresh(&tx, &fetch).await;
            loop {
                match changes.recv().await {
                    Ok(change) if relevant(&change) => {
                        debug!(table = change.table, kind = ?change.kind, "Change received, reloading");
                        refresh(&tx, &fetch).await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Change feed lagged, reloading");
                        refresh(&tx, &fetch).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                if tx.is_closed() {
                    break;
                }
            }
        });
        Self { state: rx, task }
    }

    /// Waits until the view reaches a state matching `pred`.
    ///
    /// Returns `None` if the refresh task has stopped.
    pub async fn wait_for(&mut self, mut pred: impl FnMut(&ViewState<T>) -> bool) -> Option<ViewState<T>> {
        let state = self.state.wait_for(|state| pred(state)).await.ok()?;
        Some((*state).clone())
    }
}

/// Abort handles for the views spawned through one client.
///
/// A view's task holds client clones, which keep the actors' channels open.
/// Aborting every tracked view lets a shutdown drain the actors even while
/// callers still hold view handles.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    handles: Arc<Mutex<Vec<AbortHandle>>>,
}

impl ViewRegistry {
    pub fn track<T>(&self, view: &LiveView<T>) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.retain(|handle| !handle.is_finished());
        handles.push(view.task.abort_handle());
    }

    /// Stops every view still running and returns how many there were.
    pub fn abort_all(&self) -> usize {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.retain(|handle| !handle.is_finished());
        let running = handles.len();
        for handle in handles.drain(..) {
            handle.abort();
        }
        running
    }
}

impl<T> Drop for LiveView<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn refresh<T, F, Fut, E>(tx: &watch::Sender<ViewState<T>>, fetch: &F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let next = match fetch().await {
        Ok(value) => ViewState::Ready(value),
        Err(e) => {
            warn!(error = %e, "Live view refresh failed");
            ViewState::Failed(e.to_string())
        }
    };
    let _ = tx.send(next);
}
