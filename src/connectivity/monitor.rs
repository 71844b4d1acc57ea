use super::observers::PathObserver;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Last known network reachability, kept current by a background task.
///
/// Reachability starts out optimistic (`true`) and stays there until the
/// observer reports otherwise. If the observer never starts, it stays `true`
/// for the monitor's whole lifetime.
pub struct ConnectivityMonitor {
    status: watch::Receiver<bool>,
    task: Option<JoinHandle<()>>,
}

impl ConnectivityMonitor {
    /// Starts observing path changes on the current tokio runtime.
    pub fn spawn<O: PathObserver>(mut observer: O) -> Self {
        let (tx, rx) = watch::channel(true);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Connectivity monitor has no runtime, assuming reachable: {}", e);
                return Self {
                    status: rx,
                    task: None,
                };
            }
        };

        let task = handle.spawn(async move {
            while let Some(status) = observer.next_status().await {
                let reachable = status.is_reachable();
                tx.send_if_modified(|current| {
                    if *current == reachable {
                        return false;
                    }
                    info!(
                        "Network is now {}",
                        if reachable { "reachable" } else { "unreachable" }
                    );
                    *current = reachable;
                    true
                });
            }
            debug!("Path observer stopped, keeping last known reachability");
        });

        Self {
            status: rx,
            task: Some(task),
        }
    }

    /// Monitor that never observes anything and always reports reachable.
    pub fn assume_reachable() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self {
            status: rx,
            task: None,
        }
    }

    /// Last known reachability. Never blocks.
    pub fn current_status(&self) -> bool {
        *self.status.borrow()
    }

    /// Receiver notified on every reachability change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.status.clone()
    }

    /// Waits until reachability equals `reachable`.
    ///
    /// Returns `false` if the observer stopped before that happened.
    pub async fn wait_for_status(&self, reachable: bool) -> bool {
        let mut rx = self.status.clone();
        let reached = rx.wait_for(|current| *current == reachable).await.is_ok();
        reached
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
