//! Sources of network path updates.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStatus {
    Satisfied,
    Unsatisfied,
}

impl PathStatus {
    pub fn is_reachable(self) -> bool {
        self == PathStatus::Satisfied
    }
}

/// Something that reports network path changes.
#[async_trait]
pub trait PathObserver: Send + 'static {
    /// Waits for the next path update.
    ///
    /// `None` means the observer stopped and no further updates will arrive.
    async fn next_status(&mut self) -> Option<PathStatus>;
}

/// Observer fed by a host that pushes path events itself.
pub struct ChannelPathObserver {
    rx: mpsc::UnboundedReceiver<PathStatus>,
}

/// Sending half of a [`ChannelPathObserver`].
#[derive(Clone)]
pub struct PathReporter {
    tx: mpsc::UnboundedSender<PathStatus>,
}

impl PathReporter {
    /// Reports a path change. Returns `false` once the observing monitor is gone.
    pub fn report(&self, status: PathStatus) -> bool {
        self.tx.send(status).is_ok()
    }
}

pub fn channel_observer() -> (PathReporter, ChannelPathObserver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (PathReporter { tx }, ChannelPathObserver { rx })
}

#[async_trait]
impl PathObserver for ChannelPathObserver {
    async fn next_status(&mut self) -> Option<PathStatus> {
        self.rx.recv().await
    }
}

/// Polls reachability by opening a TCP connection to a well-known endpoint.
///
/// Only transitions are reported; the first probe is always reported.
pub struct TcpProbeObserver {
    addr: String,
    interval: Duration,
    connect_timeout: Duration,
    ticker: Option<Interval>,
    last: Option<PathStatus>,
}

impl TcpProbeObserver {
    pub fn new(addr: impl Into<String>, interval: Duration) -> Self {
        Self {
            addr: addr.into(),
            interval,
            connect_timeout: interval.min(Duration::from_secs(3)),
            ticker: None,
            last: None,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    async fn probe(&self) -> PathStatus {
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(_)) => PathStatus::Satisfied,
            Ok(Err(e)) => {
                debug!("Reachability probe to {} failed: {}", self.addr, e);
                PathStatus::Unsatisfied
            }
            Err(_) => {
                debug!("Reachability probe to {} timed out", self.addr);
                PathStatus::Unsatisfied
            }
        }
    }
}

#[async_trait]
impl PathObserver for TcpProbeObserver {
    async fn next_status(&mut self) -> Option<PathStatus> {
        let period = self.interval;
        loop {
            // First tick completes immediately.
            self.ticker
                .get_or_insert_with(|| {
                    let mut ticker = tokio::time::interval(period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    ticker
                })
                .tick()
                .await;

            let status = self.probe().await;
            if self.last != Some(status) {
                self.last = Some(status);
                return Some(status);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_channel_observer_forwards_reports() {
        let (reporter, mut observer) = channel_observer();
        assert!(reporter.report(PathStatus::Unsatisfied));
        assert!(reporter.report(PathStatus::Satisfied));

        assert_eq!(observer.next_status().await, Some(PathStatus::Unsatisfied));
        assert_eq!(observer.next_status().await, Some(PathStatus::Satisfied));

        drop(reporter);
        assert_eq!(observer.next_status().await, None);
    }

    #[tokio::test]
    async fn test_reporter_notices_dropped_observer() {
        let (reporter, observer) = channel_observer();
        drop(observer);
        assert!(!reporter.report(PathStatus::Satisfied));
    }

    #[tokio::test]
    async fn test_tcp_probe_reports_transitions() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let mut observer = TcpProbeObserver::new(addr, Duration::from_millis(20));

        assert_eq!(observer.next_status().await, Some(PathStatus::Satisfied));

        drop(listener);
        assert_eq!(observer.next_status().await, Some(PathStatus::Unsatisfied));
    }
}
