//! Network reachability tracking.

mod monitor;
mod observers;

pub use monitor::ConnectivityMonitor;
pub use observers::{
    channel_observer, ChannelPathObserver, PathObserver, PathReporter, PathStatus,
    TcpProbeObserver,
};
