use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;
use tracing::debug;

/// Probe target. Port 443 of a well-known anycast resolver answers fast
/// from essentially anywhere.
const PROBE_ADDR: &str = "1.1.1.1:443";

/// How often the background probe re-checks reachability
const PROBE_INTERVAL_SECS: u64 = 15;

/// Per-probe connect timeout.
/// 3s separates "down" from "slow" without stalling the probe loop.
const PROBE_TIMEOUT_SECS: u64 = 3;

/// Synchronous reachability query, consulted before any request.
pub trait Connectivity {
    fn is_connected(&self) -> bool;
}

/// Shared reachability flag updated asynchronously by a probe task.
///
/// Clones share the same flag - hand one to the login flow and keep one
/// wherever the probe task is spawned.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    online: Arc<AtomicBool>,
}

impl ConnectivityMonitor {
    /// Starts optimistic: callers see "online" until the first probe lands.
    pub fn new() -> Self {
        Self {
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Spawn the periodic probe task on the current runtime.
    ///
    /// The first probe runs immediately; afterwards the flag is refreshed
    /// every [`PROBE_INTERVAL_SECS`].
    pub fn spawn_probe(&self) -> tokio::task::JoinHandle<()> {
        let online = Arc::clone(&self.online);
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(PROBE_INTERVAL_SECS));
            loop {
                interval.tick().await;
                let reachable = Self::probe().await;
                if online.swap(reachable, Ordering::Relaxed) != reachable {
                    debug!(reachable, "Connectivity changed");
                }
            }
        })
    }

    async fn probe() -> bool {
        matches!(
            time::timeout(
                Duration::from_secs(PROBE_TIMEOUT_SECS),
                TcpStream::connect(PROBE_ADDR),
            )
            .await,
            Ok(Ok(_))
        )
    }

    /// Override the flag directly (manual offline mode, tests)
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_connected(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}
