//! Connectivity gate.
//!
//! The flow controller reads a single boolean at decision time; an
//! external monitor updates it asynchronously. The core never
//! subscribes to change notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Read-side contract consulted synchronously before a login attempt.
pub trait ConnectivityGate {
    /// Latest known online/offline status.
    fn is_connected(&self) -> bool;
}

/// Shared online flag written by an external connectivity probe.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    online: Arc<AtomicBool>,
}

impl NetworkMonitor {
    /// Creates a monitor with the given initial status.
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    /// Updates the flag; called by the probe, not by the flow.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for NetworkMonitor {
    /// Assumes online until a probe reports otherwise.
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityGate for NetworkMonitor {
    fn is_connected(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: clones share the same flag.
    #[test]
    fn test_clones_share_status() {
        let monitor = NetworkMonitor::default();
        let probe = monitor.clone();
        assert!(monitor.is_connected());

        probe.set_online(false);
        assert!(!monitor.is_connected());

        probe.set_online(true);
        assert!(monitor.is_connected());
    }
}
