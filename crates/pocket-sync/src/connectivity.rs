//! # Connectivity Monitor
//!
//! The host environment's online/offline signal, carried on a watch
//! channel so the sync agent (and any other subscriber) can react to
//! transitions without polling.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Connectivity Signal Flow                             │
//! │                                                                         │
//! │  Host environment (webview events, NetworkManager, heartbeat probe)    │
//! │       │                                                                 │
//! │       ▼  set_online(bool)   ← deduplicated: repeats are dropped        │
//! │  ConnectivityMonitor                                                   │
//! │       │                                                                 │
//! │       ├── is_online()      current flag, for the drain precondition    │
//! │       │                                                                 │
//! │       └── subscribe()      watch::Receiver<bool> for the agent loop    │
//! │                                                                         │
//! │  offline→online  : agent runs one drain pass                           │
//! │  online→offline  : flag flips, nothing else happens                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The monitor itself never probes the network. Deciding what "online"
//! means is the host's job; this type only distributes the answer.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Distributes the host's online/offline signal.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    sender: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the given initial state.
    pub fn new(initially_online: bool) -> Self {
        let (sender, _) = watch::channel(initially_online);
        ConnectivityMonitor {
            sender: Arc::new(sender),
        }
    }

    /// Current network-reachability flag.
    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    /// Feeds a reachability change from the host environment.
    ///
    /// Repeated reports of the current state are dropped, so subscribers
    /// observe each transition at most once.
    pub fn set_online(&self, online: bool) {
        let changed = self.sender.send_if_modified(|current| {
            if *current != online {
                *current = online;
                true
            } else {
                false
            }
        });

        if changed {
            debug!(online, "Connectivity changed");
        }
    }

    /// Subscribes to connectivity transitions.
    ///
    /// The receiver observes the state as of subscription and wakes on
    /// every subsequent transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    /// An initially-online monitor.
    fn default() -> Self {
        ConnectivityMonitor::new(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
