//! # Connection Manager
//!
//! Tracks live peer connections and the bans issued against them.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

use mw_05_block_pipeline::{BanReason, PeerPenaltySink};
use shared_types::ConnectionId;

#[derive(Clone, Debug)]
struct ConnectionInfo {
    address: String,
    banned: Option<BanReason>,
}

/// Registry of peer connections.
#[derive(Default)]
pub struct ConnectionManager {
    next_id: AtomicU64,
    connections: RwLock<HashMap<ConnectionId, ConnectionInfo>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and return its id.
    pub fn connect(&self, address: impl Into<String>) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.connections.write().insert(
            id,
            ConnectionInfo {
                address: address.into(),
                banned: None,
            },
        );
        id
    }

    pub fn is_banned(&self, connection_id: ConnectionId) -> bool {
        self.ban_reason(connection_id).is_some()
    }

    pub fn ban_reason(&self, connection_id: ConnectionId) -> Option<BanReason> {
        self.connections
            .read()
            .get(&connection_id)
            .and_then(|info| info.banned)
    }

    pub fn banned_count(&self) -> usize {
        self.connections
            .read()
            .values()
            .filter(|info| info.banned.is_some())
            .count()
    }

    /// Connections that are not banned.
    pub fn active_count(&self) -> usize {
        self.connections
            .read()
            .values()
            .filter(|info| info.banned.is_none())
            .count()
    }
}

impl PeerPenaltySink for ConnectionManager {
    fn ban_connection(&self, connection_id: ConnectionId, reason: BanReason) {
        let mut connections = self.connections.write();
        let info = connections
            .entry(connection_id)
            .or_insert_with(|| ConnectionInfo {
                address: "unknown".to_string(),
                banned: None,
            });

        // Logged once; the first reason sticks.
        if info.banned.is_none() {
            info.banned = Some(reason);
            warn!("Banned {} ({}): {}", connection_id, info.address, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_assigns_distinct_ids() {
        let manager = ConnectionManager::new();
        let a = manager.connect("10.0.0.1:3414");
        let b = manager.connect("10.0.0.2:3414");

        assert_ne!(a, b);
        assert_eq!(manager.active_count(), 2);
        assert_eq!(manager.banned_count(), 0);
    }

    #[test]
    fn test_ban_marks_connection() {
        let manager = ConnectionManager::new();
        let peer = manager.connect("10.0.0.1:3414");

        manager.ban_connection(peer, BanReason::BadBlock);
        manager.ban_connection(peer, BanReason::BadBlock);

        assert!(manager.is_banned(peer));
        assert_eq!(manager.ban_reason(peer), Some(BanReason::BadBlock));
        assert_eq!(manager.banned_count(), 1);
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn test_ban_of_unknown_connection_is_recorded() {
        let manager = ConnectionManager::new();
        manager.ban_connection(ConnectionId(99), BanReason::BadBlock);

        assert!(manager.is_banned(ConnectionId(99)));
        assert_eq!(manager.banned_count(), 1);
    }
}
