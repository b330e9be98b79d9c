//! Live session registry with room-scoped delivery.
//!
//! Each connected session gets an unbounded `mpsc` mailbox for outbound
//! events; the connection's own write loop drains it and tears it down with
//! the session. The registry exclusively owns the connection -> (identity,
//! room, mailbox) mapping. Nothing here is persisted -- the map is rebuilt
//! from scratch as connections come and go.

use std::fmt;

use dashmap::DashMap;
use roomee_types::event::ServerEvent;
use roomee_types::room::RoomKey;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Identifier for a single live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh connection id (UUID v7, time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-connection session state.
///
/// Identity and room are unset until the first join; a later join
/// overwrites both (last join wins, one room per session).
struct SessionEntry {
    user_id: Option<String>,
    room: Option<RoomKey>,
    outbound: mpsc::UnboundedSender<ServerEvent>,
}

/// Registry of live chat sessions.
///
/// All mutations are in-memory. Operations on unknown connection ids are
/// defensive no-ops: a disconnect can race a late event, and the registry
/// never raises for the losing side.
pub struct SessionRegistry {
    sessions: DashMap<ConnectionId, SessionEntry>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a session with no identity or room; called on connect.
    ///
    /// If the connection id is already registered, the old mailbox is
    /// replaced.
    pub fn register(&self, conn: ConnectionId, outbound: mpsc::UnboundedSender<ServerEvent>) {
        self.sessions.insert(
            conn,
            SessionEntry {
                user_id: None,
                room: None,
                outbound,
            },
        );
        debug!(%conn, "session registered");
    }

    /// Record a join: set the session's identity and room.
    ///
    /// The room is computed from the pair; re-invocation overwrites the
    /// prior identity and room with no explicit leave step. Returns the
    /// room key, or `None` for an unknown connection.
    pub fn join(&self, conn: ConnectionId, self_id: &str, other_id: &str) -> Option<RoomKey> {
        let Some(mut entry) = self.sessions.get_mut(&conn) else {
            debug!(%conn, "join for unknown connection ignored");
            return None;
        };
        let room = RoomKey::for_pair(self_id, other_id);
        entry.user_id = Some(self_id.to_string());
        entry.room = Some(room.clone());
        debug!(%conn, user_id = self_id, room = %room, "session joined room");
        Some(room)
    }

    /// Remove a session; called on disconnect. Returns `true` if it existed.
    pub fn unregister(&self, conn: ConnectionId) -> bool {
        let removed = self.sessions.remove(&conn).is_some();
        if removed {
            debug!(%conn, "session unregistered");
        }
        removed
    }

    /// The identity the session last joined with, if any.
    pub fn identity_of(&self, conn: ConnectionId) -> Option<String> {
        self.sessions.get(&conn)?.user_id.clone()
    }

    /// The room the session last joined, if any.
    pub fn room_of(&self, conn: ConnectionId) -> Option<RoomKey> {
        self.sessions.get(&conn)?.room.clone()
    }

    /// Connections currently subscribed to a room.
    pub fn members_of(&self, room: &RoomKey) -> Vec<ConnectionId> {
        self.sessions
            .iter()
            .filter(|entry| entry.value().room.as_ref() == Some(room))
            .map(|entry| *entry.key())
            .collect()
    }

    /// Deliver an event to one connection.
    ///
    /// Returns `false` if the connection is unknown or its mailbox is
    /// already closed.
    pub fn send_to(&self, conn: ConnectionId, event: ServerEvent) -> bool {
        match self.sessions.get(&conn) {
            Some(entry) => entry.outbound.send(event).is_ok(),
            None => false,
        }
    }

    /// Deliver an event to every member of a room; returns the delivery
    /// count. A room with no members is a silent no-op.
    pub fn broadcast(&self, room: &RoomKey, event: ServerEvent) -> usize {
        let mut delivered = 0;
        for entry in self.sessions.iter() {
            if entry.value().room.as_ref() == Some(room)
                && entry.value().outbound.send(event.clone()).is_ok()
            {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("connections", &self.sessions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(registry: &SessionRegistry) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let conn = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(conn, tx);
        (conn, rx)
    }

    #[test]
    fn register_and_unregister() {
        let registry = SessionRegistry::new();
        let (conn, _rx) = connect(&registry);
        assert_eq!(registry.connection_count(), 1);

        assert!(registry.unregister(conn));
        assert_eq!(registry.connection_count(), 0);
    }

    #[test]
    fn unregister_unknown_connection_is_noop() {
        let registry = SessionRegistry::new();
        assert!(!registry.unregister(ConnectionId::new()));
    }

    #[test]
    fn join_sets_identity_and_room() {
        let registry = SessionRegistry::new();
        let (conn, _rx) = connect(&registry);

        let room = registry.join(conn, "1", "2").unwrap();
        assert_eq!(room.as_str(), "1-2");
        assert_eq!(registry.identity_of(conn).as_deref(), Some("1"));
        assert_eq!(registry.room_of(conn), Some(room));
    }

    #[test]
    fn join_unknown_connection_is_noop() {
        let registry = SessionRegistry::new();
        assert!(registry.join(ConnectionId::new(), "1", "2").is_none());
    }

    #[test]
    fn join_is_idempotent() {
        let registry = SessionRegistry::new();
        let (conn, _rx) = connect(&registry);

        registry.join(conn, "1", "2");
        let identity = registry.identity_of(conn);
        let room = registry.room_of(conn);

        registry.join(conn, "1", "2");
        assert_eq!(registry.identity_of(conn), identity);
        assert_eq!(registry.room_of(conn), room);
    }

    #[test]
    fn rejoin_overwrites_identity_and_room() {
        let registry = SessionRegistry::new();
        let (conn, _rx) = connect(&registry);

        registry.join(conn, "1", "2");
        registry.join(conn, "3", "4");

        assert_eq!(registry.identity_of(conn).as_deref(), Some("3"));
        assert_eq!(registry.room_of(conn).unwrap().as_str(), "3-4");
        // No residual membership in the first room.
        assert!(registry.members_of(&RoomKey::for_pair("1", "2")).is_empty());
    }

    #[test]
    fn members_of_returns_joined_connections() {
        let registry = SessionRegistry::new();
        let (conn_a, _rx_a) = connect(&registry);
        let (conn_b, _rx_b) = connect(&registry);
        let (conn_c, _rx_c) = connect(&registry);

        registry.join(conn_a, "1", "2");
        registry.join(conn_b, "2", "1");
        registry.join(conn_c, "3", "4");

        let mut members = registry.members_of(&RoomKey::for_pair("1", "2"));
        members.sort_by_key(|c| c.to_string());
        let mut expected = vec![conn_a, conn_b];
        expected.sort_by_key(|c| c.to_string());
        assert_eq!(members, expected);
    }

    #[test]
    fn send_to_delivers_into_mailbox() {
        let registry = SessionRegistry::new();
        let (conn, mut rx) = connect(&registry);

        assert!(registry.send_to(conn, ServerEvent::error("boom")));
        let event = rx.try_recv().unwrap();
        assert_eq!(event, ServerEvent::error("boom"));
    }

    #[test]
    fn send_to_unknown_connection_returns_false() {
        let registry = SessionRegistry::new();
        assert!(!registry.send_to(ConnectionId::new(), ServerEvent::error("boom")));
    }

    #[test]
    fn broadcast_reaches_only_room_members() {
        let registry = SessionRegistry::new();
        let (conn_a, mut rx_a) = connect(&registry);
        let (conn_b, mut rx_b) = connect(&registry);
        let (conn_c, mut rx_c) = connect(&registry);

        registry.join(conn_a, "1", "2");
        registry.join(conn_b, "2", "1");
        registry.join(conn_c, "3", "4");

        let delivered = registry.broadcast(
            &RoomKey::for_pair("1", "2"),
            ServerEvent::error("room message"),
        );
        assert_eq!(delivered, 2);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn broadcast_to_empty_room_is_noop() {
        let registry = SessionRegistry::new();
        let delivered =
            registry.broadcast(&RoomKey::for_pair("9", "9"), ServerEvent::error("nobody"));
        assert_eq!(delivered, 0);
    }

    #[test]
    fn debug_impl() {
        let registry = SessionRegistry::new();
        let (_conn, _rx) = connect(&registry);
        let debug = format!("{registry:?}");
        assert!(debug.contains("SessionRegistry"));
        assert!(debug.contains("connections"));
    }
}
