//! Connection registry - the single owner of every connection the remote
//! controller creates.
//!
//! Connections are stored in an arena and referenced by [`ConnId`]. Indices
//! built on top of the registry copy ids around freely; only the arena owns
//! the connection objects, and they are dropped once, with the arena.

use tracing::debug;

use super::connection::RemoteConnection;

/// Slot id of a connection in a [`ConnectionRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnId(usize);

impl ConnId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of owned connections
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    conns: Vec<Box<dyn RemoteConnection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a connection
    pub fn add(&mut self, conn: Box<dyn RemoteConnection>) -> ConnId {
        let id = ConnId(self.conns.len());
        self.conns.push(conn);
        id
    }

    pub fn get(&self, id: ConnId) -> Option<&dyn RemoteConnection> {
        self.conns.get(id.0).map(|conn| conn.as_ref())
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnId, &dyn RemoteConnection)> {
        self.conns
            .iter()
            .enumerate()
            .map(|(idx, conn)| (ConnId(idx), conn.as_ref()))
    }
}

impl Drop for ConnectionRegistry {
    fn drop(&mut self) {
        if !self.conns.is_empty() {
            debug!(
                "[ConnectionRegistry] Releasing {} connections",
                self.conns.len()
            );
        }
    }
}
