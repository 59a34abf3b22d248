//! Connector sockets on placed zone modules

use glam::Vec3;

use crate::core::types::SocketRef;

/// Occupancy of a socket.
///
/// A socket leaves `Open` exactly once and never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    /// Available as an attachment target
    Open,
    /// Joined to another module's socket
    Connected { to: SocketRef },
    /// Closed without a partner (dead end)
    Sealed,
}

/// A socket in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    pub name: String,
    pub position: Vec3,
    pub facing: Vec3,
    state: SocketState,
}

impl Socket {
    pub fn new(name: impl Into<String>, position: Vec3, facing: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            facing,
            state: SocketState::Open,
        }
    }

    pub fn state(&self) -> SocketState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SocketState::Open
    }

    /// Mark as joined to `to`; returns false if the socket was already occupied
    pub fn connect(&mut self, to: SocketRef) -> bool {
        self.occupy(SocketState::Connected { to })
    }

    /// Close as a dead end; returns false if the socket was already occupied
    pub fn seal(&mut self) -> bool {
        self.occupy(SocketState::Sealed)
    }

    fn occupy(&mut self, next: SocketState) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = next;
        true
    }
}
