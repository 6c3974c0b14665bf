// SPDX-License-Identifier: MIT OR Apache-2.0
//! Directional connection points owned by nodes.
//!
//! A socket keeps an ordered list of incident edge ids. The list is one half
//! of a symmetric pair: every id held here is also held by exactly one socket
//! of the opposite direction. All mutation that touches both halves goes
//! through [`Scene`](crate::scene::Scene), which enforces the protocol.

use crate::edge::EdgeId;
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default socket extent, in scene units.
pub const SOCKET_SIZE: f32 = 10.0;

/// Fill colour for inbound sockets.
pub const INBOUND_COLOUR: [u8; 3] = [0, 255, 0];

/// Fill colour for outbound sockets.
pub const OUTBOUND_COLOUR: [u8; 3] = [255, 0, 0];

/// Unique identifier for a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketId(pub Uuid);

impl SocketId {
    /// Create a new random socket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Edges arrive here; drawn flush above the node's top edge.
    Inbound,
    /// Edges leave from here; drawn flush below the node's bottom edge.
    Outbound,
}

impl SocketDirection {
    /// The other direction.
    pub fn opposite(self) -> SocketDirection {
        match self {
            SocketDirection::Inbound => SocketDirection::Outbound,
            SocketDirection::Outbound => SocketDirection::Inbound,
        }
    }
}

/// A connection point on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Socket {
    /// Unique socket ID
    pub id: SocketId,
    /// Direction of this socket
    pub direction: SocketDirection,
    /// Fill colour
    pub colour: [u8; 3],
    position: Pos2,
    width: f32,
    height: f32,
    edges: Vec<EdgeId>,
}

impl Socket {
    /// Create a new socket of the given direction at the origin.
    pub fn new(direction: SocketDirection) -> Self {
        let colour = match direction {
            SocketDirection::Inbound => INBOUND_COLOUR,
            SocketDirection::Outbound => OUTBOUND_COLOUR,
        };
        Self {
            id: SocketId::new(),
            direction,
            colour,
            position: Pos2::ZERO,
            width: SOCKET_SIZE,
            height: SOCKET_SIZE,
            edges: Vec::new(),
        }
    }

    /// Top-left corner of the socket.
    pub fn position(&self) -> Pos2 {
        self.position
    }

    /// Move the socket. Called by the owning node during layout.
    pub(crate) fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    /// Socket width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Socket height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Set the socket width. Non-positive values are ignored.
    pub fn set_width(&mut self, width: f32) {
        if width > 0.0 {
            self.width = width;
        } else {
            tracing::warn!(width, "ignoring non-positive socket width");
        }
    }

    /// Set the socket height. Non-positive values are ignored.
    pub fn set_height(&mut self, height: f32) {
        if height > 0.0 {
            self.height = height;
        } else {
            tracing::warn!(height, "ignoring non-positive socket height");
        }
    }

    /// Axis-aligned bounds of the socket.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position, Vec2::new(self.width, self.height))
    }

    /// Centre of the socket, where edges attach.
    pub fn centre(&self) -> Pos2 {
        self.bounds().center()
    }

    /// True iff the point lies within the socket's bounds.
    pub fn hit_test(&self, point: Pos2) -> bool {
        self.bounds().contains(point)
    }

    /// Incident edge ids, in attachment order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Number of incident edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Append an edge reference. One half of the connect protocol.
    pub(crate) fn push_edge(&mut self, edge: EdgeId) {
        self.edges.push(edge);
    }

    /// Remove a single edge reference, preserving the order of the rest.
    /// No scene-side effects; the other half of the disconnect protocol.
    /// Returns false when the reference is not held.
    pub(crate) fn drop_edge(&mut self, edge: EdgeId) -> bool {
        match self.edges.iter().position(|&id| id == edge) {
            Some(index) => {
                self.edges.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_respects_bounds() {
        let mut socket = Socket::new(SocketDirection::Inbound);
        socket.set_position(Pos2::new(20.0, 30.0));
        assert!(socket.hit_test(Pos2::new(25.0, 35.0)));
        assert!(socket.hit_test(Pos2::new(20.0, 30.0)));
        assert!(!socket.hit_test(Pos2::new(19.0, 35.0)));
        assert!(!socket.hit_test(Pos2::new(25.0, 41.0)));
    }

    #[test]
    fn test_centre() {
        let mut socket = Socket::new(SocketDirection::Outbound);
        socket.set_position(Pos2::new(10.0, 10.0));
        assert_eq!(socket.centre(), Pos2::new(15.0, 15.0));
    }

    #[test]
    fn test_set_width_rejects_non_positive() {
        let mut socket = Socket::new(SocketDirection::Inbound);
        socket.set_width(0.0);
        assert_eq!(socket.width(), SOCKET_SIZE);
        socket.set_width(-3.0);
        assert_eq!(socket.width(), SOCKET_SIZE);
        socket.set_width(14.0);
        assert_eq!(socket.width(), 14.0);
    }

    #[test]
    fn test_drop_edge_preserves_order() {
        let mut socket = Socket::new(SocketDirection::Inbound);
        let (a, b, c) = (EdgeId::new(), EdgeId::new(), EdgeId::new());
        socket.push_edge(a);
        socket.push_edge(b);
        socket.push_edge(c);

        assert!(socket.drop_edge(b));
        assert_eq!(socket.edges(), &[a, c]);
        assert!(!socket.drop_edge(b));
        assert_eq!(socket.edges(), &[a, c]);
    }
}
