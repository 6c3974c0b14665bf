// SPDX-License-Identifier: MIT OR Apache-2.0
//! Directed connectors between an outbound and an inbound socket.

use crate::node::NodeId;
use crate::socket::SocketId;
use egui::Pos2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Arrow head size applied to new edges.
pub const DEFAULT_ARROW_SIZE: f32 = 7.5;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    /// Create a new random edge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

/// One end of an edge: a socket on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketRef {
    /// Owning node.
    pub node: NodeId,
    /// Socket on that node.
    pub socket: SocketId,
}

/// A committed edge between two sockets.
///
/// The source is always the outbound-role endpoint and the destination the
/// inbound-role endpoint. Endpoint points are a cache of the socket centres
/// and are refreshed whenever either node moves; they are never
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Outbound-role endpoint.
    pub source: SocketRef,
    /// Inbound-role endpoint.
    pub destination: SocketRef,
    source_point: Pos2,
    destination_point: Pos2,
    arrow_size: f32,
}

impl Edge {
    /// Create a new edge between the given endpoints.
    pub(crate) fn new(
        source: SocketRef,
        destination: SocketRef,
        source_point: Pos2,
        destination_point: Pos2,
    ) -> Self {
        Self {
            id: EdgeId::new(),
            source,
            destination,
            source_point,
            destination_point,
            arrow_size: DEFAULT_ARROW_SIZE,
        }
    }

    /// Cached position of the outbound endpoint.
    pub fn source_point(&self) -> Pos2 {
        self.source_point
    }

    /// Cached position of the inbound endpoint.
    pub fn destination_point(&self) -> Pos2 {
        self.destination_point
    }

    /// Recompute the cached endpoint points from the socket centres.
    pub(crate) fn refresh(&mut self, source_centre: Pos2, destination_centre: Pos2) {
        self.source_point = source_centre;
        self.destination_point = destination_centre;
    }

    /// Arrow head size used when rendering this edge.
    pub fn arrow_size(&self) -> f32 {
        self.arrow_size
    }

    /// Set the arrow head size. Negative values are rejected and reset the
    /// size to [`DEFAULT_ARROW_SIZE`].
    pub fn set_arrow_size(&mut self, size: f32) {
        if size >= 0.0 {
            self.arrow_size = size;
        } else {
            tracing::warn!(size, "negative arrow size, resetting to default");
            self.arrow_size = DEFAULT_ARROW_SIZE;
        }
    }

    /// Check if this edge attaches to a specific node
    pub fn involves_node(&self, node: NodeId) -> bool {
        self.source.node == node || self.destination.node == node
    }

    /// Check if this edge attaches to a specific socket
    pub fn involves_socket(&self, socket: SocketId) -> bool {
        self.source.socket == socket || self.destination.socket == socket
    }

    /// The endpoint opposite the given node, if the node is an endpoint.
    pub fn opposite(&self, node: NodeId) -> Option<SocketRef> {
        if self.source.node == node {
            Some(self.destination)
        } else if self.destination.node == node {
            Some(self.source)
        } else {
            None
        }
    }
}
