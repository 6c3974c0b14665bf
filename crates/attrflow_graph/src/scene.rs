// SPDX-License-Identifier: MIT OR Apache-2.0
//! The scene: owner of all nodes and edges, and the only mutation path
//! that touches both halves of an edge.
//!
//! Collection order matters. Nodes iterate in insertion order (depth
//! tie-breaking and export both depend on it), so node removal compacts
//! with `shift_remove`. The edge registry carries no ordering semantics.

use crate::edge::{Edge, EdgeId, SocketRef};
use crate::node::{MeasureText, Node, NodeId, END_NODE_WIDTH, OBJECT_BASE_WIDTH};
use crate::socket::SocketDirection;
use crate::types::{NodeKind, ValueKind};
use egui::Pos2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error from a scene mutation
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Node not found
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Socket not found on the referenced node
    #[error("socket not found: {0:?}")]
    SocketNotFound(SocketRef),

    /// Edge not found
    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeId),

    /// Connection endpoints must be one outbound and one inbound socket
    #[error("source socket must be outbound and destination inbound")]
    DirectionMismatch,

    /// The symmetric edge-reference invariant is broken. Not recoverable.
    #[error("edge bookkeeping out of sync: {0}")]
    Inconsistency(&'static str),
}

/// A node graph scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    end_node: Option<NodeId>,
    selected: Option<NodeId>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and register it. The node is live as soon as this
    /// returns; there is no separate init step.
    pub fn create_node(
        &mut self,
        value_kind: ValueKind,
        node_kind: NodeKind,
        position: Pos2,
        inbound_sockets: usize,
        outbound_sockets: usize,
        editable: bool,
        deletable: bool,
    ) -> NodeId {
        let mut node = Node::new(value_kind, node_kind, position);
        node.editable = editable;
        node.deletable = deletable;
        if value_kind == ValueKind::Object {
            // Object kind names run long, give them room before layout.
            node.set_base_width(OBJECT_BASE_WIDTH);
            node.set_width(OBJECT_BASE_WIDTH);
        }
        for _ in 0..inbound_sockets {
            node.add_socket(SocketDirection::Inbound);
        }
        for _ in 0..outbound_sockets {
            node.add_socket(SocketDirection::Outbound);
        }
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Create an object node: no inputs, one output.
    pub fn create_object_node(&mut self, kind: NodeKind, position: Pos2) -> NodeId {
        self.create_node(ValueKind::Object, kind, position, 0, 1, true, true)
    }

    /// Create an argument node: no inputs, one output.
    pub fn create_argument_node(&mut self, kind: NodeKind, position: Pos2) -> NodeId {
        self.create_node(ValueKind::Argument, kind, position, 0, 1, true, true)
    }

    /// Create a member node. Members carry no sockets; they contribute to
    /// the export by presence alone.
    pub fn create_member_node(&mut self, kind: NodeKind, position: Pos2) -> NodeId {
        self.create_node(ValueKind::Member, kind, position, 0, 0, true, true)
    }

    /// Create the end terminal: one input, no outputs, neither editable nor
    /// deletable. A scene holds at most one; returns `None` when a terminal
    /// already exists.
    pub fn create_end_node(&mut self, title: impl Into<String>, position: Pos2) -> Option<NodeId> {
        if self.end_node.is_some() {
            tracing::debug!("scene already has an end terminal");
            return None;
        }
        let id = self.create_node(
            ValueKind::End,
            NodeKind::EndNode,
            position,
            1,
            0,
            false,
            false,
        );
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_title(title);
            node.set_end_node(true);
            node.set_width(END_NODE_WIDTH);
        }
        self.end_node = Some(id);
        Some(id)
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node IDs, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of nodes in the scene.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get an edge by ID
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Get a mutable edge by ID
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// All edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Number of edges in the scene.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The end terminal, if one has been created.
    pub fn end_node(&self) -> Option<NodeId> {
        self.end_node
    }

    /// True iff an end terminal is present.
    pub fn has_end_node(&self) -> bool {
        self.end_node.is_some()
    }

    /// The currently selected node, if any.
    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected
    }

    /// Clear the current selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Connect an outbound socket to an inbound socket.
    ///
    /// Exactly one [`Edge`] is created; both endpoint sockets record its id,
    /// and the edge is registered with the scene's render surface.
    pub fn connect(
        &mut self,
        source: SocketRef,
        destination: SocketRef,
    ) -> Result<EdgeId, SceneError> {
        let source_centre = self.endpoint(source, SocketDirection::Outbound)?;
        let destination_centre = self.endpoint(destination, SocketDirection::Inbound)?;

        let edge = Edge::new(source, destination, source_centre, destination_centre);
        let id = edge.id;
        self.edges.insert(id, edge);
        self.push_edge_ref(source, id);
        self.push_edge_ref(destination, id);
        Ok(id)
    }

    /// Remove an edge, detaching it from both endpoint sockets.
    ///
    /// An unknown id is [`SceneError::EdgeNotFound`] and mutates nothing.
    /// A reference missing from either endpoint socket is a broken
    /// invariant and surfaces as [`SceneError::Inconsistency`].
    pub fn disconnect(&mut self, edge: EdgeId) -> Result<(), SceneError> {
        let (source, destination) = match self.edges.get(&edge) {
            Some(found) => (found.source, found.destination),
            None => return Err(SceneError::EdgeNotFound(edge)),
        };

        let source_dropped = self.drop_edge_ref(source, edge);
        let destination_dropped = self.drop_edge_ref(destination, edge);
        if !source_dropped || !destination_dropped {
            return Err(SceneError::Inconsistency(
                "edge reference missing from an endpoint socket",
            ));
        }

        self.edges.swap_remove(&edge);
        Ok(())
    }

    /// Disconnect every edge on a socket, walking the edge list from the
    /// back so each removal leaves the remaining prefix untouched.
    pub fn disconnect_all(&mut self, socket: SocketRef) -> Result<(), SceneError> {
        let edges = {
            let node = self
                .nodes
                .get(&socket.node)
                .ok_or(SceneError::NodeNotFound(socket.node))?;
            let socket = node
                .socket(socket.socket)
                .ok_or(SceneError::SocketNotFound(socket))?;
            socket.edges().to_vec()
        };
        for edge in edges.into_iter().rev() {
            self.disconnect(edge)?;
        }
        Ok(())
    }

    /// Remove a node, cascading over all of its sockets' edges first so no
    /// edge reference survives anywhere. Returns false when the node is
    /// unknown or not deletable, leaving the scene untouched.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if !node.deletable {
            return false;
        }

        let sockets: Vec<SocketRef> = node
            .sockets(SocketDirection::Inbound)
            .iter()
            .chain(node.sockets(SocketDirection::Outbound).iter())
            .map(|socket| SocketRef {
                node: id,
                socket: socket.id,
            })
            .collect();

        if self.selected == Some(id) {
            self.selected = None;
        }

        for socket in sockets {
            if let Err(error) = self.disconnect_all(socket) {
                tracing::error!(%error, node = ?id, "edge cascade failed while removing node");
                debug_assert!(false, "edge cascade failed: {error}");
            }
        }

        if self.end_node == Some(id) {
            self.end_node = None;
        }

        self.nodes.shift_remove(&id);
        true
    }

    /// Remove every deletable node, walking the collection from the back to
    /// keep earlier indices stable across each compaction.
    pub fn remove_all_nodes(&mut self) {
        let ids: Vec<NodeId> = self.nodes.keys().rev().copied().collect();
        for id in ids {
            self.remove_node(id);
        }
    }

    /// Hit-test every node against a point and update the selection.
    ///
    /// No hit clears the selection and returns false. A single hit selects
    /// that node. Overlapping hits select the strictly greatest depth
    /// value; since the scan uses `>` against a baseline of zero, nodes
    /// that were never raised (depth -1) tie to the first one encountered
    /// in insertion order.
    pub fn node_at_point(&mut self, point: Pos2) -> bool {
        let mut found: Vec<NodeId> = Vec::new();
        for (id, node) in &mut self.nodes {
            if node.hit_test(point) {
                found.push(*id);
            }
        }

        match found.len() {
            0 => {
                self.selected = None;
                false
            }
            1 => {
                self.selected = Some(found[0]);
                true
            }
            _ => {
                let mut top = found[0];
                let mut top_depth = 0;
                for id in &found {
                    let depth = self.nodes[id].depth();
                    if depth > top_depth {
                        top_depth = depth;
                        top = *id;
                    }
                }
                self.selected = Some(top);
                true
            }
        }
    }

    /// First socket of the given direction under the point, scanning nodes
    /// in insertion order.
    pub fn socket_at_point(&self, point: Pos2, direction: SocketDirection) -> Option<SocketRef> {
        for (id, node) in &self.nodes {
            if let Some(socket) = node.socket_at_point(point, direction) {
                return Some(SocketRef {
                    node: *id,
                    socket,
                });
            }
        }
        None
    }

    /// Move a node and refresh the geometry of its incident edges.
    pub fn set_node_position(&mut self, id: NodeId, position: Pos2) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.set_position(position);
        self.refresh_edges(id);
        true
    }

    /// Rename a node, re-widening it against the supplied text metrics.
    pub fn set_node_name(&mut self, id: NodeId, name: &str, metrics: &dyn MeasureText) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.set_name(name, metrics);
        self.refresh_edges(id);
        true
    }

    /// Set a node's short name.
    pub fn set_node_short_name(&mut self, id: NodeId, short_name: &str) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_short_name(short_name);
                true
            }
            None => false,
        }
    }

    /// Raise a node above every other node for overlap disambiguation.
    pub fn raise_node(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        let top = self
            .nodes
            .values()
            .map(Node::depth)
            .max()
            .unwrap_or(-1);
        if let Some(node) = self.nodes.get_mut(&id) {
            // Hit-test tie-breaking compares depths against a baseline of
            // zero, so a raised node must land at 1 or above.
            node.set_depth(top.max(0) + 1);
        }
        true
    }

    /// Recompute the cached endpoints of every edge incident to a node.
    pub fn refresh_edges(&mut self, node: NodeId) {
        let updates: Vec<(EdgeId, Pos2, Pos2)> = self
            .edges
            .values()
            .filter(|edge| edge.involves_node(node))
            .filter_map(|edge| {
                let source = self.socket_centre(edge.source)?;
                let destination = self.socket_centre(edge.destination)?;
                Some((edge.id, source, destination))
            })
            .collect();
        for (id, source, destination) in updates {
            if let Some(edge) = self.edges.get_mut(&id) {
                edge.refresh(source, destination);
            }
        }
    }

    fn socket_centre(&self, socket: SocketRef) -> Option<Pos2> {
        self.nodes
            .get(&socket.node)?
            .socket(socket.socket)
            .map(|found| found.centre())
    }

    fn endpoint(
        &self,
        socket: SocketRef,
        expected: SocketDirection,
    ) -> Result<Pos2, SceneError> {
        let node = self
            .nodes
            .get(&socket.node)
            .ok_or(SceneError::NodeNotFound(socket.node))?;
        let found = node
            .socket(socket.socket)
            .ok_or(SceneError::SocketNotFound(socket))?;
        if found.direction != expected {
            return Err(SceneError::DirectionMismatch);
        }
        Ok(found.centre())
    }

    fn push_edge_ref(&mut self, socket: SocketRef, edge: EdgeId) {
        if let Some(found) = self
            .nodes
            .get_mut(&socket.node)
            .and_then(|node| node.socket_mut(socket.socket))
        {
            found.push_edge(edge);
        }
    }

    fn drop_edge_ref(&mut self, socket: SocketRef, edge: EdgeId) -> bool {
        self.nodes
            .get_mut(&socket.node)
            .and_then(|node| node.socket_mut(socket.socket))
            .map(|found| found.drop_edge(edge))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn socket_ref(scene: &Scene, node: NodeId, direction: SocketDirection) -> SocketRef {
        let socket = scene.node(node).unwrap().sockets(direction)[0].id;
        SocketRef { node, socket }
    }

    fn source_and_sink(scene: &mut Scene) -> (SocketRef, SocketRef) {
        let argument = scene.create_argument_node(NodeKind::Float, Pos2::new(0.0, 0.0));
        let terminal = scene
            .create_end_node("Result", Pos2::new(0.0, 300.0))
            .unwrap();
        (
            socket_ref(scene, argument, SocketDirection::Outbound),
            socket_ref(scene, terminal, SocketDirection::Inbound),
        )
    }

    #[test]
    fn test_connect_shares_one_edge_between_both_sockets() {
        let mut scene = Scene::new();
        let (source, sink) = source_and_sink(&mut scene);

        let edge = scene.connect(source, sink).unwrap();
        assert_eq!(scene.edge_count(), 1);
        let source_edges = scene.node(source.node).unwrap().sockets(SocketDirection::Outbound)[0]
            .edges()
            .to_vec();
        let sink_edges = scene.node(sink.node).unwrap().sockets(SocketDirection::Inbound)[0]
            .edges()
            .to_vec();
        assert_eq!(source_edges, vec![edge]);
        assert_eq!(sink_edges, vec![edge]);
    }

    #[test]
    fn test_connect_rejects_same_direction() {
        let mut scene = Scene::new();
        let a = scene.create_argument_node(NodeKind::Float, Pos2::ZERO);
        let b = scene.create_argument_node(NodeKind::Double, Pos2::ZERO);
        let a_out = socket_ref(&scene, a, SocketDirection::Outbound);
        let b_out = socket_ref(&scene, b, SocketDirection::Outbound);

        assert!(matches!(
            scene.connect(a_out, b_out),
            Err(SceneError::DirectionMismatch)
        ));
        assert_eq!(scene.edge_count(), 0);
    }

    #[test]
    fn test_connect_then_disconnect_round_trips() {
        let mut scene = Scene::new();
        let (source, sink) = source_and_sink(&mut scene);

        let edge = scene.connect(source, sink).unwrap();
        scene.disconnect(edge).unwrap();

        assert_eq!(scene.edge_count(), 0);
        assert!(scene.node(source.node).unwrap().sockets(SocketDirection::Outbound)[0]
            .edges()
            .is_empty());
        assert!(scene.node(sink.node).unwrap().sockets(SocketDirection::Inbound)[0]
            .edges()
            .is_empty());
    }

    #[test]
    fn test_disconnect_unknown_edge_mutates_nothing() {
        let mut scene = Scene::new();
        let (source, sink) = source_and_sink(&mut scene);
        scene.connect(source, sink).unwrap();

        let bogus = EdgeId::new();
        assert!(matches!(
            scene.disconnect(bogus),
            Err(SceneError::EdgeNotFound(_))
        ));
        assert_eq!(scene.edge_count(), 1);
        assert_eq!(
            scene.node(source.node).unwrap().sockets(SocketDirection::Outbound)[0].edge_count(),
            1
        );
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut scene = Scene::new();
        let terminal = scene.create_end_node("Result", Pos2::ZERO).unwrap();
        let sink = socket_ref(&scene, terminal, SocketDirection::Inbound);

        // Three arguments wired into the terminal.
        let mut sources = Vec::new();
        for kind in [NodeKind::Float, NodeKind::Double, NodeKind::Integer] {
            let id = scene.create_argument_node(kind, Pos2::ZERO);
            let source = socket_ref(&scene, id, SocketDirection::Outbound);
            scene.connect(source, sink).unwrap();
            sources.push(id);
        }
        assert_eq!(scene.edge_count(), 3);

        // Removing one source takes exactly its edge with it.
        assert!(scene.remove_node(sources[1]));
        assert_eq!(scene.edge_count(), 2);
        let sink_edges = scene.node(terminal).unwrap().sockets(SocketDirection::Inbound)[0]
            .edges()
            .to_vec();
        assert_eq!(sink_edges.len(), 2);
        for edge in sink_edges {
            assert!(scene.edge(edge).is_some());
        }
    }

    #[test]
    fn test_remove_node_respects_deletable_flag() {
        let mut scene = Scene::new();
        let a = scene.create_argument_node(NodeKind::Float, Pos2::ZERO);
        let locked = scene.create_node(
            ValueKind::Argument,
            NodeKind::Double,
            Pos2::ZERO,
            0,
            1,
            true,
            false,
        );
        let b = scene.create_argument_node(NodeKind::Integer, Pos2::ZERO);

        assert!(!scene.remove_node(locked));
        assert_eq!(scene.node_count(), 3);
        let order: Vec<NodeId> = scene.node_ids().collect();
        assert_eq!(order, vec![a, locked, b]);
    }

    #[test]
    fn test_remove_preserves_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.create_argument_node(NodeKind::Float, Pos2::ZERO);
        let b = scene.create_argument_node(NodeKind::Double, Pos2::ZERO);
        let c = scene.create_argument_node(NodeKind::Integer, Pos2::ZERO);

        assert!(scene.remove_node(b));
        let order: Vec<NodeId> = scene.node_ids().collect();
        assert_eq!(order, vec![a, c]);
    }

    #[test]
    fn test_remove_all_nodes_spares_the_end_terminal() {
        let mut scene = Scene::new();
        scene.create_argument_node(NodeKind::Float, Pos2::ZERO);
        scene.create_member_node(NodeKind::Double, Pos2::ZERO);
        let terminal = scene.create_end_node("Result", Pos2::ZERO).unwrap();

        scene.remove_all_nodes();
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.node_ids().next(), Some(terminal));
    }

    #[test]
    fn test_end_node_is_unique() {
        let mut scene = Scene::new();
        let first = scene.create_end_node("Result", Pos2::ZERO);
        assert!(first.is_some());
        assert!(scene.create_end_node("Another", Pos2::ZERO).is_none());
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.end_node(), first);
    }

    #[test]
    fn test_end_node_shape() {
        let mut scene = Scene::new();
        let id = scene.create_end_node("Result", Pos2::ZERO).unwrap();
        let node = scene.node(id).unwrap();
        assert!(node.is_end_node());
        assert!(!node.editable);
        assert!(!node.deletable);
        assert_eq!(node.title(), "Result");
        assert_eq!(node.width(), END_NODE_WIDTH);
        assert_eq!(node.sockets(SocketDirection::Inbound).len(), 1);
        assert!(node.sockets(SocketDirection::Outbound).is_empty());
    }

    #[test]
    fn test_hit_test_selects_and_clears() {
        let mut scene = Scene::new();
        let id = scene.create_argument_node(NodeKind::Float, Pos2::new(100.0, 100.0));

        assert!(scene.node_at_point(Pos2::new(110.0, 110.0)));
        assert_eq!(scene.selected_node(), Some(id));

        assert!(!scene.node_at_point(Pos2::new(1000.0, 1000.0)));
        assert_eq!(scene.selected_node(), None);
    }

    #[test]
    fn test_overlap_resolves_by_depth() {
        let mut scene = Scene::new();
        let _below = scene.create_argument_node(NodeKind::Float, Pos2::ZERO);
        let above = scene.create_argument_node(NodeKind::Double, Pos2::new(20.0, 20.0));
        scene.raise_node(above);

        assert!(scene.node_at_point(Pos2::new(30.0, 30.0)));
        assert_eq!(scene.selected_node(), Some(above));

        // With neither raised, first-inserted wins the tie.
        let mut scene = Scene::new();
        let first = scene.create_argument_node(NodeKind::Float, Pos2::ZERO);
        let _second = scene.create_argument_node(NodeKind::Double, Pos2::new(20.0, 20.0));
        assert!(scene.node_at_point(Pos2::new(30.0, 30.0)));
        assert_eq!(scene.selected_node(), Some(first));
    }

    #[test]
    fn test_moving_a_node_refreshes_edge_geometry() {
        let mut scene = Scene::new();
        let (source, sink) = source_and_sink(&mut scene);
        let edge = scene.connect(source, sink).unwrap();

        let before = scene.edge(edge).unwrap().source_point();
        assert!(scene.set_node_position(source.node, Pos2::new(500.0, 500.0)));
        let after = scene.edge(edge).unwrap().source_point();
        assert_ne!(before, after);

        let expected = scene
            .node(source.node)
            .unwrap()
            .sockets(SocketDirection::Outbound)[0]
            .centre();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_socket_at_point_scans_nodes_in_order() {
        let mut scene = Scene::new();
        let id = scene.create_argument_node(NodeKind::Float, Pos2::new(0.0, 0.0));
        let centre = scene.node(id).unwrap().sockets(SocketDirection::Outbound)[0].centre();

        let found = scene.socket_at_point(centre, SocketDirection::Outbound);
        assert_eq!(
            found,
            Some(socket_ref(&scene, id, SocketDirection::Outbound))
        );
        assert_eq!(scene.socket_at_point(centre, SocketDirection::Inbound), None);
    }
}
