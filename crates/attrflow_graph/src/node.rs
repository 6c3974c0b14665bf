// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed graph vertices owning their sockets.

use crate::socket::{Socket, SocketDirection, SocketId};
use crate::types::{NodeKind, ValueKind};
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default node width.
pub const BASE_WIDTH: f32 = 160.0;

/// Default node height.
pub const BASE_HEIGHT: f32 = 80.0;

/// Base width applied to object-kind nodes; their kind names run longer.
pub const OBJECT_BASE_WIDTH: f32 = 200.0;

/// Width applied to the end terminal so it stands out.
pub const END_NODE_WIDTH: f32 = 250.0;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which socket directions a node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketPolicy {
    /// Only inbound sockets may be added.
    InboundOnly,
    /// Only outbound sockets may be added.
    OutboundOnly,
    /// Both directions are accepted.
    Both,
}

impl SocketPolicy {
    /// True iff the policy permits sockets of the given direction.
    pub fn permits(self, direction: SocketDirection) -> bool {
        match self {
            SocketPolicy::InboundOnly => direction == SocketDirection::Inbound,
            SocketPolicy::OutboundOnly => direction == SocketDirection::Outbound,
            SocketPolicy::Both => true,
        }
    }
}

/// Text measurement supplied by the rendering layer.
///
/// The core only needs the rendered width of a name to keep nodes wide
/// enough to display it; how the text is actually shaped is the UI's
/// business.
pub trait MeasureText {
    /// Rendered width of `text`, in scene units.
    fn text_width(&self, text: &str) -> f32;
}

/// Fixed-advance fallback metrics for headless use and tests.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMetrics {
    /// Assumed advance per character.
    pub char_width: f32,
}

impl Default for ApproxTextMetrics {
    fn default() -> Self {
        Self { char_width: 7.0 }
    }
}

impl MeasureText for ApproxTextMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// A node in the graph.
///
/// Sockets are owned exclusively by their node; their lifetime cannot
/// exceed the node's. Everything that needs the other half of an edge goes
/// through the [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Role this node plays in the export.
    pub value_kind: ValueKind,
    /// Concrete kind of this node.
    pub node_kind: NodeKind,
    /// Whether the inspector may rename this node.
    pub editable: bool,
    /// Whether [`Scene::remove_node`](crate::scene::Scene::remove_node) may
    /// delete this node.
    pub deletable: bool,
    name: String,
    short_name: String,
    title: String,
    position: Pos2,
    width: f32,
    height: f32,
    base_width: f32,
    base_height: f32,
    end_node: bool,
    depth: i32,
    cursor_offset: Vec2,
    policy: SocketPolicy,
    inbound: Vec<Socket>,
    outbound: Vec<Socket>,
}

impl Node {
    /// Create a new node. Only the scene factory calls this; a node is not
    /// usable until it has been registered with a scene.
    pub(crate) fn new(value_kind: ValueKind, node_kind: NodeKind, position: Pos2) -> Self {
        let title = match node_kind {
            NodeKind::EndNode => String::new(),
            kind => kind.name().to_owned(),
        };
        Self {
            id: NodeId::new(),
            value_kind,
            node_kind,
            editable: true,
            deletable: true,
            name: String::new(),
            short_name: String::new(),
            title,
            position,
            width: BASE_WIDTH,
            height: BASE_HEIGHT,
            base_width: BASE_WIDTH,
            base_height: BASE_HEIGHT,
            end_node: false,
            depth: -1,
            cursor_offset: Vec2::ZERO,
            policy: SocketPolicy::Both,
            inbound: Vec::new(),
            outbound: Vec::new(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abbreviated display name.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Title text. The kind name, except on the end terminal where it is
    /// whatever the scene set it to.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Top-left corner of the node.
    pub fn position(&self) -> Pos2 {
        self.position
    }

    /// Node width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Node height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Axis-aligned bounds of the node.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position, Vec2::new(self.width, self.height))
    }

    /// Centre of the node's bounds.
    pub fn centre(&self) -> Pos2 {
        self.bounds().center()
    }

    /// True iff this node is the end terminal of its scene.
    pub fn is_end_node(&self) -> bool {
        self.end_node
    }

    pub(crate) fn set_end_node(&mut self, end_node: bool) {
        self.end_node = end_node;
    }

    /// Overlap disambiguation value. Defaults to -1, meaning the node has
    /// never been raised above another.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Set the overlap disambiguation value.
    pub fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }

    /// Socket direction policy for this node.
    pub fn socket_policy(&self) -> SocketPolicy {
        self.policy
    }

    pub(crate) fn set_socket_policy(&mut self, policy: SocketPolicy) {
        self.policy = policy;
    }

    /// Offset from the node's top-left corner to the last hit-tested point.
    /// Zero when that point was outside the node.
    pub fn cursor_offset(&self) -> Vec2 {
        self.cursor_offset
    }

    /// Add a socket of the given direction, if the node's policy permits it,
    /// and re-lay out that direction's sockets. Returns the new socket's id.
    pub fn add_socket(&mut self, direction: SocketDirection) -> Option<SocketId> {
        if !self.policy.permits(direction) {
            tracing::debug!(?direction, node = ?self.id, "socket direction not permitted");
            return None;
        }
        let socket = Socket::new(direction);
        let id = socket.id;
        match direction {
            SocketDirection::Inbound => self.inbound.push(socket),
            SocketDirection::Outbound => self.outbound.push(socket),
        }
        self.layout_sockets(direction);
        Some(id)
    }

    /// Sockets of one direction, in the order they were added.
    pub fn sockets(&self, direction: SocketDirection) -> &[Socket] {
        match direction {
            SocketDirection::Inbound => &self.inbound,
            SocketDirection::Outbound => &self.outbound,
        }
    }

    /// Look up a socket by id.
    pub fn socket(&self, id: SocketId) -> Option<&Socket> {
        self.inbound
            .iter()
            .chain(self.outbound.iter())
            .find(|socket| socket.id == id)
    }

    pub(crate) fn socket_mut(&mut self, id: SocketId) -> Option<&mut Socket> {
        self.inbound
            .iter_mut()
            .chain(self.outbound.iter_mut())
            .find(|socket| socket.id == id)
    }

    /// First socket of the given direction containing the point, scanning
    /// in insertion order.
    pub fn socket_at_point(&self, point: Pos2, direction: SocketDirection) -> Option<SocketId> {
        self.sockets(direction)
            .iter()
            .find(|socket| socket.hit_test(point))
            .map(|socket| socket.id)
    }

    /// Move the node and re-lay out its sockets.
    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
        self.layout_all_sockets();
    }

    /// Set the node width. Non-positive values are ignored, keeping the
    /// previous width. Socket layout is recomputed on success.
    pub fn set_width(&mut self, width: f32) {
        if width > 0.0 {
            self.width = width;
            self.layout_all_sockets();
        } else {
            tracing::warn!(width, node = ?self.id, "ignoring non-positive node width");
        }
    }

    /// Set the node height. Non-positive values are ignored, keeping the
    /// previous height. Socket layout is recomputed on success.
    pub fn set_height(&mut self, height: f32) {
        if height > 0.0 {
            self.height = height;
            self.layout_all_sockets();
        } else {
            tracing::warn!(height, node = ?self.id, "ignoring non-positive node height");
        }
    }

    pub(crate) fn set_base_width(&mut self, width: f32) {
        self.base_width = width;
    }

    /// Rename the node, widening it when the rendered name would clip.
    ///
    /// The node grows to `text width + 25` once the name reaches within 20
    /// units of the base width, and snaps back to the base width when it no
    /// longer does.
    pub fn set_name(&mut self, name: impl Into<String>, metrics: &dyn MeasureText) {
        self.name = name.into();
        let text_width = metrics.text_width(&self.name);
        if text_width >= self.base_width - 20.0 {
            self.set_width(text_width + 25.0);
        } else {
            self.set_width(self.base_width);
        }
    }

    /// Set the abbreviated display name.
    pub fn set_short_name(&mut self, short_name: impl Into<String>) {
        self.short_name = short_name.into();
    }

    /// Set the title text. Only meaningful on the end terminal; ignored for
    /// every other kind, whose title is its kind name.
    pub fn set_title(&mut self, title: impl Into<String>) {
        if self.node_kind == NodeKind::EndNode {
            self.title = title.into();
        }
    }

    /// Bounds containment test. Records the offset from the node's top-left
    /// corner to the point for drag interactions; the offset is zeroed when
    /// the point is outside.
    pub fn hit_test(&mut self, point: Pos2) -> bool {
        self.cursor_offset = Vec2::ZERO;
        let inside = self.bounds().contains(point);
        if inside {
            self.cursor_offset = self.position - point;
        }
        inside
    }

    /// The node's own 5-field export record:
    /// `"{value};{kind};{name};{short};--;"`.
    pub fn export_summary(&self) -> String {
        format!(
            "{};{};{};{};--;",
            self.value_kind.name(),
            self.node_kind.name(),
            self.name,
            self.short_name,
        )
    }

    fn layout_all_sockets(&mut self) {
        self.layout_sockets(SocketDirection::Inbound);
        self.layout_sockets(SocketDirection::Outbound);
    }

    /// Spread one direction's sockets evenly: N sockets split the width into
    /// N + 1 segments, inbound sockets sit flush above the top edge and
    /// outbound sockets flush below the bottom edge.
    fn layout_sockets(&mut self, direction: SocketDirection) {
        let left = self.position.x;
        let y = match direction {
            SocketDirection::Inbound => self.position.y,
            SocketDirection::Outbound => self.position.y + self.height,
        };
        let sockets = match direction {
            SocketDirection::Inbound => &mut self.inbound,
            SocketDirection::Outbound => &mut self.outbound,
        };
        let delta = self.width / (sockets.len() as f32 + 1.0);
        for (i, socket) in sockets.iter_mut().enumerate() {
            let x = left - socket.width() * 0.5 + (i as f32 + 1.0) * delta;
            let y = match direction {
                SocketDirection::Inbound => y - socket.height(),
                SocketDirection::Outbound => y,
            };
            socket.set_position(Pos2::new(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f32, y: f32) -> Node {
        Node::new(ValueKind::Argument, NodeKind::Float, Pos2::new(x, y))
    }

    #[test]
    fn test_socket_layout_formula() {
        let mut node = node_at(100.0, 50.0);
        for _ in 0..3 {
            node.add_socket(SocketDirection::Inbound);
        }

        let width = node.width();
        let delta = width / 4.0;
        for (i, socket) in node.sockets(SocketDirection::Inbound).iter().enumerate() {
            let expected_x = 100.0 - socket.width() * 0.5 + (i as f32 + 1.0) * delta;
            assert!((socket.position().x - expected_x).abs() < 1e-4);
            // Flush above the top edge.
            assert_eq!(socket.position().y, 50.0 - socket.height());
        }
    }

    #[test]
    fn test_outbound_sockets_sit_below_bottom_edge() {
        let mut node = node_at(0.0, 0.0);
        node.add_socket(SocketDirection::Outbound);
        let socket = &node.sockets(SocketDirection::Outbound)[0];
        assert_eq!(socket.position().y, node.height());
        assert!((socket.centre().x - node.width() / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_layout_recomputed_on_resize_and_move() {
        let mut node = node_at(0.0, 0.0);
        node.add_socket(SocketDirection::Outbound);
        node.set_width(320.0);
        let socket = &node.sockets(SocketDirection::Outbound)[0];
        assert!((socket.centre().x - 160.0).abs() < 1e-4);

        node.set_position(Pos2::new(50.0, 10.0));
        let socket = &node.sockets(SocketDirection::Outbound)[0];
        assert!((socket.centre().x - 210.0).abs() < 1e-4);
        assert_eq!(socket.position().y, 10.0 + node.height());
    }

    #[test]
    fn test_socket_policy_blocks_addition() {
        let mut node = node_at(0.0, 0.0);
        node.set_socket_policy(SocketPolicy::InboundOnly);
        assert!(node.add_socket(SocketDirection::Outbound).is_none());
        assert!(node.add_socket(SocketDirection::Inbound).is_some());
        assert!(node.sockets(SocketDirection::Outbound).is_empty());
        assert_eq!(node.sockets(SocketDirection::Inbound).len(), 1);
    }

    #[test]
    fn test_set_dimensions_reject_non_positive() {
        let mut node = node_at(0.0, 0.0);
        node.set_width(0.0);
        node.set_height(-5.0);
        assert_eq!(node.width(), BASE_WIDTH);
        assert_eq!(node.height(), BASE_HEIGHT);
    }

    #[test]
    fn test_set_name_widens_and_resets() {
        let metrics = ApproxTextMetrics { char_width: 10.0 };
        let mut node = node_at(0.0, 0.0);

        // 15 chars * 10 = 150 >= 160 - 20, so the node widens.
        node.set_name("a_long_nodename", &metrics);
        assert_eq!(node.width(), 175.0);

        // Short names snap back to the base width.
        node.set_name("tiny", &metrics);
        assert_eq!(node.width(), BASE_WIDTH);
    }

    #[test]
    fn test_hit_test_records_cursor_offset() {
        let mut node = node_at(100.0, 100.0);
        assert!(node.hit_test(Pos2::new(110.0, 130.0)));
        assert_eq!(node.cursor_offset(), Vec2::new(-10.0, -30.0));

        assert!(!node.hit_test(Pos2::new(0.0, 0.0)));
        assert_eq!(node.cursor_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_socket_at_point_scans_in_order() {
        let mut node = node_at(0.0, 0.0);
        node.add_socket(SocketDirection::Inbound);
        node.add_socket(SocketDirection::Inbound);
        let first = node.sockets(SocketDirection::Inbound)[0].id;
        let centre = node.sockets(SocketDirection::Inbound)[0].centre();
        assert_eq!(node.socket_at_point(centre, SocketDirection::Inbound), Some(first));
        assert_eq!(node.socket_at_point(centre, SocketDirection::Outbound), None);
    }

    #[test]
    fn test_export_summary_format() {
        let mut node = node_at(0.0, 0.0);
        node.set_name("Speed", &ApproxTextMetrics::default());
        node.set_short_name("S");
        assert_eq!(node.export_summary(), "ARGUMENT;Float;Speed;S;--;");
    }

    #[test]
    fn test_title_only_settable_on_end_node() {
        let mut node = node_at(0.0, 0.0);
        assert_eq!(node.title(), "Float");
        node.set_title("Result");
        assert_eq!(node.title(), "Float");

        let mut terminal = Node::new(ValueKind::End, NodeKind::EndNode, Pos2::ZERO);
        assert_eq!(terminal.title(), "");
        terminal.set_title("Result");
        assert_eq!(terminal.title(), "Result");
    }
}
