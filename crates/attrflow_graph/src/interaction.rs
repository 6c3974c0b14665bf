// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input command handling and the edge-drawing state machine.
//!
//! The editor core never sees raw pointer or keyboard events; the UI layer
//! reduces them to the closed [`InputCommand`] set and feeds them in here.
//! Everything runs to completion on the caller's thread, one command at a
//! time.

use crate::edge::SocketRef;
use crate::node::{MeasureText, Node, NodeId};
use crate::scene::Scene;
use crate::socket::SocketDirection;
use crate::types::{NodeKind, ValueKind};
use egui::Pos2;

/// A user request, already decoded from whatever input framework hosts the
/// editor.
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    /// Primary press: begin drawing an edge when over an outbound socket,
    /// otherwise update the selection from the nodes under the point.
    Select(Pos2),
    /// Secondary press: begin dragging the node under the point.
    DragStart(Pos2),
    /// Pointer moved while a button is held.
    DragMove(Pos2),
    /// Button released.
    DragEnd(Pos2),
    /// Directly connect two sockets, bypassing the drag gesture.
    RequestConnect {
        /// Outbound-role endpoint.
        source: SocketRef,
        /// Inbound-role endpoint.
        destination: SocketRef,
    },
    /// Create a node of the given kinds at a position.
    RequestCreate {
        /// Role the new node plays in the export.
        value_kind: ValueKind,
        /// Concrete node kind.
        node_kind: NodeKind,
        /// Where to place it.
        position: Pos2,
    },
    /// Create the end terminal, if none exists yet.
    RequestEndNode {
        /// Title shown on the terminal.
        title: String,
        /// Where to place it.
        position: Pos2,
    },
    /// Rename the selected node.
    RequestRename {
        /// New display name, if changing.
        name: Option<String>,
        /// New short name, if changing.
        short_name: Option<String>,
    },
    /// Delete the selected node, subject to its deletable flag.
    RequestDelete,
}

/// A provisional edge being dragged out from an outbound socket.
///
/// Its free endpoint is the cursor, standing in for a socket that does not
/// exist yet; the pair belongs to the interaction state, never to a node,
/// and is invisible to export.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDrag {
    /// The committed outbound endpoint.
    pub source: SocketRef,
    /// Current position of the free endpoint.
    pub cursor: Pos2,
    /// Inbound socket currently under the cursor, if any.
    pub target: Option<SocketRef>,
}

/// Current interaction mode
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A node follows the pointer.
    DraggingNode(NodeId),
    /// A provisional edge follows the pointer.
    DrawingEdge(EdgeDrag),
}

/// Drives a [`Scene`] from the command stream.
#[derive(Debug, Default)]
pub struct Interaction {
    state: InteractionState,
}

impl Interaction {
    /// Create a new idle interaction handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, for rendering the provisional edge and drag feedback.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Apply one command to the scene.
    pub fn handle(&mut self, scene: &mut Scene, command: InputCommand, metrics: &dyn MeasureText) {
        match command {
            InputCommand::Select(point) => {
                if let Some(source) = scene.socket_at_point(point, SocketDirection::Outbound) {
                    self.state = InteractionState::DrawingEdge(EdgeDrag {
                        source,
                        cursor: point,
                        target: None,
                    });
                } else {
                    scene.node_at_point(point);
                }
            }
            InputCommand::DragStart(point) => {
                if scene.node_at_point(point) {
                    if let Some(id) = scene.selected_node() {
                        self.state = InteractionState::DraggingNode(id);
                    }
                }
            }
            InputCommand::DragMove(point) => match &mut self.state {
                InteractionState::Idle => {}
                InteractionState::DraggingNode(id) => {
                    let id = *id;
                    // The recorded grab offset keeps the node from jumping
                    // to the pointer.
                    let offset = scene
                        .node(id)
                        .map(Node::cursor_offset)
                        .unwrap_or_default();
                    scene.set_node_position(id, point + offset);
                }
                InteractionState::DrawingEdge(drag) => {
                    drag.cursor = point;
                    drag.target = scene.socket_at_point(point, SocketDirection::Inbound);
                }
            },
            InputCommand::DragEnd(point) => {
                match std::mem::take(&mut self.state) {
                    InteractionState::Idle | InteractionState::DraggingNode(_) => {}
                    InteractionState::DrawingEdge(drag) => {
                        // Commit only when released over a live inbound
                        // socket; anywhere else the provisional edge is
                        // discarded.
                        if let Some(target) =
                            scene.socket_at_point(point, SocketDirection::Inbound)
                        {
                            if let Err(error) = scene.connect(drag.source, target) {
                                tracing::warn!(%error, "discarding invalid connection");
                            }
                        }
                    }
                }
            }
            InputCommand::RequestConnect {
                source,
                destination,
            } => {
                if let Err(error) = scene.connect(source, destination) {
                    tracing::warn!(%error, "connect request rejected");
                }
            }
            InputCommand::RequestCreate {
                value_kind,
                node_kind,
                position,
            } => {
                match value_kind {
                    ValueKind::Object => {
                        scene.create_object_node(node_kind, position);
                    }
                    ValueKind::Argument => {
                        scene.create_argument_node(node_kind, position);
                    }
                    ValueKind::Member => {
                        scene.create_member_node(node_kind, position);
                    }
                    ValueKind::End => {
                        tracing::warn!("end terminals are created via RequestEndNode");
                    }
                };
            }
            InputCommand::RequestEndNode { title, position } => {
                scene.create_end_node(title, position);
            }
            InputCommand::RequestRename { name, short_name } => {
                let Some(id) = scene.selected_node() else {
                    return;
                };
                let editable = scene.node(id).map(|node| node.editable).unwrap_or(false);
                if !editable {
                    tracing::debug!(node = ?id, "rename requested on non-editable node");
                    return;
                }
                if let Some(name) = name {
                    scene.set_node_name(id, &name, metrics);
                }
                if let Some(short_name) = short_name {
                    scene.set_node_short_name(id, &short_name);
                }
            }
            InputCommand::RequestDelete => {
                if let Some(id) = scene.selected_node() {
                    if !scene.remove_node(id) {
                        tracing::debug!(node = ?id, "selected node is not deletable");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ApproxTextMetrics;

    const METRICS: ApproxTextMetrics = ApproxTextMetrics { char_width: 7.0 };

    fn scene_with_wireable_pair() -> (Scene, Pos2, Pos2) {
        let mut scene = Scene::new();
        let argument = scene.create_argument_node(NodeKind::Float, Pos2::new(0.0, 0.0));
        let terminal = scene
            .create_end_node("Result", Pos2::new(0.0, 300.0))
            .unwrap();
        let out_centre = scene
            .node(argument)
            .unwrap()
            .sockets(SocketDirection::Outbound)[0]
            .centre();
        let in_centre = scene
            .node(terminal)
            .unwrap()
            .sockets(SocketDirection::Inbound)[0]
            .centre();
        (scene, out_centre, in_centre)
    }

    #[test]
    fn test_edge_drag_commits_over_inbound_socket() {
        let (mut scene, out_centre, in_centre) = scene_with_wireable_pair();
        let mut interaction = Interaction::new();

        interaction.handle(&mut scene, InputCommand::Select(out_centre), &METRICS);
        assert!(matches!(
            interaction.state(),
            InteractionState::DrawingEdge(_)
        ));

        interaction.handle(&mut scene, InputCommand::DragMove(in_centre), &METRICS);
        if let InteractionState::DrawingEdge(drag) = interaction.state() {
            assert!(drag.target.is_some());
            assert_eq!(drag.cursor, in_centre);
        } else {
            panic!("expected an edge drag in flight");
        }

        interaction.handle(&mut scene, InputCommand::DragEnd(in_centre), &METRICS);
        assert_eq!(*interaction.state(), InteractionState::Idle);
        assert_eq!(scene.edge_count(), 1);
    }

    #[test]
    fn test_edge_drag_discards_elsewhere() {
        let (mut scene, out_centre, _) = scene_with_wireable_pair();
        let mut interaction = Interaction::new();

        interaction.handle(&mut scene, InputCommand::Select(out_centre), &METRICS);
        interaction.handle(
            &mut scene,
            InputCommand::DragEnd(Pos2::new(-500.0, -500.0)),
            &METRICS,
        );
        assert_eq!(*interaction.state(), InteractionState::Idle);
        assert_eq!(scene.edge_count(), 0);
    }

    #[test]
    fn test_select_updates_selection_away_from_sockets() {
        let (mut scene, _, _) = scene_with_wireable_pair();
        let mut interaction = Interaction::new();

        interaction.handle(&mut scene, InputCommand::Select(Pos2::new(10.0, 10.0)), &METRICS);
        assert!(scene.selected_node().is_some());
        assert_eq!(*interaction.state(), InteractionState::Idle);

        interaction.handle(
            &mut scene,
            InputCommand::Select(Pos2::new(-900.0, -900.0)),
            &METRICS,
        );
        assert_eq!(scene.selected_node(), None);
    }

    #[test]
    fn test_node_drag_applies_grab_offset() {
        let (mut scene, _, _) = scene_with_wireable_pair();
        let mut interaction = Interaction::new();

        // Grab 10 units into the node, then move; the corner stays 10
        // behind the pointer.
        interaction.handle(&mut scene, InputCommand::DragStart(Pos2::new(10.0, 10.0)), &METRICS);
        let id = scene.selected_node().unwrap();
        interaction.handle(&mut scene, InputCommand::DragMove(Pos2::new(60.0, 60.0)), &METRICS);
        assert_eq!(scene.node(id).unwrap().position(), Pos2::new(50.0, 50.0));

        interaction.handle(&mut scene, InputCommand::DragEnd(Pos2::new(60.0, 60.0)), &METRICS);
        assert_eq!(*interaction.state(), InteractionState::Idle);
    }

    #[test]
    fn test_delete_respects_deletable_flag() {
        let (mut scene, _, _) = scene_with_wireable_pair();
        let mut interaction = Interaction::new();
        let terminal = scene.end_node().unwrap();

        // Select the terminal and try to delete it.
        let centre = scene.node(terminal).unwrap().centre();
        interaction.handle(&mut scene, InputCommand::Select(centre), &METRICS);
        assert_eq!(scene.selected_node(), Some(terminal));
        interaction.handle(&mut scene, InputCommand::RequestDelete, &METRICS);
        assert_eq!(scene.node_count(), 2);

        // An ordinary node goes away.
        interaction.handle(&mut scene, InputCommand::Select(Pos2::new(10.0, 10.0)), &METRICS);
        interaction.handle(&mut scene, InputCommand::RequestDelete, &METRICS);
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn test_create_and_rename_requests() {
        let mut scene = Scene::new();
        let mut interaction = Interaction::new();

        interaction.handle(
            &mut scene,
            InputCommand::RequestCreate {
                value_kind: ValueKind::Member,
                node_kind: NodeKind::Vector,
                position: Pos2::new(40.0, 40.0),
            },
            &METRICS,
        );
        assert_eq!(scene.node_count(), 1);

        interaction.handle(&mut scene, InputCommand::Select(Pos2::new(50.0, 50.0)), &METRICS);
        interaction.handle(
            &mut scene,
            InputCommand::RequestRename {
                name: Some("Offset".to_owned()),
                short_name: Some("Of".to_owned()),
            },
            &METRICS,
        );
        let node = scene.nodes().next().unwrap();
        assert_eq!(node.name(), "Offset");
        assert_eq!(node.short_name(), "Of");
    }
}
