// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edit buffer for renaming a node.
//!
//! The inspector holds its own copies of the name fields while the user
//! types; nothing reaches the scene until [`NodeInspector::apply`].

use crate::node::{MeasureText, NodeId};
use crate::scene::Scene;

/// Rename form bound to one node at a time.
#[derive(Debug, Clone, Default)]
pub struct NodeInspector {
    target: Option<NodeId>,
    /// Name field, edited in place by the UI.
    pub name: String,
    /// Short name field, edited in place by the UI.
    pub short_name: String,
}

impl NodeInspector {
    /// Create an unbound inspector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node whose names the form currently holds.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Bind the form to a node, seeding the fields from its current names.
    /// Non-editable and unknown nodes unbind the form instead.
    pub fn bind(&mut self, scene: &Scene, id: NodeId) {
        match scene.node(id) {
            Some(node) if node.editable => {
                self.target = Some(id);
                self.name = node.name().to_owned();
                self.short_name = node.short_name().to_owned();
            }
            _ => self.unbind(),
        }
    }

    /// Drop the binding and clear the fields.
    pub fn unbind(&mut self) {
        self.target = None;
        self.name.clear();
        self.short_name.clear();
    }

    /// Write the edited names back to the bound node.
    ///
    /// An empty short name is filled in from the first character of the
    /// name before the write. Returns false when nothing was written, which
    /// happens if the binding is stale or was never made.
    pub fn apply(&mut self, scene: &mut Scene, metrics: &dyn MeasureText) -> bool {
        let Some(id) = self.target else {
            return false;
        };
        if self.short_name.is_empty() {
            if let Some(initial) = self.name.chars().next() {
                self.short_name.push(initial);
            }
        }
        let renamed = scene.set_node_name(id, &self.name, metrics);
        if !renamed {
            tracing::debug!(node = ?id, "inspector binding is stale");
            self.unbind();
            return false;
        }
        scene.set_node_short_name(id, &self.short_name);
        true
    }
}
