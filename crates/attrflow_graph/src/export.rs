// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serialization of a scene into the flattened attribute description.
//!
//! The description is consumed by a line-oriented generator that splits on
//! `;`. Sentinels mark where the payload begins and ends so the consumer can
//! tell an empty description from a missing one, and the duplicate scan
//! guarantees it never merges two distinct contributions under one key.

use crate::node::Node;
use crate::scene::Scene;
use crate::socket::{Socket, SocketDirection};
use crate::types::ValueKind;

/// Token wrapped around the payload at both ends.
pub const SENTINEL: &str = "#_#;";

/// Token separating one contribution from the next.
pub const SEPARATOR: &str = "--;";

/// Error from [`Scene::export`]. Any failure means nothing was produced;
/// there is no partial output.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExportError {
    /// The scene has no end terminal to root the walk.
    #[error("scene has no end terminal")]
    NoEndNode,

    /// A contributing node is missing its name, short name or kind name.
    #[error("a connected node is missing a name or short name")]
    IncompleteNode,

    /// Two contributions are byte-identical; the description would be
    /// ambiguous to the consumer.
    #[error("duplicate contribution")]
    DuplicateContribution,

    /// The edge registry disagrees with the socket bookkeeping.
    #[error("edge bookkeeping out of sync")]
    Inconsistent,
}

impl Scene {
    /// Flatten the scene into the attribute description string.
    ///
    /// Member nodes contribute by presence, in collection order; everything
    /// else contributes through its connection to the end terminal's
    /// inbound sockets. `"#_#;#_#;"` is the valid empty description.
    pub fn export(&self) -> Result<String, ExportError> {
        if !self.has_end_node() {
            return Err(ExportError::NoEndNode);
        }

        // First end-flagged node in collection order roots the walk.
        let terminal = self
            .nodes()
            .find(|node| node.is_end_node())
            .ok_or(ExportError::NoEndNode)?;

        let mut tokens: Vec<String> = Vec::new();
        for node in self.nodes() {
            if node.value_kind == ValueKind::Member {
                tokens.push(node.export_summary());
            }
        }
        for socket in terminal.sockets(SocketDirection::Inbound) {
            self.collect_peer_summaries(terminal, socket, &mut tokens)?;
        }

        if contains_duplicate(&tokens) {
            return Err(ExportError::DuplicateContribution);
        }

        let mut description = String::from(SENTINEL);
        for token in &tokens {
            description.push_str(token);
        }
        description.push_str(SENTINEL);
        Ok(description)
    }

    /// Record the peer node of every edge on `socket`, five `;`-terminated
    /// fields per edge. All-or-nothing: a peer with any empty field fails
    /// the whole collection and nothing is appended.
    fn collect_peer_summaries(
        &self,
        owner: &Node,
        socket: &Socket,
        out: &mut Vec<String>,
    ) -> Result<(), ExportError> {
        let mut gathered: Vec<String> = Vec::new();
        for &edge in socket.edges() {
            let edge = self.edge(edge).ok_or(ExportError::Inconsistent)?;
            let peer = edge
                .opposite(owner.id)
                .and_then(|endpoint| self.node(endpoint.node))
                .ok_or(ExportError::Inconsistent)?;
            if peer.node_kind.name().is_empty()
                || peer.name().is_empty()
                || peer.short_name().is_empty()
            {
                return Err(ExportError::IncompleteNode);
            }
            gathered.push(format!("{};", peer.value_kind.name()));
            gathered.push(format!("{};", peer.node_kind.name()));
            gathered.push(format!("{};", peer.name()));
            gathered.push(format!("{};", peer.short_name()));
            gathered.push(SEPARATOR.to_owned());
        }
        out.extend(gathered);
        Ok(())
    }
}

/// Pairwise duplicate scan over the gathered tokens.
///
/// A separator advances the cursor two places on both scans, skipping the
/// separator and the value-kind field that always follows one; a token is
/// never compared with itself. Two genuinely distinct nodes whose compared
/// fields coincide are still rejected.
fn contains_duplicate(tokens: &[String]) -> bool {
    let mut outer = 0;
    while outer < tokens.len() {
        if tokens[outer] == SEPARATOR {
            outer += 2;
            continue;
        }
        let mut inner = 0;
        while inner < tokens.len() {
            if inner == outer {
                inner += 1;
                continue;
            }
            if tokens[inner] == SEPARATOR {
                inner += 2;
                continue;
            }
            if tokens[inner] == tokens[outer] {
                return true;
            }
            inner += 1;
        }
        outer += 1;
    }
    false
}
