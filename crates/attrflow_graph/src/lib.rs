// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph core for the `AttrFlow` attribute editor.
//!
//! This crate provides the scene model behind the visual attribute editor:
//! - Typed nodes owning directional sockets
//! - Scene-mediated edge lifecycle with symmetric bookkeeping
//! - Hit-testing with depth disambiguation
//! - Export of a scene into the flattened attribute description
//! - An egui rendering and input layer
//!
//! ## Architecture
//!
//! All graph mutation flows through [`Scene`]; nodes and sockets never
//! reach across to other nodes on their own. The UI reduces raw input to
//! the closed [`interaction::InputCommand`] set, so the core is fully
//! exercisable headless.

pub mod types;
pub mod socket;
pub mod edge;
pub mod node;
pub mod scene;
pub mod export;
pub mod interaction;
pub mod inspector;
pub mod ui;

pub use edge::{Edge, EdgeId, SocketRef};
pub use export::ExportError;
pub use node::{MeasureText, Node, NodeId};
pub use scene::{Scene, SceneError};
pub use socket::{Socket, SocketDirection, SocketId};
pub use types::{NodeKind, ValueKind};
