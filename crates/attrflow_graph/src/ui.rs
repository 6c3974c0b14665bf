// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene rendering and input translation.
//!
//! Features:
//! - Node rendering coloured by value kind
//! - Socket and edge rendering with arrow heads
//! - Edge drag-to-create
//! - Node dragging with the secondary button
//! - Context menu for node creation
//! - Inspector window for renaming

use crate::interaction::{Interaction, InteractionState, InputCommand};
use crate::inspector::NodeInspector;
use crate::node::MeasureText;
use crate::scene::Scene;
use crate::socket::SocketDirection;
use crate::types::{NodeKind, ValueKind};
use egui::{Color32, FontId, Pos2, Stroke, Vec2};
use std::f32::consts::{PI, TAU};

const NODE_ROUNDING: f32 = 6.0;
const EDGE_THICKNESS: f32 = 1.5;

const OBJECT_FILL: Color32 = Color32::from_rgb(255, 230, 120);
const ARGUMENT_FILL: Color32 = Color32::from_rgb(210, 210, 210);
const MEMBER_FILL: Color32 = Color32::from_rgb(140, 220, 230);
const END_FILL: Color32 = Color32::from_rgb(140, 220, 140);
const SELECTION_STROKE: Color32 = Color32::from_rgb(255, 160, 40);

/// Text insets from the node's top-left corner, one row per label.
const TITLE_OFFSET: Vec2 = Vec2::new(15.0, 10.0);
const NAME_OFFSET: Vec2 = Vec2::new(15.0, 30.0);
const SHORT_NAME_OFFSET: Vec2 = Vec2::new(15.0, 50.0);

fn fill_colour(kind: ValueKind) -> Color32 {
    match kind {
        ValueKind::Object => OBJECT_FILL,
        ValueKind::Argument => ARGUMENT_FILL,
        ValueKind::Member => MEMBER_FILL,
        ValueKind::End => END_FILL,
    }
}

/// [`MeasureText`] backed by the egui font atlas.
pub struct EguiTextMetrics {
    ctx: egui::Context,
    font: FontId,
}

impl EguiTextMetrics {
    /// Measure with the given font.
    pub fn new(ctx: egui::Context, font: FontId) -> Self {
        Self { ctx, font }
    }
}

impl MeasureText for EguiTextMetrics {
    fn text_width(&self, text: &str) -> f32 {
        self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(text.to_owned(), self.font.clone(), Color32::WHITE)
                .size()
                .x
        })
    }
}

/// Widget state for one scene view.
pub struct SceneEditor {
    interaction: Interaction,
    inspector: NodeInspector,
    show_inspector: bool,
    label_font: FontId,
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneEditor {
    /// Create a new editor with nothing in flight.
    pub fn new() -> Self {
        Self {
            interaction: Interaction::default(),
            inspector: NodeInspector::new(),
            show_inspector: false,
            label_font: FontId::proportional(13.0),
        }
    }

    /// Render the scene and feed this frame's input through the command
    /// stream.
    pub fn ui(&mut self, ui: &mut egui::Ui, scene: &mut Scene) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let metrics = EguiTextMetrics::new(ui.ctx().clone(), self.label_font.clone());
        let pointer = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.hover_pos()))
            .unwrap_or(Pos2::ZERO);

        self.handle_input(ui, &response, scene, pointer, &metrics);

        self.draw_edges(&painter, scene);
        self.draw_drag_edge(&painter, scene);
        self.draw_nodes(&painter, scene);

        self.context_menu(&response, scene, pointer);
        self.inspector_window(ui, scene, &metrics);
    }

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        scene: &mut Scene,
        pointer: Pos2,
        metrics: &dyn MeasureText,
    ) {
        let mut commands: Vec<InputCommand> = Vec::new();

        if response.clicked() || response.drag_started_by(egui::PointerButton::Primary) {
            commands.push(InputCommand::Select(pointer));
        }
        if response.drag_started_by(egui::PointerButton::Secondary) {
            commands.push(InputCommand::DragStart(pointer));
        }
        if response.dragged() {
            commands.push(InputCommand::DragMove(pointer));
        }
        if response.drag_stopped() {
            commands.push(InputCommand::DragEnd(pointer));
        }
        if ui.input(|i| i.key_pressed(egui::Key::Delete)) {
            commands.push(InputCommand::RequestDelete);
        }

        for command in commands {
            self.interaction.handle(scene, command, metrics);
        }

        if response.double_clicked() {
            self.interaction
                .handle(scene, InputCommand::Select(pointer), metrics);
            if let Some(id) = scene.selected_node() {
                self.inspector.bind(scene, id);
                self.show_inspector = self.inspector.target().is_some();
            }
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, scene: &Scene) {
        let selected = scene.selected_node();
        for node in scene.nodes() {
            let bounds = node.bounds();
            painter.rect_filled(
                bounds,
                NODE_ROUNDING,
                fill_colour(node.value_kind),
            );
            let stroke = if selected == Some(node.id) {
                Stroke::new(2.0, SELECTION_STROKE)
            } else {
                Stroke::new(1.0, Color32::BLACK)
            };
            painter.rect_stroke(bounds, NODE_ROUNDING, stroke);

            let corner = bounds.min;
            for (text, offset) in [
                (node.title(), TITLE_OFFSET),
                (node.name(), NAME_OFFSET),
                (node.short_name(), SHORT_NAME_OFFSET),
            ] {
                if !text.is_empty() {
                    painter.text(
                        corner + offset,
                        egui::Align2::LEFT_TOP,
                        text,
                        self.label_font.clone(),
                        Color32::BLACK,
                    );
                }
            }

            for direction in [SocketDirection::Inbound, SocketDirection::Outbound] {
                for socket in node.sockets(direction) {
                    let [r, g, b] = socket.colour;
                    painter.rect_filled(socket.bounds(), 0.0, Color32::from_rgb(r, g, b));
                    painter.rect_stroke(
                        socket.bounds(),
                        0.0,
                        Stroke::new(1.0, Color32::BLACK),
                    );
                }
            }
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, scene: &Scene) {
        for edge in scene.edges() {
            let source = edge.source_point();
            let destination = edge.destination_point();
            painter.line_segment(
                [source, destination],
                Stroke::new(EDGE_THICKNESS, Color32::BLACK),
            );
            let midpoint = source + (destination - source) * 0.5;
            draw_arrow_head(painter, source, midpoint, edge.arrow_size());
            draw_arrow_head(painter, source, destination, edge.arrow_size());
        }
    }

    fn draw_drag_edge(&self, painter: &egui::Painter, scene: &Scene) {
        if let InteractionState::DrawingEdge(drag) = self.interaction.state() {
            let anchor = scene
                .node(drag.source.node)
                .and_then(|node| node.socket(drag.source.socket))
                .map(|socket| socket.centre());
            if let Some(anchor) = anchor {
                painter.line_segment(
                    [anchor, drag.cursor],
                    Stroke::new(EDGE_THICKNESS, Color32::BLACK),
                );
                painter.circle_filled(drag.cursor, 3.0, Color32::BLACK);
            }
        }
    }

    fn context_menu(&mut self, response: &egui::Response, scene: &mut Scene, pointer: Pos2) {
        response.context_menu(|ui| {
            ui.menu_button("Objects", |ui| {
                for kind in NodeKind::object_kinds() {
                    if ui.button(kind.name()).clicked() {
                        scene.create_object_node(*kind, pointer);
                        ui.close_menu();
                    }
                }
            });
            ui.menu_button("Arguments", |ui| {
                for kind in NodeKind::argument_kinds() {
                    if ui.button(kind.name()).clicked() {
                        scene.create_argument_node(*kind, pointer);
                        ui.close_menu();
                    }
                }
            });
            ui.menu_button("Members", |ui| {
                for kind in NodeKind::member_kinds() {
                    if ui.button(kind.name()).clicked() {
                        scene.create_member_node(*kind, pointer);
                        ui.close_menu();
                    }
                }
            });
            ui.separator();
            if !scene.has_end_node() && ui.button("End Node").clicked() {
                scene.create_end_node("Result", pointer);
                ui.close_menu();
            }
            if scene.selected_node().is_some() && ui.button("Delete Selected").clicked() {
                if let Some(id) = scene.selected_node() {
                    scene.remove_node(id);
                }
                ui.close_menu();
            }
        });
    }

    fn inspector_window(&mut self, ui: &mut egui::Ui, scene: &mut Scene, metrics: &dyn MeasureText) {
        if !self.show_inspector || self.inspector.target().is_none() {
            return;
        }
        let mut open = true;
        let mut applied = false;
        egui::Window::new("Edit Node")
            .open(&mut open)
            .resizable(false)
            .show(ui.ctx(), |ui| {
                egui::Grid::new("node_inspector").num_columns(2).show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut self.inspector.name);
                    ui.end_row();
                    ui.label("Short name");
                    ui.text_edit_singleline(&mut self.inspector.short_name);
                    ui.end_row();
                });
                if ui.button("Apply").clicked() {
                    applied = true;
                }
            });
        if applied {
            self.inspector.apply(scene, metrics);
            self.show_inspector = false;
        }
        if !open {
            self.inspector.unbind();
            self.show_inspector = false;
        }
    }
}

/// Paint a two-stroke arrow head whose tip sits at `tip`, pointing along
/// the segment from `from`.
fn draw_arrow_head(painter: &egui::Painter, from: Pos2, tip: Pos2, size: f32) {
    let delta = tip - from;
    let length = delta.length();
    if length <= f32::EPSILON || size <= 0.0 {
        return;
    }
    let mut angle = (delta.x / length).acos();
    if delta.y >= 0.0 {
        angle = TAU - angle;
    }
    let left = tip
        + Vec2::new(
            (angle + PI / 3.0).sin() * size,
            (angle + PI / 3.0).cos() * size,
        );
    let right = tip
        + Vec2::new(
            (angle + PI - PI / 3.0).sin() * size,
            (angle + PI - PI / 3.0).cos() * size,
        );
    let stroke = Stroke::new(EDGE_THICKNESS, Color32::BLACK);
    painter.line_segment([tip, left], stroke);
    painter.line_segment([tip, right], stroke);
}
