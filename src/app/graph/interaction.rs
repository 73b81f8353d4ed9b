use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use crate::explorer::NodeId;

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;
use super::NodeShape;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.scene.pan, self.scene.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.scene.cancel_view_goal();
        self.scene.zoom = (self.scene.zoom * zoom_factor).clamp(0.05, 6.0);
        self.scene.pan = pointer - rect.center() - (world_before * self.scene.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.drag_view(response.drag_delta());
        }
    }

    /// Manual pan; any camera fit still easing in is abandoned.
    pub(in crate::app) fn drag_view(&mut self, delta: Vec2) {
        self.scene.cancel_view_goal();
        self.scene.pan += delta;
    }

    /// Topmost visible node under `pointer`. Items are drawn last, so they
    /// win over the category they hang from.
    pub(in crate::app) fn node_at(&self, rect: Rect, pointer: Pos2) -> Option<NodeId> {
        let zoom = self.scene.zoom;
        let world = self.scene.screen_to_world(pointer);
        if !rect.contains(pointer) {
            return None;
        }

        self.scene
            .nodes()
            .iter()
            .rev()
            .filter(|node| !node.layout.hidden)
            .find(|node| NodeShape::of(&node.layout).contains(node.layout.position, world, zoom))
            .map(|node| node.layout.id.clone())
    }

    /// Turns a primary click on the canvas into an engine click event.
    pub(in crate::app) fn handle_graph_click(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }
        let pointer = ui.input(|input| input.pointer.interact_pos());
        self.click_canvas(rect, pointer);
    }

    /// Reports a canvas click to the engine unless it landed on an open
    /// card, which handles its own input.
    pub(in crate::app) fn click_canvas(&mut self, rect: Rect, pointer: Option<Pos2>) {
        if pointer.is_some_and(|pointer| self.card_at(pointer).is_some()) {
            return;
        }
        let target = pointer.and_then(|pointer| self.node_at(rect, pointer));
        self.scene.push_click(target);
    }
}
