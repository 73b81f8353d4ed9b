use eframe::egui::{self, Align2, Color32, CornerRadius, FontId, Rect, Sense, Stroke, Ui};

use crate::explorer::{GraphEngine, NodeId};

use super::super::ViewModel;
use super::super::render_utils::{
    ANCHOR_COLOR, CATEGORY_COLOR, EDGE_COLOR, HOVER_COLOR, ITEM_COLOR, blend_color, box_visible,
    draw_background, world_to_screen,
};
use super::NodeShape;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.scene.set_viewport(rect);
        let painter = ui.painter_at(rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        self.handle_graph_click(ui, rect, &response);

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let physics_moving = self.scene.step(frame_delta_seconds);
        self.explorer.handle_engine_events(&mut self.scene);
        let camera_moving = self.scene.update_camera();
        self.explorer.tick(&self.scene, ui.ctx());

        if physics_moving || camera_moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        draw_background(&painter, rect, self.scene.pan, self.scene.zoom);

        self.hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| self.card_at(*pointer).is_none())
            .and_then(|pointer| self.node_at(rect, pointer));
        if self.hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        self.draw_edges(&painter, rect);
        self.draw_nodes(&painter, rect);
    }

    fn draw_edges(&self, painter: &egui::Painter, rect: Rect) {
        let (pan, zoom) = (self.scene.pan, self.scene.zoom);
        let stroke = Stroke::new((1.2 * zoom.sqrt()).clamp(0.6, 3.0), EDGE_COLOR);

        for (from, to) in self.scene.edges() {
            let (Some(start), Some(end)) = (self.scene.node(from), self.scene.node(to)) else {
                continue;
            };
            if start.hidden || end.hidden {
                continue;
            }
            painter.line_segment(
                [
                    world_to_screen(rect, pan, zoom, start.position),
                    world_to_screen(rect, pan, zoom, end.position),
                ],
                stroke,
            );
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, rect: Rect) {
        let (pan, zoom) = (self.scene.pan, self.scene.zoom);
        let expanded = self.explorer.expanded();
        let label_font = FontId::proportional((13.0 * zoom.sqrt()).clamp(9.0, 18.0));

        for node in self.scene.nodes() {
            let layout = &node.layout;
            if layout.hidden {
                continue;
            }

            let shape = NodeShape::of(layout);
            let center = world_to_screen(rect, pan, zoom, layout.position);
            let half = shape.half_extent(zoom) * zoom;
            if !box_visible(rect, center, half) {
                continue;
            }

            let hovered = self.hovered.as_ref() == Some(&layout.id);
            let base = match &layout.id {
                NodeId::Anchor => ANCHOR_COLOR,
                NodeId::Category(title) if expanded == Some(title.as_str()) => {
                    blend_color(CATEGORY_COLOR, ANCHOR_COLOR, 0.45)
                }
                NodeId::Category(_) => CATEGORY_COLOR,
                NodeId::Item(_) => ITEM_COLOR,
            };
            let color = if hovered { HOVER_COLOR } else { base };
            let outline = Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190));

            match shape {
                NodeShape::Circle { .. } => {
                    painter.circle_filled(center, half.x, color);
                    painter.circle_stroke(center, half.x, outline);
                }
                NodeShape::Box { .. } => {
                    let node_rect = Rect::from_center_size(center, half * 2.0);
                    let rounding = CornerRadius::same((6.0 * zoom).clamp(2.0, 10.0) as u8);
                    painter.rect_filled(node_rect, rounding, color);
                    painter.rect_stroke(node_rect, rounding, outline, egui::StrokeKind::Inside);
                    painter.text(
                        center,
                        Align2::CENTER_CENTER,
                        &layout.label,
                        label_font.clone(),
                        Color32::from_gray(245),
                    );
                }
            }

            if matches!(layout.id, NodeId::Item(_)) && (hovered || zoom > 0.8) {
                painter.text(
                    center + egui::vec2(half.x + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &layout.label,
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }
    }
}
