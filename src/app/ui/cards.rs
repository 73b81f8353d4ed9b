use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, pos2, vec2,
};
use tracing::info;

use crate::explorer::{Overlay, OverlayPlacement};
use crate::layout::GridSpec;
use crate::util::format_count;

use super::super::ViewModel;

const CARD_PADDING: f32 = 14.0;

/// Screen rect of a card hanging top-centred from its projected anchor.
pub(in crate::app) fn card_rect(placement: OverlayPlacement, grid: &GridSpec) -> Rect {
    let size = vec2(grid.card_width, grid.card_height) * placement.scale;
    Rect::from_min_size(
        pos2(placement.screen.x - size.x / 2.0, placement.screen.y),
        size,
    )
}

impl ViewModel {
    /// Topmost open card under `pointer`.
    pub(in crate::app) fn card_at(&self, pointer: Pos2) -> Option<&Overlay> {
        let grid = self.explorer.config().grid;
        self.explorer.overlays().iter().rev().find(|overlay| {
            overlay
                .placement
                .is_some_and(|placement| card_rect(placement, &grid).contains(pointer))
        })
    }

    /// Paints one card per open overlay, top-centred under its node and
    /// scaled with the view. Cards claim their own input: dragging one pans
    /// the view, clicking one opens the project.
    pub(in crate::app) fn draw_cards(&mut self, ui: &mut Ui) {
        let clip = ui.max_rect();
        let painter = ui.painter_at(clip);
        let grid = self.explorer.config().grid;
        let mut pan_delta = Vec2::ZERO;
        let mut open_url = None;

        for overlay in self.explorer.overlays() {
            let Some(placement) = overlay.placement else {
                continue;
            };
            let Some(item) = self.explorer.item(overlay.item_index) else {
                continue;
            };

            let scale = placement.scale;
            let card = card_rect(placement, &grid);
            if !clip.intersects(card) {
                continue;
            }

            let response = ui.interact(
                card.intersect(clip),
                egui::Id::new(("card", overlay.item_id.as_str())),
                Sense::click_and_drag(),
            );
            if response.dragged_by(egui::PointerButton::Primary) {
                pan_delta += response.drag_delta();
            } else if response.clicked_by(egui::PointerButton::Primary) {
                open_url = Some(item.project_url());
            }
            if response.hovered() {
                ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
            }

            let border = if response.hovered() {
                Color32::from_rgb(255, 164, 101)
            } else {
                Color32::from_rgb(103, 196, 255)
            };
            painter.rect(
                card,
                CornerRadius::same((10.0 * scale).clamp(2.0, 16.0) as u8),
                Color32::from_rgba_unmultiplied(30, 36, 46, 235),
                Stroke::new(1.0, border),
                egui::StrokeKind::Inside,
            );

            let padding = CARD_PADDING * scale;
            let wrap_width = (card.width() - padding * 2.0).max(1.0);
            let title = painter.layout(
                item.display_title().to_owned(),
                FontId::proportional((18.0 * scale).max(4.0)),
                Color32::from_gray(245),
                wrap_width,
            );
            let title_height = title.size().y;
            painter.galley(card.min + vec2(padding, padding), title, Color32::WHITE);

            let footer_font = FontId::proportional((12.0 * scale).max(3.0));
            let site = item.site_label();
            let footer_lines = if site.is_some() { 2.0 } else { 1.0 };
            let body = painter.layout(
                item.description_text().to_owned(),
                FontId::proportional((13.0 * scale).max(3.0)),
                Color32::from_gray(200),
                wrap_width,
            );
            let body_top = card.min + vec2(padding, padding * 1.5 + title_height);
            let body_bottom = card.max - vec2(padding, padding * (2.0 + footer_lines));
            painter
                .with_clip_rect(Rect::from_min_max(body_top, body_bottom).intersect(clip))
                .galley(body_top, body, Color32::WHITE);

            let mut footer = pos2(card.min.x + padding, card.max.y - padding);
            if let Some(site) = site {
                painter.text(
                    footer,
                    Align2::LEFT_BOTTOM,
                    site,
                    footer_font.clone(),
                    Color32::from_gray(160),
                );
                footer.y -= footer_font.size * 1.4;
            }
            painter.text(
                footer,
                Align2::LEFT_BOTTOM,
                format!(
                    "{} views  |  {} likes",
                    format_count(item.stats.views),
                    format_count(item.stats.likes)
                ),
                footer_font,
                Color32::from_gray(220),
            );
        }

        if pan_delta != Vec2::ZERO {
            self.drag_view(pan_delta);
        }
        if let Some(url) = open_url {
            info!(%url, "opening project");
            ui.ctx().open_url(egui::OpenUrl::new_tab(url));
        }
    }
}
