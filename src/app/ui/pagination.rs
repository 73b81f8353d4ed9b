use eframe::egui::{self, Align2, Context, vec2};

use super::super::ViewModel;

impl ViewModel {
    /// Previous / page label / Next, anchored at the bottom centre while the
    /// expanded category spans more than one page.
    pub(in crate::app) fn draw_pagination(&mut self, ctx: &Context) {
        let Some(controls) = self.pagination else {
            return;
        };

        let mut step = 0i8;
        egui::Area::new(egui::Id::new("pagination_controls"))
            .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -20.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(controls.prev_enabled, egui::Button::new("Previous"))
                            .clicked()
                        {
                            step = -1;
                        }
                        ui.label(controls.label());
                        if ui
                            .add_enabled(controls.next_enabled, egui::Button::new("Next"))
                            .clicked()
                        {
                            step = 1;
                        }
                    });
                });
            });

        match step {
            -1 => self.explorer.prev_page(&mut self.scene),
            1 => self.explorer.next_page(&mut self.scene),
            _ => {}
        }
    }
}
