use eframe::egui::{self, Align, Context, Layout};

use crate::util::format_count;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_top_bar(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("project-orbit");
                    ui.separator();
                    ui.label(format!("source: {}", self.source));
                    ui.label(format!("projects: {}", format_count(self.totals.items as u64)));
                    ui.label(format!("views: {}", format_count(self.totals.views)));
                    ui.label(format!("likes: {}", format_count(self.totals.likes)));
                    ui.label(format!("categories: {}", self.explorer.categories().len()));

                    let reload_label = if is_loading {
                        "Reloading..."
                    } else {
                        "Reload catalog"
                    };
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new(reload_label));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                    });
                });
            });
    }

    fn status_text(&self) -> String {
        match self.explorer.expanded() {
            None => "overview".to_owned(),
            Some(category) => {
                let open = self.explorer.overlays().len();
                let count = self.explorer.item_count(category);
                format!("{category}: {count} projects, {open} cards open")
            }
        }
    }
}
