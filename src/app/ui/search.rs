use eframe::egui::{self, Align, Layout, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::explorer::Category;

use super::super::ViewModel;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Category indices matching `query`, best match first. An empty query
/// keeps the layout order.
fn rank_categories(categories: &[Category], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..categories.len()).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = categories
        .iter()
        .enumerate()
        .filter_map(|(index, category)| {
            fuzzy_match_score(&matcher, &category.title, query).map(|score| (index, score))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(index, _)| index).collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_category_search(&mut self, ui: &mut Ui) {
        ui.heading("Categories");
        ui.add_space(4.0);
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Find a category")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);

        let matches = rank_categories(self.explorer.categories(), &self.search);
        if matches.is_empty() {
            ui.label("No category matches the search.");
            return;
        }

        let expanded = self.explorer.expanded().map(str::to_owned);
        let mut selected = None;

        egui::ScrollArea::vertical()
            .id_salt("category_search")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, matches.len(), |ui, row_range| {
                for &index in &matches[row_range] {
                    let Some(category) = self.explorer.categories().get(index) else {
                        continue;
                    };
                    let is_expanded = expanded.as_deref() == Some(category.id.as_str());
                    let count = self.explorer.item_count(&category.id);

                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_expanded, RichText::new(&category.title))
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(count.to_string());
                            });
                            clicked
                        })
                        .inner;
                    if clicked {
                        selected = Some(category.id.clone());
                    }
                }
            });

        if let Some(category) = selected {
            self.explorer.select_category(&mut self.scene, &category);
        }
    }
}
