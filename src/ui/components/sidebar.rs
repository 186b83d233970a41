//! Navigation rail: Chat, Voice and New Chat

use crate::ui::state::{AppState, Page};
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct Sidebar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing);
            ui.label(
                RichText::new("P")
                    .size(22.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing_lg);

            self.nav_button(ui, Page::Chat, "💬");
            self.nav_button(ui, Page::Voice, "🎤");

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
                ui.add_space(self.theme.spacing);
                let button = egui::Button::new(RichText::new("✚").size(18.0))
                    .min_size(Vec2::splat(44.0))
                    .rounding(self.theme.card_rounding);
                let response = ui.add(button);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "New Chat")
                });
                if response.on_hover_text("New Chat").clicked() {
                    match self.state.page {
                        Page::Chat => self.state.new_chat(),
                        Page::Voice => self.state.new_voice_session(),
                    }
                }
            });
        });
    }

    fn nav_button(&mut self, ui: &mut egui::Ui, page: Page, icon: &str) {
        let active = self.state.page == page;
        let (fill, color) = if active {
            (self.theme.primary, self.theme.text_on_primary)
        } else {
            (self.theme.bg_primary, self.theme.text_secondary)
        };

        let button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.card_rounding)
            .fill(fill);

        let response = ui.add(button);
        response.widget_info(|| {
            egui::WidgetInfo::selected(egui::WidgetType::Button, true, active, page.to_string())
        });
        if response.on_hover_text(page.to_string()).clicked() {
            self.state.navigate(page);
        }
        ui.add_space(self.theme.spacing_sm);
    }
}
