//! Top bar with the product title and, on narrow windows, the menu toggle

use crate::ui::state::{AppState, Page};
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct Navbar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
    narrow: bool,
}

impl<'a> Navbar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            narrow: false,
        }
    }

    /// Offer the menu toggle instead of a permanent sidebar
    pub fn narrow(mut self, narrow: bool) -> Self {
        self.narrow = narrow;
        self
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.narrow {
                let response = ui.button(RichText::new("☰").size(18.0));
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Toggle menu")
                });
                if response.clicked() {
                    self.state.sidebar_open = !self.state.sidebar_open;
                }
            }

            ui.label(
                RichText::new("Parley")
                    .size(20.0)
                    .strong()
                    .color(self.theme.text_primary),
            );

            let subtitle = match self.state.page {
                Page::Chat => "Assistant",
                Page::Voice => "Voice Assistant",
            };
            ui.label(RichText::new(subtitle).size(14.0).color(self.theme.text_muted));
        });
    }
}
