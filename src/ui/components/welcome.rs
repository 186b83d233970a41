//! Welcome panel with example prompts, shown on an empty chat

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct Welcome<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> Welcome<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let mut picked: Option<String> = None;

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);

            ui.label(
                RichText::new("How can I help you today?")
                    .heading()
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new("Your intelligent assistant for lending operations")
                    .color(self.theme.text_muted),
            );
            ui.add_space(self.theme.spacing_lg);

            for prompt in self.state.suggestions.items() {
                let button = egui::Button::new(
                    RichText::new(prompt.as_str()).color(self.theme.text_secondary),
                )
                .min_size(Vec2::new(280.0, 36.0))
                .rounding(self.theme.card_rounding)
                .fill(self.theme.bg_primary)
                .stroke(egui::Stroke::new(1.0, self.theme.border));

                let response = ui.add(button);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(
                        egui::WidgetType::Button,
                        true,
                        format!("Suggestion: {}", prompt),
                    )
                });
                if response.clicked() {
                    picked = Some(prompt.clone());
                }
            }
        });

        if let Some(prompt) = picked {
            self.state.send_suggestion(&prompt);
        }
    }
}
