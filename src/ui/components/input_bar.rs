//! Chat input bar
//!
//! Multiline text box plus send button. Enter sends, Shift+Enter inserts a
//! newline. Both controls are disabled while a reply is pending.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, Modifiers, RichText, Vec2};

pub const DISCLAIMER: &str = "Parley can make mistakes. Verify important information.";

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .stroke(egui::Stroke::new(1.0, self.theme.border))
            .rounding(self.theme.card_rounding)
            .inner_margin(egui::Margin::symmetric(self.theme.spacing, 10.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_text_input(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_send_button(ui);
                });
            });

        ui.add_space(self.theme.spacing_sm);
        ui.vertical_centered(|ui| {
            if let Some(notice) = &self.state.notice {
                ui.label(RichText::new(notice).size(12.0).color(self.theme.error));
            }
            ui.label(RichText::new(DISCLAIMER).size(11.0).color(self.theme.text_muted));
        });
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let loading = self.state.chat.is_loading();
        let id = egui::Id::new("message_input");

        // Claim Enter before the text box turns it into a newline
        let submitted = ui.memory(|m| m.has_focus(id))
            && ui.input_mut(|i| !i.modifiers.shift && i.consume_key(Modifiers::NONE, Key::Enter));

        let max_chars = self.state.max_message_chars();
        let text_edit = egui::TextEdit::multiline(&mut self.state.draft)
            .id(id)
            .hint_text("Message Parley...")
            .desired_rows(1)
            .desired_width(ui.available_width() - 48.0)
            .char_limit(max_chars)
            .frame(false)
            .font(egui::TextStyle::Body);

        let response = ui.add_enabled(!loading, text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, !loading, "Message input")
        });

        if submitted && self.state.can_send() {
            self.state.send_draft();
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = self.state.can_send();

        let fill = if can_send {
            self.theme.primary
        } else {
            self.theme.border
        };
        let icon_color = if can_send {
            self.theme.text_on_primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(RichText::new("➤").size(16.0).color(icon_color))
            .min_size(Vec2::splat(32.0))
            .rounding(self.theme.button_rounding)
            .fill(fill);

        let response = ui.add_enabled(can_send, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send message")
        });

        if response.clicked() {
            self.state.send_draft();
        }

        response.on_hover_text("Send message (Enter)");
    }
}
