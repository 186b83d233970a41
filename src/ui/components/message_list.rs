//! Message list component
//!
//! Renders a conversation log as bubbles, user on the right and assistant on
//! the left. Assistant text is shown verbatim.

use crate::messages::Message;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    typing: bool,
    empty_hint: Option<&'a str>,
    id_salt: &'a str,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            typing: false,
            empty_hint: None,
            id_salt: "messages",
        }
    }

    /// Show the typing indicator after the last message
    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }

    /// Centered text shown while the log is empty
    pub fn empty_hint(mut self, hint: &'a str) -> Self {
        self.empty_hint = Some(hint);
        self
    }

    pub fn id_salt(mut self, salt: &'a str) -> Self {
        self.id_salt = salt;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt(self.id_salt)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                if self.messages.is_empty() && !self.typing {
                    if let Some(hint) = self.empty_hint {
                        ui.vertical_centered(|ui| {
                            ui.add_space(self.theme.spacing_lg);
                            ui.label(RichText::new(hint).color(self.theme.text_muted));
                        });
                    }
                }

                for message in self.messages {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing_sm);
                }

                if self.typing {
                    self.show_typing_indicator(ui);
                }

                ui.add_space(self.theme.spacing);
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.is_user();
        let (fill, text_color) = if is_user {
            (self.theme.user_bubble, self.theme.text_on_primary)
        } else {
            (self.theme.assistant_bubble, self.theme.text_primary)
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };
        let accessible = if is_user {
            format!("User message: {}", message.content)
        } else {
            format!("Assistant response: {}", message.content)
        };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let response = ui.label(RichText::new(&message.content).color(text_color));
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &accessible)
                    });
                });

            ui.label(
                RichText::new(message.timestamp.format("%H:%M").to_string())
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_typing_indicator(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            egui::Frame::none()
                .fill(self.theme.assistant_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                .show(ui, |ui| {
                    let t = ui.ctx().input(|i| i.time);
                    let alpha = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
                    let response = ui.label(
                        RichText::new("● ● ●")
                            .size(10.0)
                            .color(dot_color(self.theme.text_muted, alpha)),
                    );
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::Label,
                            true,
                            "Assistant is typing",
                        )
                    });
                });
        });

        ui.ctx().request_repaint();
    }
}

fn dot_color(base: Color32, alpha: f32) -> Color32 {
    base.gamma_multiply(alpha.clamp(0.2, 1.0))
}
