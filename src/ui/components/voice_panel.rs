//! Voice page: transcript, record button and session badge

use super::{MessageList, RecordButton};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::voice::VoiceState;
use egui::{self, RichText};

pub const VOICE_HINT: &str = "Tap \"Speak\" to start the voice conversation.";

pub struct VoicePanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> VoicePanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let controls_height = 170.0;

        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.card_rounding)
            .inner_margin(egui::Margin::same(self.theme.spacing))
            .show(ui, |ui| {
                ui.set_height((ui.available_height() - controls_height).max(120.0));
                MessageList::new(self.state.voice.messages(), self.theme)
                    .empty_hint(VOICE_HINT)
                    .id_salt("voice_messages")
                    .show(ui);
            });

        ui.add_space(self.theme.spacing);

        ui.vertical_centered(|ui| {
            RecordButton::new(&mut self.state.voice, self.theme).show(ui);

            let failed = self.state.voice.state() == VoiceState::Error;
            if let Some(reason) = self.state.voice.last_error().filter(|_| failed) {
                ui.label(RichText::new(reason).size(11.0).color(self.theme.text_muted));
            }

            if let Some(id) = self.state.voice.session_id() {
                ui.label(
                    RichText::new(format!("Session ID: {}", id))
                        .size(11.0)
                        .color(self.theme.text_muted),
                );
            }
        });
    }
}
