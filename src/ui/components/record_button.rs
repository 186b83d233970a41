//! Record button for the voice page
//!
//! One round button drives the whole voice cycle. It starts a recording from
//! idle, stops it while recording, and does nothing otherwise.

use crate::ui::theme::Theme;
use crate::voice::{VoiceState, VoiceSurface};
use egui::{Color32, Key, RichText, Sense, Vec2};

const DIAMETER: f32 = 88.0;

/// Caption under the button for the given state
pub fn caption(state: VoiceState, acquiring: bool) -> &'static str {
    match state {
        VoiceState::Idle if acquiring => "Opening microphone...",
        VoiceState::Idle => "Speak",
        VoiceState::Recording => "Stop Recording",
        VoiceState::Processing => "Processing...",
        VoiceState::Speaking => "Speaking...",
        VoiceState::Error => "Microphone unavailable",
    }
}

pub struct RecordButton<'a> {
    voice: &'a mut VoiceSurface,
    theme: &'a Theme,
}

impl<'a> RecordButton<'a> {
    pub fn new(voice: &'a mut VoiceSurface, theme: &'a Theme) -> Self {
        Self { voice, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) -> egui::Response {
        let state = self.voice.state();
        let acquiring = self.voice.is_acquiring();
        let actionable = (state.can_start() && !acquiring) || state.can_stop();
        let label = caption(state, acquiring);

        let sense = if actionable {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(DIAMETER), sense);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, actionable, "Voice control")
        });

        if ui.is_rect_visible(rect) {
            self.paint(ui, rect, &response, state);
        }

        // Space toggles too, unless a text box has focus
        let space_pressed = ui.input(|i| i.key_pressed(Key::Space))
            && ui.memory(|m| m.focused().is_none());

        if actionable && (response.clicked() || space_pressed) {
            self.voice.toggle();
        }

        ui.add_space(self.theme.spacing_sm);
        ui.label(
            RichText::new(label)
                .size(16.0)
                .strong()
                .color(self.caption_color(state)),
        );

        response
    }

    fn paint(&self, ui: &egui::Ui, rect: egui::Rect, response: &egui::Response, state: VoiceState) {
        let painter = ui.painter();
        let center = rect.center();
        let radius = DIAMETER / 2.0 - 4.0;

        let fill = match state {
            VoiceState::Idle if response.hovered() => self.theme.accent.gamma_multiply(0.85),
            VoiceState::Idle => self.theme.accent,
            VoiceState::Recording => self.theme.recording,
            VoiceState::Processing => self.theme.warning,
            VoiceState::Speaking => self.theme.success,
            VoiceState::Error => self.theme.text_muted,
        };
        painter.circle_filled(center, radius, fill);

        match state {
            VoiceState::Recording => {
                painter.rect_filled(
                    egui::Rect::from_center_size(center, Vec2::splat(22.0)),
                    3.0,
                    Color32::WHITE,
                );
                self.paint_pulse(ui, center, radius);
            }
            VoiceState::Processing | VoiceState::Speaking => {
                self.paint_spinner(ui, center);
            }
            _ => self.paint_mic(painter, center),
        }
    }

    fn paint_mic(&self, painter: &egui::Painter, center: egui::Pos2) {
        let stroke = egui::Stroke::new(2.5, Color32::WHITE);
        let body = egui::Rect::from_center_size(
            egui::pos2(center.x, center.y - 5.0),
            Vec2::new(12.0, 22.0),
        );
        painter.rect_filled(body, 6.0, Color32::WHITE);

        // Stand: half ring, stem, base
        let arc_center = egui::pos2(center.x, center.y);
        let arc_radius = 13.0;
        let segments = 10;
        for i in 0..segments {
            let a0 = std::f32::consts::PI * (i as f32 / segments as f32);
            let a1 = std::f32::consts::PI * ((i + 1) as f32 / segments as f32);
            painter.line_segment(
                [
                    egui::pos2(arc_center.x - arc_radius * a0.cos(), arc_center.y + arc_radius * a0.sin()),
                    egui::pos2(arc_center.x - arc_radius * a1.cos(), arc_center.y + arc_radius * a1.sin()),
                ],
                stroke,
            );
        }
        let stem_top = center.y + arc_radius;
        painter.line_segment(
            [egui::pos2(center.x, stem_top), egui::pos2(center.x, stem_top + 6.0)],
            stroke,
        );
        painter.line_segment(
            [
                egui::pos2(center.x - 8.0, stem_top + 6.0),
                egui::pos2(center.x + 8.0, stem_top + 6.0),
            ],
            stroke,
        );
    }

    fn paint_pulse(&self, ui: &egui::Ui, center: egui::Pos2, radius: f32) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
        ui.painter().circle_stroke(
            center,
            radius + 2.0 + pulse * 6.0,
            egui::Stroke::new(
                2.0 + pulse * 2.0,
                self.theme.recording.gamma_multiply((1.0 - pulse) * 0.6),
            ),
        );
        ui.ctx().request_repaint();
    }

    fn paint_spinner(&self, ui: &egui::Ui, center: egui::Pos2) {
        let t = ui.ctx().input(|i| i.time);
        for i in 0..3 {
            let angle = t * 3.0 + i as f64 * std::f64::consts::TAU / 3.0;
            let pos = egui::pos2(
                center.x + angle.cos() as f32 * 12.0,
                center.y + angle.sin() as f32 * 12.0,
            );
            let alpha = 1.0 - i as f32 * 0.3;
            ui.painter()
                .circle_filled(pos, 4.0, Color32::from_white_alpha((255.0 * alpha) as u8));
        }
        ui.ctx().request_repaint();
    }

    fn caption_color(&self, state: VoiceState) -> Color32 {
        match state {
            VoiceState::Recording => self.theme.recording,
            VoiceState::Error => self.theme.error,
            _ => self.theme.text_secondary,
        }
    }
}
