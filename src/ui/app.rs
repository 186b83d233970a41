//! Main application struct and eframe integration

use crate::ui::components::{InputBar, MessageList, Navbar, Sidebar, VoicePanel, Welcome};
use crate::ui::state::{AppState, Page};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, SidePanel, TopBottomPanel};
use tracing::info;

/// Windows narrower than this hide the sidebar behind the menu toggle
const WIDE_LAYOUT: f32 = 1024.0;

pub struct ParleyApp {
    state: AppState,
    theme: Theme,
    themed: bool,
}

impl ParleyApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            theme: Theme::default(),
            themed: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Poll both surfaces and draw one frame
    pub fn ui(&mut self, ctx: &egui::Context) {
        if !self.themed {
            self.theme.apply(ctx);
            self.themed = true;
        }

        self.state.poll_events();

        let narrow = ctx.screen_rect().width() < WIDE_LAYOUT;
        self.show_navbar(ctx, narrow);
        if !narrow || self.state.sidebar_open {
            self.show_sidebar(ctx);
        }

        match self.state.page {
            Page::Chat => {
                self.show_input_area(ctx);
                self.show_chat(ctx);
            }
            Page::Voice => self.show_voice(ctx),
        }

        // Keep frames coming while a completion can land without input
        if self.state.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }

    fn show_navbar(&mut self, ctx: &egui::Context, narrow: bool) {
        TopBottomPanel::top("navbar")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .stroke(egui::Stroke::new(1.0, self.theme.border))
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing, 12.0)),
            )
            .show(ctx, |ui| {
                Navbar::new(&mut self.state, &self.theme).narrow(narrow).show(ui);
            });
    }

    fn show_sidebar(&mut self, ctx: &egui::Context) {
        SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(64.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .stroke(egui::Stroke::new(1.0, self.theme.border)),
            )
            .show(ctx, |ui| {
                Sidebar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_chat(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing_lg, 0.0)),
            )
            .show(ctx, |ui| {
                if self.state.show_suggestions() {
                    Welcome::new(&mut self.state, &self.theme).show(ui);
                } else {
                    MessageList::new(self.state.chat.messages(), &self.theme)
                        .typing(self.state.chat.is_loading())
                        .id_salt("chat_messages")
                        .show(ui);
                }
            });
    }

    fn show_voice(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                VoicePanel::new(&mut self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for ParleyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Parley shutting down");
        self.state.voice.reset();
    }
}
