//! Desktop shell built on egui/eframe
//!
//! Sidebar navigation between the chat and voice surfaces, a navbar, and the
//! page itself. All state lives in [`AppState`]; panels only borrow it.

mod app;
pub mod components;
mod state;
mod theme;

pub use app::ParleyApp;
pub use state::{AppState, Page};
pub use theme::Theme;

/// Open the main window and block until it is closed
pub fn run(state: AppState) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([420.0, 480.0])
            .with_title("Parley"),
        ..Default::default()
    };

    eframe::run_native(
        "Parley",
        options,
        Box::new(|_cc| Ok(Box::new(ParleyApp::new(state)))),
    )
}
