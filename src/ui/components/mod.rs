//! Reusable panels of the desktop shell

pub mod input_bar;
pub mod message_list;
pub mod navbar;
pub mod record_button;
pub mod sidebar;
pub mod voice_panel;
pub mod welcome;

pub use input_bar::{InputBar, DISCLAIMER};
pub use message_list::MessageList;
pub use navbar::Navbar;
pub use record_button::RecordButton;
pub use sidebar::Sidebar;
pub use voice_panel::{VoicePanel, VOICE_HINT};
pub use welcome::Welcome;
