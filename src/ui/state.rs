//! Application state shared by every panel of the shell

use crate::audio::{AudioCapture, AudioPlayer};
use crate::backend::Backend;
use crate::chat::{ChatSurface, Suggestions};
use crate::config::ClientConfig;
use crate::voice::{VoiceState, VoiceSurface};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Which surface fills the central panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Chat,
    Voice,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Chat => write!(f, "Chat"),
            Page::Voice => write!(f, "Voice"),
        }
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chat" => Ok(Page::Chat),
            "voice" => Ok(Page::Voice),
            other => Err(format!("unknown page '{}', expected chat or voice", other)),
        }
    }
}

pub struct AppState {
    pub page: Page,
    pub chat: ChatSurface,
    pub voice: VoiceSurface,
    /// Text in the chat input box
    pub draft: String,
    pub suggestions: Suggestions,
    /// Sidebar shown on narrow windows
    pub sidebar_open: bool,
    /// Why the last send attempt was refused
    pub notice: Option<String>,
    suggestion_count: usize,
}

impl AppState {
    pub fn new(chat: ChatSurface, voice: VoiceSurface, suggestions: Suggestions) -> Self {
        let suggestion_count = suggestions.items().len();
        Self {
            page: Page::default(),
            chat,
            voice,
            draft: String::new(),
            suggestions,
            sidebar_open: false,
            notice: None,
            suggestion_count,
        }
    }

    /// Wire both surfaces to the given backend and devices
    pub fn from_config(
        config: &ClientConfig,
        backend: Arc<dyn Backend>,
        capture: Arc<dyn AudioCapture>,
        player: Arc<dyn AudioPlayer>,
        runtime: Handle,
    ) -> Self {
        let chat = ChatSurface::new(
            Arc::clone(&backend),
            runtime.clone(),
            config.chat.max_message_chars,
        );
        let voice = VoiceSurface::new(backend, capture, player, runtime, &config.voice);
        Self::new(chat, voice, Suggestions::random(config.chat.suggestion_count))
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    pub fn max_message_chars(&self) -> usize {
        self.chat.session().max_message_chars()
    }

    /// Draft has something to send and nothing is pending
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty() && !self.chat.is_loading()
    }

    /// Send the draft; it is cleared only when the message was accepted
    pub fn send_draft(&mut self) -> bool {
        match self.chat.send(&self.draft) {
            Ok(()) => {
                self.draft.clear();
                self.notice = None;
                true
            }
            Err(e) => {
                debug!("Draft not sent: {}", e);
                self.notice = Some(e.user_message());
                false
            }
        }
    }

    /// Same as typing `prompt` and pressing send
    pub fn send_suggestion(&mut self, prompt: &str) -> bool {
        match self.chat.send(prompt) {
            Ok(()) => {
                self.notice = None;
                true
            }
            Err(e) => {
                debug!("Suggestion not sent: {}", e);
                self.notice = Some(e.user_message());
                false
            }
        }
    }

    pub fn show_suggestions(&self) -> bool {
        Suggestions::visible(self.chat.messages().is_empty(), self.chat.is_loading())
    }

    pub fn navigate(&mut self, page: Page) {
        if self.page != page {
            info!("Navigating to {}", page);
        }
        self.page = page;
        self.sidebar_open = false;
    }

    /// Start over on the chat page with a fresh set of suggestions
    pub fn new_chat(&mut self) {
        self.chat.reset();
        self.draft.clear();
        self.notice = None;
        self.suggestions = Suggestions::random(self.suggestion_count);
        self.navigate(Page::Chat);
    }

    pub fn new_voice_session(&mut self) {
        self.voice.reset();
    }

    /// Apply completions from both surfaces
    pub fn poll_events(&mut self) -> usize {
        self.chat.poll_events() + self.voice.poll_events()
    }

    /// Something is pending that will change the screen without user input
    pub fn is_busy(&self) -> bool {
        self.chat.is_loading()
            || self.voice.is_acquiring()
            || self.voice.state() != VoiceState::Idle
    }
}
