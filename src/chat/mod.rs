//! Chat surface: a growing message log exchanged with the backend

pub mod controller;
pub mod suggestions;

pub use controller::{ChatSession, ChatSurface, PendingChat};
pub use suggestions::{Suggestions, DEFAULT_SUGGESTIONS};
