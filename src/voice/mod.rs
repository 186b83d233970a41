//! Voice surface: one button driving record → upload → playback

pub mod controller;
pub mod machine;

pub use controller::VoiceSurface;
pub use machine::{Effect, VoiceEvent, VoiceMachine, VoiceState};
