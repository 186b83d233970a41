//! Voice interaction state machine
//!
//! Pure transitions: [`VoiceMachine::handle`] applies an event and returns
//! the side effects the driver has to carry out. Valid transitions:
//! - Idle -> Recording (device acquired)
//! - Idle -> Error (device refused)
//! - Recording -> Processing (user stops)
//! - Processing -> Speaking (reply carries audio)
//! - Processing -> Idle (reply without audio)
//! - Processing -> Error (request failed)
//! - Speaking -> Idle (playback ended)
//! - Error -> Idle (recovery delay elapsed)
//!
//! Any other event is ignored, which keeps the table total.

use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VoiceState {
    /// Resting; the button starts a recording
    #[default]
    Idle,
    /// Microphone live; the button stops it
    Recording,
    /// Recording uploaded, waiting for the backend
    Processing,
    /// Playing the synthesized reply
    Speaking,
    /// Something failed; reverts to idle on its own
    Error,
}

impl VoiceState {
    /// The button may start a recording
    pub fn can_start(&self) -> bool {
        matches!(self, VoiceState::Idle)
    }

    /// The button may stop a recording
    pub fn can_stop(&self) -> bool {
        matches!(self, VoiceState::Recording)
    }

    /// The button does nothing
    pub fn is_inert(&self) -> bool {
        matches!(
            self,
            VoiceState::Processing | VoiceState::Speaking | VoiceState::Error
        )
    }
}

impl fmt::Display for VoiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceState::Idle => write!(f, "Idle"),
            VoiceState::Recording => write!(f, "Recording"),
            VoiceState::Processing => write!(f, "Processing"),
            VoiceState::Speaking => write!(f, "Speaking"),
            VoiceState::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceEvent {
    /// User pressed the button while idle
    Activate,
    DeviceAcquired,
    DeviceUnavailable(String),
    /// User pressed the button while recording
    Deactivate,
    /// Backend answered; `audio` is the decoded speech, if any
    ReplyReceived { audio: Option<Vec<u8>> },
    RequestFailed(String),
    PlaybackEnded,
    RecoveryElapsed,
}

impl VoiceEvent {
    /// Event name without its payload
    pub fn name(&self) -> &'static str {
        match self {
            VoiceEvent::Activate => "Activate",
            VoiceEvent::DeviceAcquired => "DeviceAcquired",
            VoiceEvent::DeviceUnavailable(_) => "DeviceUnavailable",
            VoiceEvent::Deactivate => "Deactivate",
            VoiceEvent::ReplyReceived { .. } => "ReplyReceived",
            VoiceEvent::RequestFailed(_) => "RequestFailed",
            VoiceEvent::PlaybackEnded => "PlaybackEnded",
            VoiceEvent::RecoveryElapsed => "RecoveryElapsed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Open the microphone
    AcquireDevice,
    /// Stop the microphone and upload what was captured
    FinishCapture,
    /// Play the reply audio
    Play(Vec<u8>),
    /// Deliver `RecoveryElapsed` after the delay
    ScheduleRecovery(Duration),
}

#[derive(Clone, Debug)]
pub struct VoiceMachine {
    state: VoiceState,
    acquiring: bool,
    recovery_delay: Duration,
    last_error: Option<String>,
}

impl VoiceMachine {
    pub fn new(recovery_delay: Duration) -> Self {
        Self {
            state: VoiceState::Idle,
            acquiring: false,
            recovery_delay,
            last_error: None,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// A device acquisition is outstanding
    pub fn is_acquiring(&self) -> bool {
        self.acquiring
    }

    /// Reason for the most recent failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn handle(&mut self, event: VoiceEvent) -> Vec<Effect> {
        match (self.state, event) {
            (VoiceState::Idle, VoiceEvent::Activate) if !self.acquiring => {
                debug!("Acquiring input device");
                self.acquiring = true;
                vec![Effect::AcquireDevice]
            }
            (VoiceState::Idle, VoiceEvent::DeviceAcquired) if self.acquiring => {
                self.acquiring = false;
                self.last_error = None;
                self.enter(VoiceState::Recording);
                Vec::new()
            }
            (VoiceState::Idle, VoiceEvent::DeviceUnavailable(reason)) if self.acquiring => {
                self.acquiring = false;
                self.fail(reason)
            }
            (VoiceState::Recording, VoiceEvent::Deactivate) => {
                self.enter(VoiceState::Processing);
                vec![Effect::FinishCapture]
            }
            (VoiceState::Processing, VoiceEvent::ReplyReceived { audio: Some(audio) }) => {
                self.enter(VoiceState::Speaking);
                vec![Effect::Play(audio)]
            }
            (VoiceState::Processing, VoiceEvent::ReplyReceived { audio: None }) => {
                self.enter(VoiceState::Idle);
                Vec::new()
            }
            (VoiceState::Processing, VoiceEvent::RequestFailed(reason)) => self.fail(reason),
            (VoiceState::Speaking, VoiceEvent::PlaybackEnded) => {
                self.enter(VoiceState::Idle);
                Vec::new()
            }
            (VoiceState::Error, VoiceEvent::RecoveryElapsed) => {
                self.enter(VoiceState::Idle);
                Vec::new()
            }
            (state, event) => {
                debug!("Ignoring {} in {}", event.name(), state);
                Vec::new()
            }
        }
    }

    /// Force the machine back to idle, forgetting any pending acquisition
    pub fn reset(&mut self) {
        if self.state != VoiceState::Idle || self.acquiring {
            warn!("Voice state machine reset to Idle from {}", self.state);
        }
        self.state = VoiceState::Idle;
        self.acquiring = false;
        self.last_error = None;
    }

    fn enter(&mut self, next: VoiceState) {
        info!("Voice state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, reason: String) -> Vec<Effect> {
        warn!("Voice interaction failed: {}", reason);
        self.last_error = Some(reason);
        self.enter(VoiceState::Error);
        vec![Effect::ScheduleRecovery(self.recovery_delay)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_secs(2);

    fn recording() -> VoiceMachine {
        let mut machine = VoiceMachine::new(DELAY);
        machine.handle(VoiceEvent::Activate);
        machine.handle(VoiceEvent::DeviceAcquired);
        machine
    }

    fn processing() -> VoiceMachine {
        let mut machine = recording();
        machine.handle(VoiceEvent::Deactivate);
        machine
    }

    #[test]
    fn test_state_display() {
        assert_eq!(VoiceState::Idle.to_string(), "Idle");
        assert_eq!(VoiceState::Recording.to_string(), "Recording");
        assert_eq!(VoiceState::Processing.to_string(), "Processing");
        assert_eq!(VoiceState::Speaking.to_string(), "Speaking");
        assert_eq!(VoiceState::Error.to_string(), "Error");
    }

    #[test]
    fn test_button_actionability() {
        assert!(VoiceState::Idle.can_start());
        assert!(!VoiceState::Idle.can_stop());
        assert!(VoiceState::Recording.can_stop());
        assert!(!VoiceState::Recording.can_start());
        for state in [VoiceState::Processing, VoiceState::Speaking, VoiceState::Error] {
            assert!(state.is_inert());
            assert!(!state.can_start());
            assert!(!state.can_stop());
        }
    }

    #[test]
    fn test_activate_requests_device_once() {
        let mut machine = VoiceMachine::new(DELAY);
        assert_eq!(machine.handle(VoiceEvent::Activate), vec![Effect::AcquireDevice]);
        assert!(machine.is_acquiring());
        assert_eq!(machine.state(), VoiceState::Idle);

        // Second press while the device is being acquired
        assert!(machine.handle(VoiceEvent::Activate).is_empty());
    }

    #[test]
    fn test_device_acquired_only_enters_recording() {
        let machine = recording();
        assert_eq!(machine.state(), VoiceState::Recording);
        assert!(!machine.is_acquiring());
    }

    #[test]
    fn test_device_refused_enters_error_then_idle() {
        let mut machine = VoiceMachine::new(DELAY);
        machine.handle(VoiceEvent::Activate);
        let effects = machine.handle(VoiceEvent::DeviceUnavailable("denied".into()));

        assert_eq!(machine.state(), VoiceState::Error);
        assert_eq!(effects, vec![Effect::ScheduleRecovery(DELAY)]);
        assert_eq!(machine.last_error(), Some("denied"));

        machine.handle(VoiceEvent::RecoveryElapsed);
        assert_eq!(machine.state(), VoiceState::Idle);
    }

    #[test]
    fn test_error_ignores_everything_but_recovery() {
        let mut machine = VoiceMachine::new(DELAY);
        machine.handle(VoiceEvent::Activate);
        machine.handle(VoiceEvent::DeviceUnavailable("denied".into()));

        for event in [
            VoiceEvent::Activate,
            VoiceEvent::Deactivate,
            VoiceEvent::DeviceAcquired,
            VoiceEvent::PlaybackEnded,
            VoiceEvent::ReplyReceived { audio: None },
        ] {
            assert!(machine.handle(event).is_empty());
            assert_eq!(machine.state(), VoiceState::Error);
        }
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut machine = recording();
        assert_eq!(machine.handle(VoiceEvent::Deactivate), vec![Effect::FinishCapture]);
        assert_eq!(machine.state(), VoiceState::Processing);

        assert!(machine.handle(VoiceEvent::Deactivate).is_empty());
        assert_eq!(machine.state(), VoiceState::Processing);

        let mut idle = VoiceMachine::new(DELAY);
        assert!(idle.handle(VoiceEvent::Deactivate).is_empty());
        assert_eq!(idle.state(), VoiceState::Idle);
    }

    #[test]
    fn test_reply_with_audio_speaks() {
        let mut machine = processing();
        let effects = machine.handle(VoiceEvent::ReplyReceived {
            audio: Some(vec![1, 2, 3]),
        });
        assert_eq!(machine.state(), VoiceState::Speaking);
        assert_eq!(effects, vec![Effect::Play(vec![1, 2, 3])]);
    }

    #[test]
    fn test_reply_without_audio_returns_to_idle() {
        let mut machine = processing();
        assert!(machine.handle(VoiceEvent::ReplyReceived { audio: None }).is_empty());
        assert_eq!(machine.state(), VoiceState::Idle);
    }

    #[test]
    fn test_failed_request_enters_error() {
        let mut machine = processing();
        let effects = machine.handle(VoiceEvent::RequestFailed("HTTP error! status: 502".into()));
        assert_eq!(machine.state(), VoiceState::Error);
        assert_eq!(effects, vec![Effect::ScheduleRecovery(DELAY)]);
    }

    #[test]
    fn test_speaking_only_leaves_on_playback_end() {
        let mut machine = processing();
        machine.handle(VoiceEvent::ReplyReceived {
            audio: Some(vec![0]),
        });

        for event in [
            VoiceEvent::Activate,
            VoiceEvent::Deactivate,
            VoiceEvent::RecoveryElapsed,
            VoiceEvent::RequestFailed("late".into()),
        ] {
            machine.handle(event);
            assert_eq!(machine.state(), VoiceState::Speaking);
        }

        machine.handle(VoiceEvent::PlaybackEnded);
        assert_eq!(machine.state(), VoiceState::Idle);
    }

    #[test]
    fn test_full_cycle() {
        let mut machine = VoiceMachine::new(DELAY);
        machine.handle(VoiceEvent::Activate);
        machine.handle(VoiceEvent::DeviceAcquired);
        machine.handle(VoiceEvent::Deactivate);
        machine.handle(VoiceEvent::ReplyReceived {
            audio: Some(vec![9]),
        });
        machine.handle(VoiceEvent::PlaybackEnded);
        assert_eq!(machine.state(), VoiceState::Idle);

        // Ready for another round
        assert_eq!(machine.handle(VoiceEvent::Activate), vec![Effect::AcquireDevice]);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut machine = processing();
        machine.reset();
        assert_eq!(machine.state(), VoiceState::Idle);

        let mut acquiring = VoiceMachine::new(DELAY);
        acquiring.handle(VoiceEvent::Activate);
        acquiring.reset();
        assert!(!acquiring.is_acquiring());
        // Late acquisition after reset is ignored
        acquiring.handle(VoiceEvent::DeviceAcquired);
        assert_eq!(acquiring.state(), VoiceState::Idle);
    }
}
