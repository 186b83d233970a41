//! Audio collaborators for the voice surface
//!
//! Capture and playback sit behind traits; the cpal microphone and rodio
//! speaker are only built with the `audio-io` feature.

pub mod input;
pub mod output;
pub mod wav;

pub use input::{AudioCapture, CapturedAudio, Recording, UnavailableCapture};
pub use output::{AudioPlayer, Playback, SilentPlayer};
pub use wav::{encode_wav, WAV_MIME};

#[cfg(feature = "audio-io")]
pub use input::MicrophoneCapture;
#[cfg(feature = "audio-io")]
pub use output::SpeakerPlayer;

use std::sync::Arc;
use tracing::{info, warn};

/// Pick the capture and playback devices for this session.
///
/// Falls back to the unavailable/silent stand-ins when audio is disabled or
/// no output device can be opened; the microphone itself is only probed when
/// a recording starts.
pub fn default_devices(enable_audio: bool) -> (Arc<dyn AudioCapture>, Arc<dyn AudioPlayer>) {
    if !enable_audio {
        info!("Audio disabled");
        return (
            Arc::new(UnavailableCapture::new("Audio is disabled")),
            Arc::new(SilentPlayer),
        );
    }

    #[cfg(feature = "audio-io")]
    {
        let player: Arc<dyn AudioPlayer> = match SpeakerPlayer::new() {
            Ok(player) => Arc::new(player),
            Err(e) => {
                warn!("Playback unavailable: {}", e);
                Arc::new(SilentPlayer)
            }
        };
        (Arc::new(MicrophoneCapture::new()), player)
    }

    #[cfg(not(feature = "audio-io"))]
    {
        warn!("Built without audio-io; voice input unavailable");
        (
            Arc::new(UnavailableCapture::new("Built without audio support")),
            Arc::new(SilentPlayer),
        )
    }
}
