//! Audio playback
//!
//! Each reply gets a fresh playback; starting one halts any earlier playback
//! that is still going.

use crate::Result;

pub trait AudioPlayer: Send + Sync {
    /// Decode and start playing `encoded`, halting any earlier playback
    fn play(&self, encoded: Vec<u8>) -> Result<Box<dyn Playback>>;

    /// Halt whatever is playing
    fn stop(&self);
}

pub trait Playback: Send {
    /// Block until playback ends or is halted
    fn wait(self: Box<Self>);
}

/// Player used when there is no speaker; every playback ends at once
#[derive(Debug, Clone, Default)]
pub struct SilentPlayer;

struct Finished;

impl Playback for Finished {
    fn wait(self: Box<Self>) {}
}

impl AudioPlayer for SilentPlayer {
    fn play(&self, encoded: Vec<u8>) -> Result<Box<dyn Playback>> {
        tracing::debug!("No speaker, skipping {} bytes of audio", encoded.len());
        Ok(Box::new(Finished))
    }

    fn stop(&self) {}
}

#[cfg(feature = "audio-io")]
pub use speaker::SpeakerPlayer;

#[cfg(feature = "audio-io")]
mod speaker {
    use super::{AudioPlayer, Playback};
    use crate::{ParleyError, Result};
    use crossbeam_channel::{bounded, Sender};
    use parking_lot::Mutex;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::thread;
    use tracing::{debug, info};

    /// Default output device via rodio.
    ///
    /// The output stream is pinned to a helper thread for the lifetime of
    /// the player; sinks are created from its handle.
    pub struct SpeakerPlayer {
        handle: OutputStreamHandle,
        current: Mutex<Option<Arc<Sink>>>,
        _keepalive: Sender<()>,
    }

    impl SpeakerPlayer {
        pub fn new() -> Result<Self> {
            let (handle_tx, handle_rx) = bounded::<Result<OutputStreamHandle>>(1);
            let (keepalive_tx, keepalive_rx) = bounded::<()>(0);

            thread::Builder::new()
                .name("parley-speaker".to_string())
                .spawn(move || match OutputStream::try_default() {
                    Ok((stream, handle)) => {
                        let _ = handle_tx.send(Ok(handle));
                        // Returns once the player is dropped
                        let _ = keepalive_rx.recv();
                        drop(stream);
                        debug!("Output stream closed");
                    }
                    Err(e) => {
                        let _ = handle_tx.send(Err(ParleyError::AudioDeviceError(format!(
                            "No output device available: {}",
                            e
                        ))));
                    }
                })
                .map_err(|e| {
                    ParleyError::AudioDeviceError(format!("Failed to spawn output thread: {}", e))
                })?;

            let handle = handle_rx.recv().map_err(|_| {
                ParleyError::AudioDeviceError("Output thread exited early".to_string())
            })??;

            info!("Speaker ready");
            Ok(Self {
                handle,
                current: Mutex::new(None),
                _keepalive: keepalive_tx,
            })
        }
    }

    impl AudioPlayer for SpeakerPlayer {
        fn play(&self, encoded: Vec<u8>) -> Result<Box<dyn Playback>> {
            let source = Decoder::new(Cursor::new(encoded)).map_err(|e| {
                ParleyError::AudioProcessingError(format!("Unsupported audio: {}", e))
            })?;
            let sink = Sink::try_new(&self.handle).map_err(|e| {
                ParleyError::AudioDeviceError(format!("Failed to open output sink: {}", e))
            })?;
            sink.append(source);
            let sink = Arc::new(sink);

            if let Some(previous) = self.current.lock().replace(Arc::clone(&sink)) {
                debug!("Halting previous playback");
                previous.stop();
            }

            Ok(Box::new(SinkPlayback { sink }))
        }

        fn stop(&self) {
            if let Some(sink) = self.current.lock().take() {
                sink.stop();
            }
        }
    }

    struct SinkPlayback {
        sink: Arc<Sink>,
    }

    impl Playback for SinkPlayback {
        fn wait(self: Box<Self>) {
            self.sink.sleep_until_end();
        }
    }
}
