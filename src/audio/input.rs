//! Audio capture
//!
//! A recording holds the input device exclusively from [`AudioCapture::open`]
//! until it is finished or dropped, whichever comes first.

use crate::{ParleyError, Result};

/// Mono PCM captured during one recording
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl CapturedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

pub trait AudioCapture: Send + Sync {
    /// Acquire the input device and start buffering.
    ///
    /// Blocks until the device is live or has been refused.
    fn open(&self) -> Result<Box<dyn Recording>>;
}

pub trait Recording: Send {
    /// Stop all tracks and hand back what was captured
    fn finish(self: Box<Self>) -> Result<CapturedAudio>;
}

/// Capture source used when no microphone can be offered
#[derive(Debug, Clone)]
pub struct UnavailableCapture {
    reason: String,
}

impl UnavailableCapture {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AudioCapture for UnavailableCapture {
    fn open(&self) -> Result<Box<dyn Recording>> {
        Err(ParleyError::AudioDeviceError(self.reason.clone()))
    }
}

#[cfg(feature = "audio-io")]
pub use microphone::MicrophoneCapture;

#[cfg(feature = "audio-io")]
mod microphone {
    use super::{AudioCapture, CapturedAudio, Recording};
    use crate::{ParleyError, Result};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{FromSample, Sample, SizedSample, Stream};
    use crossbeam_channel::{bounded, Sender};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};
    use tracing::{debug, error, info};

    type SampleBuffer = Arc<Mutex<Vec<f32>>>;

    /// Default system microphone via cpal.
    ///
    /// cpal streams cannot leave the thread that built them, so each
    /// recording gets its own thread that owns the stream until stopped.
    #[derive(Debug, Clone, Default)]
    pub struct MicrophoneCapture;

    impl MicrophoneCapture {
        pub fn new() -> Self {
            Self
        }
    }

    impl AudioCapture for MicrophoneCapture {
        fn open(&self) -> Result<Box<dyn Recording>> {
            let (ready_tx, ready_rx) = bounded::<Result<u32>>(1);
            let (stop_tx, stop_rx) = bounded::<()>(1);
            let samples: SampleBuffer = Arc::new(Mutex::new(Vec::new()));
            let buffer = Arc::clone(&samples);

            let worker = thread::Builder::new()
                .name("parley-mic".to_string())
                .spawn(move || {
                    let stream = match build_stream(buffer) {
                        Ok((stream, sample_rate)) => {
                            let _ = ready_tx.send(Ok(sample_rate));
                            stream
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };

                    // Hold the device until asked to stop or the handle goes away
                    let _ = stop_rx.recv();
                    drop(stream);
                    info!("Microphone released");
                })
                .map_err(|e| {
                    ParleyError::AudioDeviceError(format!("Failed to spawn capture thread: {}", e))
                })?;

            match ready_rx.recv() {
                Ok(Ok(sample_rate)) => Ok(Box::new(MicRecording {
                    stop_tx: Some(stop_tx),
                    worker: Some(worker),
                    samples,
                    sample_rate,
                })),
                Ok(Err(e)) => {
                    let _ = worker.join();
                    Err(e)
                }
                Err(_) => Err(ParleyError::AudioDeviceError(
                    "Capture thread exited before the device was ready".to_string(),
                )),
            }
        }
    }

    fn build_stream(buffer: SampleBuffer) -> Result<(Stream, u32)> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| ParleyError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device.default_input_config().map_err(|e| {
            ParleyError::AudioDeviceError(format!("Failed to get input config: {}", e))
        })?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;

        let stream = match sample_format {
            cpal::SampleFormat::F32 => input_stream::<f32>(&device, &config, channels, buffer),
            cpal::SampleFormat::I16 => input_stream::<i16>(&device, &config, channels, buffer),
            cpal::SampleFormat::I32 => input_stream::<i32>(&device, &config, channels, buffer),
            cpal::SampleFormat::U16 => input_stream::<u16>(&device, &config, channels, buffer),
            other => {
                return Err(ParleyError::AudioDeviceError(format!(
                    "Unsupported sample format '{}'",
                    other
                )))
            }
        }?;

        stream.play().map_err(|e| {
            ParleyError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        debug!("Input stream live at {} Hz, {} channel(s)", sample_rate, channels);
        Ok((stream, sample_rate))
    }

    fn input_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        channels: usize,
        buffer: SampleBuffer,
    ) -> Result<Stream>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    let mut buffer = buffer.lock();
                    // Average all channels down to mono
                    for frame in data.chunks(channels.max(1)) {
                        let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
                        buffer.push(sum / frame.len() as f32);
                    }
                },
                |err| error!("Audio input stream error: {}", err),
                None,
            )
            .map_err(|e| ParleyError::AudioDeviceError(format!("Failed to build input stream: {}", e)))
    }

    struct MicRecording {
        stop_tx: Option<Sender<()>>,
        worker: Option<JoinHandle<()>>,
        samples: SampleBuffer,
        sample_rate: u32,
    }

    impl MicRecording {
        fn release(&mut self) {
            if let Some(stop_tx) = self.stop_tx.take() {
                let _ = stop_tx.send(());
            }
            if let Some(worker) = self.worker.take() {
                let _ = worker.join();
            }
        }
    }

    impl Recording for MicRecording {
        fn finish(mut self: Box<Self>) -> Result<CapturedAudio> {
            self.release();
            let samples = std::mem::take(&mut *self.samples.lock());
            info!("Captured {} samples", samples.len());
            Ok(CapturedAudio::new(samples, self.sample_rate, 1))
        }
    }

    impl Drop for MicRecording {
        fn drop(&mut self) {
            self.release();
        }
    }
}
