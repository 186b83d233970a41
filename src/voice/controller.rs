//! Voice surface
//!
//! Owns the interaction state machine plus the transcript log and session,
//! and carries out the machine's effects on the tokio runtime. Every worker
//! posts its outcome back tagged with the session ticket it was started
//! under; outcomes from before a reset are dropped when they arrive.

use super::machine::{Effect, VoiceEvent, VoiceMachine, VoiceState};
use crate::audio::{encode_wav, AudioCapture, AudioPlayer, Recording, WAV_MIME};
use crate::backend::{Backend, VoiceReply, VoiceUpload};
use crate::config::VoiceConfig;
use crate::messages::{Message, MessageLog};
use crate::session::{Session, Ticket};
use crate::utils::CompletionChannel;
use crate::{ParleyError, Result};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

/// Outcome of a worker started for one of the machine's effects
enum Completion {
    Acquired(Result<Box<dyn Recording>>),
    Replied(Result<VoiceReply>),
    PlaybackEnded,
    RecoveryElapsed,
}

pub struct VoiceSurface {
    machine: VoiceMachine,
    messages: MessageLog,
    session: Session,
    backend: Arc<dyn Backend>,
    capture: Arc<dyn AudioCapture>,
    player: Arc<dyn AudioPlayer>,
    runtime: Handle,
    completions: CompletionChannel<Completion>,
    recording: Option<Box<dyn Recording>>,
    upload_file_name: String,
}

impl VoiceSurface {
    pub fn new(
        backend: Arc<dyn Backend>,
        capture: Arc<dyn AudioCapture>,
        player: Arc<dyn AudioPlayer>,
        runtime: Handle,
        config: &VoiceConfig,
    ) -> Self {
        Self {
            machine: VoiceMachine::new(config.error_recovery()),
            messages: MessageLog::new(),
            session: Session::new(),
            backend,
            capture,
            player,
            runtime,
            completions: CompletionChannel::new(),
            recording: None,
            upload_file_name: config.upload_file_name.clone(),
        }
    }

    pub fn state(&self) -> VoiceState {
        self.machine.state()
    }

    /// Microphone is being opened; the button stays in its idle look
    pub fn is_acquiring(&self) -> bool {
        self.machine.is_acquiring()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.machine.last_error()
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.as_slice()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.id()
    }

    /// Start a recording; ignored unless idle
    pub fn activate(&mut self) {
        self.dispatch(VoiceEvent::Activate);
    }

    /// Stop the recording and upload it; ignored unless recording
    pub fn deactivate(&mut self) {
        self.dispatch(VoiceEvent::Deactivate);
    }

    /// The single button: start when idle, stop when recording
    pub fn toggle(&mut self) {
        match self.machine.state() {
            VoiceState::Idle => self.activate(),
            VoiceState::Recording => self.deactivate(),
            state => debug!("Voice button inert while {}", state),
        }
    }

    /// Apply every completion that has arrived; returns how many were applied
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some((ticket, completion)) = self.completions.try_recv() {
            if self.apply(ticket, completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until one completion arrives; `false` on timeout or if it was stale
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.completions.recv_timeout(timeout) {
            Some((ticket, completion)) => self.apply(ticket, completion),
            None => false,
        }
    }

    /// Release the microphone, halt playback, clear log and session, return to idle.
    ///
    /// Work already started keeps running but its outcome is dropped.
    pub fn reset(&mut self) {
        info!("Voice reset from {}", self.machine.state());
        if let Some(recording) = self.recording.take() {
            drop(recording);
            debug!("Discarded active recording");
        }
        self.player.stop();
        self.messages.clear();
        self.session.reset();
        self.machine.reset();
    }

    fn apply(&mut self, ticket: Ticket, completion: Completion) -> bool {
        if !self.session.is_current(ticket) {
            debug!("Discarding voice completion issued before reset");
            // Dropping a late recording releases the device
            return false;
        }

        match completion {
            Completion::Acquired(Ok(recording)) => {
                self.dispatch(VoiceEvent::DeviceAcquired);
                if self.machine.state() == VoiceState::Recording {
                    info!("Recording started");
                    self.recording = Some(recording);
                } else {
                    warn!("Device acquired while {}, releasing", self.machine.state());
                }
            }
            Completion::Acquired(Err(e)) => {
                self.dispatch(VoiceEvent::DeviceUnavailable(e.to_string()));
            }
            Completion::Replied(Ok(reply)) => self.receive_reply(reply),
            Completion::Replied(Err(e)) => {
                self.dispatch(VoiceEvent::RequestFailed(e.to_string()));
            }
            Completion::PlaybackEnded => self.dispatch(VoiceEvent::PlaybackEnded),
            Completion::RecoveryElapsed => self.dispatch(VoiceEvent::RecoveryElapsed),
        }
        true
    }

    fn receive_reply(&mut self, reply: VoiceReply) {
        self.session.adopt(reply.session_id.clone());

        if let Some(transcript) = reply.transcript() {
            self.messages.push(Message::user(transcript));
        }
        self.messages.push(Message::assistant(reply.reply_text()));

        match reply.decode_audio() {
            Ok(audio) => self.dispatch(VoiceEvent::ReplyReceived { audio }),
            Err(e) => self.dispatch(VoiceEvent::RequestFailed(e.to_string())),
        }
    }

    fn dispatch(&mut self, event: VoiceEvent) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for effect in self.machine.handle(event) {
                if let Some(follow_up) = self.run(effect) {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    /// Start the work behind `effect`; returns an event to feed back at once
    /// when the effect could not even be started
    fn run(&mut self, effect: Effect) -> Option<VoiceEvent> {
        let ticket = self.session.issue();
        let tx = self.completions.sender();

        match effect {
            Effect::AcquireDevice => {
                let capture = Arc::clone(&self.capture);
                self.runtime.spawn_blocking(move || {
                    let _ = tx.send(ticket, Completion::Acquired(capture.open()));
                });
                None
            }
            Effect::FinishCapture => {
                let Some(recording) = self.recording.take() else {
                    error!("Asked to finish a recording that was never started");
                    return Some(VoiceEvent::RequestFailed(
                        "No recording in progress".to_string(),
                    ));
                };
                let backend = Arc::clone(&self.backend);
                let file_name = self.upload_file_name.clone();
                let session_id = self.session.id().map(str::to_string);
                self.runtime.spawn(async move {
                    let outcome = upload(backend, recording, file_name, session_id).await;
                    let _ = tx.send(ticket, Completion::Replied(outcome));
                });
                None
            }
            Effect::Play(audio) => match self.player.play(audio) {
                Ok(playback) => {
                    self.runtime.spawn_blocking(move || {
                        playback.wait();
                        let _ = tx.send(ticket, Completion::PlaybackEnded);
                    });
                    None
                }
                Err(e) => {
                    warn!("Playback could not start: {}", e);
                    Some(VoiceEvent::PlaybackEnded)
                }
            },
            Effect::ScheduleRecovery(delay) => {
                self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(ticket, Completion::RecoveryElapsed);
                });
                None
            }
        }
    }
}

/// Stop the device, encode what it captured and send it off
async fn upload(
    backend: Arc<dyn Backend>,
    recording: Box<dyn Recording>,
    file_name: String,
    session_id: Option<String>,
) -> Result<VoiceReply> {
    let audio = tokio::task::spawn_blocking(move || recording.finish())
        .await
        .map_err(|e| ParleyError::AudioProcessingError(format!("Capture task failed: {}", e)))??;
    info!("Uploading {:.1}s of audio", audio.duration_seconds());

    let wav = encode_wav(&audio)?;
    backend
        .voice(VoiceUpload {
            audio: wav,
            file_name,
            mime_type: WAV_MIME.to_string(),
            session_id,
        })
        .await
}
