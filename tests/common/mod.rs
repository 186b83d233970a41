//! Fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use parley::audio::{AudioCapture, AudioPlayer, CapturedAudio, Playback, Recording};
use parley::backend::{Backend, ChatReply, ChatRequest, VoiceReply, VoiceUpload};
use parley::{ParleyError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Backend answering from queues; records every request it sees
#[derive(Default)]
pub struct FakeBackend {
    chat_replies: Mutex<VecDeque<Result<ChatReply>>>,
    voice_replies: Mutex<VecDeque<Result<VoiceReply>>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub voice_uploads: Mutex<Vec<VoiceUpload>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_chat(&self, reply: Result<ChatReply>) {
        self.chat_replies.lock().push_back(reply);
    }

    pub fn push_voice(&self, reply: Result<VoiceReply>) {
        self.voice_replies.lock().push_back(reply);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        self.chat_requests.lock().push(request);
        self.chat_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ParleyError::HttpError("Failed to fetch".to_string())))
    }

    async fn voice(&self, upload: VoiceUpload) -> Result<VoiceReply> {
        self.voice_uploads.lock().push(upload);
        self.voice_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ParleyError::HttpError("Failed to fetch".to_string())))
    }
}

pub fn chat_reply(message: &str, session_id: Option<&str>) -> ChatReply {
    ChatReply {
        message: Some(message.to_string()),
        response: None,
        session_id: session_id.map(str::to_string),
    }
}

/// Microphone stand-in that hands out a short tone and tracks open recordings
#[derive(Default)]
pub struct FakeCapture {
    pub opened: AtomicUsize,
    pub live: Arc<AtomicUsize>,
}

impl FakeCapture {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct FakeRecording {
    live: Arc<AtomicUsize>,
}

impl AudioCapture for FakeCapture {
    fn open(&self) -> Result<Box<dyn Recording>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeRecording {
            live: Arc::clone(&self.live),
        }))
    }
}

impl Recording for FakeRecording {
    fn finish(self: Box<Self>) -> Result<CapturedAudio> {
        let samples = (0..1600)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();
        Ok(CapturedAudio::new(samples, 16000, 1))
    }
}

impl Drop for FakeRecording {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Player that "plays" for a fixed time and remembers what it was given
pub struct FakePlayer {
    duration: Duration,
    pub played: Mutex<Vec<Vec<u8>>>,
    pub stops: AtomicUsize,
}

impl FakePlayer {
    pub fn new(duration: Duration) -> Arc<Self> {
        Arc::new(Self {
            duration,
            played: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
        })
    }
}

struct TimedPlayback(Duration);

impl Playback for TimedPlayback {
    fn wait(self: Box<Self>) {
        std::thread::sleep(self.0);
    }
}

impl AudioPlayer for FakePlayer {
    fn play(&self, encoded: Vec<u8>) -> Result<Box<dyn Playback>> {
        self.played.lock().push(encoded);
        Ok(Box::new(TimedPlayback(self.duration)))
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
