//! Backend collaborator
//!
//! The assistant itself lives behind two HTTP endpoints. The surfaces only
//! see the [`Backend`] trait so tests and alternate transports can stand in.

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{ChatReply, ChatRequest, VoiceReply, VoiceUpload};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one chat message and wait for the reply
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply>;

    /// Upload one recording and wait for transcript, reply and speech
    async fn voice(&self, upload: VoiceUpload) -> Result<VoiceReply>;
}
