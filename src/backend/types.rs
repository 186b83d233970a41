//! Wire types for the chat and voice endpoints

use crate::messages::NO_RESPONSE_PLACEHOLDER;
use crate::{ParleyError, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Body of a chat request; `session_id` is empty until the backend issues one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatReply {
    /// Reply text: `message`, else `response`, else the placeholder
    pub fn text(&self) -> &str {
        first_non_empty(&[&self.message, &self.response]).unwrap_or(NO_RESPONSE_PLACEHOLDER)
    }
}

/// Recorded audio plus the session it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceUpload {
    pub audio: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceReply {
    /// What the backend heard
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub audio_base64: Option<String>,
}

impl VoiceReply {
    pub fn transcript(&self) -> Option<&str> {
        first_non_empty(&[&self.text])
    }

    pub fn reply_text(&self) -> &str {
        first_non_empty(&[&self.reply]).unwrap_or(NO_RESPONSE_PLACEHOLDER)
    }

    /// Decode the synthesized speech, if the backend sent any
    pub fn decode_audio(&self) -> Result<Option<Vec<u8>>> {
        match self.audio_base64.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(encoded) => BASE64_STANDARD
                .decode(encoded)
                .map(Some)
                .map_err(|e| ParleyError::DecodeError(format!("Invalid audio payload: {}", e))),
        }
    }
}

fn first_non_empty<'a>(fields: &[&'a Option<String>]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| field.as_deref())
        .find(|value| !value.is_empty())
}
