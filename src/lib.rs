pub mod audio;
pub mod backend;
pub mod chat;
pub mod config;
pub mod messages;
pub mod session;
pub mod ui;
pub mod utils;
pub mod voice;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParleyError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("{0}")]
    HttpError(String),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("Response decode error: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message exceeds maximum length of {max} characters")]
    MessageTooLong { max: usize },

    #[error("A request is already in flight")]
    RequestInFlight,
}

impl From<std::io::Error> for ParleyError {
    fn from(e: std::io::Error) -> Self {
        ParleyError::AudioProcessingError(e.to_string())
    }
}

impl From<reqwest::Error> for ParleyError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ParleyError::HttpStatus(status.as_u16()),
            None if e.is_decode() => ParleyError::DecodeError(e.to_string()),
            None => ParleyError::HttpError(e.to_string()),
        }
    }
}

impl ParleyError {
    /// Check if the user can simply try again
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Permission or hardware problems need user intervention
            ParleyError::AudioDeviceError(_) => false,
            ParleyError::AudioProcessingError(_) => true,
            ParleyError::HttpError(_) => true,
            ParleyError::HttpStatus(status) => *status >= 500 || *status == 429,
            ParleyError::DecodeError(_) => true,
            ParleyError::ConfigError(_) => false,
            ParleyError::ChannelError(_) => false,
            ParleyError::EmptyMessage => true,
            ParleyError::MessageTooLong { .. } => true,
            ParleyError::RequestInFlight => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ParleyError::AudioDeviceError(_) => {
                "Microphone unavailable. Please check permissions and devices.".to_string()
            }
            ParleyError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            ParleyError::HttpError(_) | ParleyError::HttpStatus(_) => {
                "Could not reach the assistant. Please try again.".to_string()
            }
            ParleyError::DecodeError(_) => {
                "The assistant sent a response that could not be read.".to_string()
            }
            ParleyError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            ParleyError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            ParleyError::EmptyMessage => "Type a message first.".to_string(),
            ParleyError::MessageTooLong { max } => {
                format!("Messages are limited to {} characters.", max)
            }
            ParleyError::RequestInFlight => {
                "Please wait for the current response.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
