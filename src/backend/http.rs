use super::types::{ChatReply, ChatRequest, VoiceReply, VoiceUpload};
use super::Backend;
use crate::config::BackendConfig;
use crate::{ParleyError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// [`Backend`] over HTTP: JSON for chat, multipart upload for voice
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    chat_url: String,
    voice_url: String,
    upload_field: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig, upload_field: impl Into<String>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ParleyError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        info!("Backend at {}", config.base_url);

        Ok(Self {
            client,
            chat_url: config.chat_url(),
            voice_url: config.voice_url(),
            upload_field: upload_field.into(),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            warn!("Backend answered with status {}", status);
            return Err(ParleyError::HttpStatus(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ParleyError::DecodeError(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        debug!(
            "POST {} ({} chars, session {:?})",
            self.chat_url,
            request.message.chars().count(),
            request.session_id
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn voice(&self, upload: VoiceUpload) -> Result<VoiceReply> {
        debug!(
            "POST {} ({} bytes of {}, session {:?})",
            self.voice_url,
            upload.audio.len(),
            upload.mime_type,
            upload.session_id
        );

        let part = Part::bytes(upload.audio)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| ParleyError::AudioProcessingError(format!("Invalid MIME type: {}", e)))?;

        let mut form = Form::new().part(self.upload_field.clone(), part);
        if let Some(session_id) = upload.session_id {
            form = form.text("session_id", session_id);
        }

        let response = self
            .client
            .post(&self.voice_url)
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }
}
