use base64::Engine;
use std::time::Duration;
use tracing::{info, warn};

use super::messages::{
    AudioOutputConfig, ChatCompletionRequest, ChatCompletionResponse, ContentPart, InputAudio,
    RequestMessage, Usage,
};
use crate::config::ChatConfig;
use crate::error::{Error, Result};

/// What the assistant sent back
#[derive(Debug, Clone)]
pub struct AssistantReply {
    /// Spoken transcript, or the text content when no audio was returned
    pub transcript: Option<String>,
    /// Decoded WAV bytes of the spoken reply
    pub audio: Option<Vec<u8>>,
    pub usage: Option<Usage>,
}

/// Client for the multimodal chat completions service
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: ChatConfig, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!("Chat client ready: {} ({})", config.endpoint, config.model);

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Build a client reading the API key from `config.api_key_env`
    pub fn from_env(config: ChatConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| Error::Config(format!("{} is not set", config.api_key_env)))?;

        Self::new(config, api_key)
    }

    /// Build the request body for one user turn
    pub fn build_request(&self, prompt: &str, audio_base64: Option<&str>) -> ChatCompletionRequest {
        let mut content = vec![ContentPart::Text {
            text: prompt.to_string(),
        }];

        if let Some(data) = audio_base64 {
            content.push(ContentPart::InputAudio {
                input_audio: InputAudio {
                    data: data.to_string(),
                    format: "wav".to_string(),
                },
            });
        }

        ChatCompletionRequest {
            model: self.config.model.clone(),
            modalities: vec!["text".to_string(), "audio".to_string()],
            audio: AudioOutputConfig {
                voice: self.config.voice.clone(),
                format: "wav".to_string(),
            },
            messages: vec![RequestMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }

    /// Send a prompt with optional base64 WAV audio and wait for the reply
    pub async fn complete(&self, prompt: &str, audio_base64: Option<&str>) -> Result<AssistantReply> {
        let request = self.build_request(prompt, audio_base64);

        info!(
            "Sending chat request (prompt={} chars, audio={} bytes base64)",
            prompt.len(),
            audio_base64.map_or(0, str::len)
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Chat service returned {}: {}", status, body);
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            info!(
                "Chat usage: prompt={} completion={} total={}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let usage = completion.usage;
        let message = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("Response has no choices".to_string()))?
            .message;

        match message.audio {
            Some(audio) => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(audio.data.as_bytes())
                    .map_err(|e| Error::InvalidResponse(format!("Bad reply audio: {}", e)))?;

                Ok(AssistantReply {
                    transcript: audio.transcript,
                    audio: Some(bytes),
                    usage,
                })
            }
            None => Ok(AssistantReply {
                transcript: message.content,
                audio: None,
                usage,
            }),
        }
    }
}
