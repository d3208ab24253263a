use serde::{Deserialize, Serialize};

/// Chat completion request sent to the multimodal service
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub modalities: Vec<String>,
    pub audio: AudioOutputConfig,
    pub messages: Vec<RequestMessage>,
}

/// Requested voice and format of the spoken reply
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioOutputConfig {
    pub voice: String,
    pub format: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    InputAudio { input_audio: InputAudio },
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct InputAudio {
    pub data: String,  // Base64-encoded WAV
    pub format: String,
}

/// Chat completion response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub audio: Option<AssistantAudio>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantAudio {
    #[serde(default)]
    pub id: Option<String>,
    pub data: String,  // Base64-encoded WAV
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Body accepted by `POST /api/chat`
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub audio: Option<String>,  // Base64-encoded WAV
}

/// Body returned by `POST /api/chat`
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub transcript: Option<String>,
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
}
