use serde::{Deserialize, Serialize};
use tracing::info;

use super::client::ChatClient;
use super::store::ReplyStore;
use crate::audio::EncodedAudio;
use crate::error::{Error, Result};

const AUDIO_ONLY_REPLY: &str = "Audio response received";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the message list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Where the message's audio can be played from, if any
    pub audio: Option<String>,
}

/// Ordered message history of a chat
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>, audio: Option<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
            audio,
        });
    }

    /// Send one user turn and record the assistant's answer
    ///
    /// The user message is recorded before the request goes out, so it
    /// stays in the history even if the exchange fails. `user_audio_label`
    /// names where the recording can be replayed locally.
    pub async fn exchange(
        &mut self,
        client: &ChatClient,
        store: &ReplyStore,
        prompt: &str,
        recording: Option<&EncodedAudio>,
        user_audio_label: Option<String>,
    ) -> Result<&Message> {
        if prompt.trim().is_empty() && recording.is_none() {
            return Err(Error::EmptyMessage);
        }

        self.push(Role::User, prompt, user_audio_label);

        let audio_base64 = recording.map(EncodedAudio::to_base64);
        let reply = client.complete(prompt, audio_base64.as_deref()).await?;

        let audio_url = match &reply.audio {
            Some(bytes) => Some(store.save(bytes).await?.url),
            None => None,
        };

        let content = reply
            .transcript
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| AUDIO_ONLY_REPLY.to_string());

        info!("Assistant replied ({} chars, audio={})", content.len(), audio_url.is_some());

        self.push(Role::Assistant, content, audio_url);

        // Just pushed
        Ok(&self.messages[self.messages.len() - 1])
    }
}
