use crate::chat::{ChatClient, ReplyStore};
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Service name reported by the health check
    pub service_name: String,

    /// Upstream multimodal chat service
    pub chat: Arc<ChatClient>,

    /// Where reply audio is written and served from
    pub replies: Arc<ReplyStore>,
}

impl AppState {
    pub fn new(service_name: impl Into<String>, chat: ChatClient, replies: ReplyStore) -> Self {
        Self {
            service_name: service_name.into(),
            chat: Arc::new(chat),
            replies: Arc::new(replies),
        }
    }
}
