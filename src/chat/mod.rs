pub mod client;
pub mod conversation;
pub mod messages;
pub mod store;

pub use client::{AssistantReply, ChatClient};
pub use conversation::{Conversation, Message, Role};
pub use messages::{ChatReply, ChatRequest};
pub use store::{ReplyStore, StoredReply};
