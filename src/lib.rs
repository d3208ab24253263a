pub mod audio;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod recording;

pub use audio::{
    encode, encode_samples, quantize_sample, AudioFile, AudioSource, AudioSourceConfig,
    AudioSourceFactory, AudioSourceKind, BlockSender, CallbackSource, EncodedAudio, FileSource,
    SampleAccumulator, SampleBlock, WavHeader,
};
pub use chat::{AssistantReply, ChatClient, Conversation, Message, ReplyStore, Role};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{create_router, AppState};
pub use recording::{Recorder, RecorderState, Recording};
