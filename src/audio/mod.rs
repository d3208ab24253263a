pub mod accumulator;
pub mod backend;
pub mod block;
pub mod callback;
pub mod file;
pub mod wav;

pub use accumulator::SampleAccumulator;
pub use backend::{AudioSource, AudioSourceConfig, AudioSourceFactory, AudioSourceKind};
pub use block::SampleBlock;
pub use callback::{BlockSender, CallbackSource};
pub use file::{AudioFile, FileSource};
pub use wav::{encode, encode_samples, quantize_sample, EncodedAudio, WavHeader};
