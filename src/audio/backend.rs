use tokio::sync::mpsc;

use super::block::SampleBlock;
use super::wav::SAMPLE_RATE;
use crate::error::{Error, Result};

/// Configuration for capture sources
#[derive(Debug, Clone)]
pub struct AudioSourceConfig {
    /// Rate the source must deliver (no resampling is done downstream)
    pub sample_rate: u32,
    /// Samples per delivered block
    pub block_size: usize,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            block_size: 1024, // one script-processor callback
        }
    }
}

/// Audio capture source trait
///
/// Implementations:
/// - `CallbackSource`: fed by an external real-time callback through a `BlockSender`
/// - `FileSource`: replays a WAV file (for testing/batch processing)
///
/// Blocks are delivered in arrival order on an unbounded channel so a
/// real-time producer never has to wait or drop audio. The channel closes
/// once the source has nothing more to deliver.
#[async_trait::async_trait]
pub trait AudioSource: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive sample blocks
    async fn start(&mut self) -> Result<mpsc::UnboundedReceiver<SampleBlock>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if source is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Audio source type
#[derive(Debug, Clone)]
pub enum AudioSourceKind {
    /// Microphone input (needs a platform device backend)
    Microphone,
    /// File input (for testing/batch processing)
    File(String),
}

/// Audio source factory
pub struct AudioSourceFactory;

impl AudioSourceFactory {
    /// Create a capture source of the requested kind
    ///
    /// Callback-fed sources are built with [`super::CallbackSource::new`],
    /// which also hands back the paired `BlockSender`.
    pub fn create(kind: AudioSourceKind, config: AudioSourceConfig) -> Result<Box<dyn AudioSource>> {
        match kind {
            AudioSourceKind::Microphone => Err(Error::CaptureUnavailable(
                "No microphone backend is available on this platform".to_string(),
            )),

            AudioSourceKind::File(path) => {
                let source = super::file::FileSource::new(path, config);
                Ok(Box::new(source))
            }
        }
    }
}
