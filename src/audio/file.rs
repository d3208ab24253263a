use hound::{SampleFormat, WavReader};
use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::backend::{AudioSource, AudioSourceConfig};
use super::block::SampleBlock;
use crate::error::{Error, Result};

/// Decoded WAV file with samples normalized to [-1.0, 1.0]
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Interleaved when `channels > 1`
    pub samples: Vec<f32>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path)?;
        Self::read(reader, path.display().to_string())
    }

    /// Decode an in-memory WAV file (e.g. a chat reply)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes))?;
        Self::read(reader, "<memory>".to_string())
    }

    fn read<R: Read>(reader: WavReader<R>, path: String) -> Result<Self> {
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?,
            SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        let duration_seconds =
            samples.len() as f64 / (f64::from(spec.sample_rate) * f64::from(spec.channels));

        debug!(
            "Audio file decoded: {:.1}s, {}Hz, {} channels, {} bits, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            samples.len()
        );

        Ok(Self {
            path,
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            samples,
        })
    }

    /// Split the samples into consecutive blocks of `block_size`
    ///
    /// The last block may be shorter.
    pub fn blocks(&self, block_size: usize) -> Vec<SampleBlock> {
        self.samples
            .chunks(block_size.max(1))
            .map(SampleBlock::from_slice)
            .collect()
    }
}

/// Replays a mono WAV file as capture blocks
pub struct FileSource {
    path: String,
    config: AudioSourceConfig,
    realtime: bool,
    pacer: Option<JoinHandle<()>>,
    capturing: bool,
}

impl FileSource {
    pub fn new(path: impl Into<String>, config: AudioSourceConfig) -> Self {
        Self {
            path: path.into(),
            config,
            realtime: false,
            pacer: None,
            capturing: false,
        }
    }

    /// Deliver one block per block duration instead of all at once
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    fn load_blocks(&self) -> Result<Vec<SampleBlock>> {
        let audio = AudioFile::open(&self.path).map_err(|e| match e {
            Error::Io(io) => Error::CaptureUnavailable(format!("{}: {}", self.path, io)),
            other => other,
        })?;

        if audio.channels != 1 {
            return Err(Error::InvalidAudio(format!(
                "Expected mono input, got {} channels",
                audio.channels
            )));
        }

        if audio.sample_rate != self.config.sample_rate {
            return Err(Error::InvalidAudio(format!(
                "Expected {}Hz input, got {}Hz",
                self.config.sample_rate, audio.sample_rate
            )));
        }

        Ok(audio.blocks(self.config.block_size))
    }
}

#[async_trait::async_trait]
impl AudioSource for FileSource {
    async fn start(&mut self) -> Result<mpsc::UnboundedReceiver<SampleBlock>> {
        if self.capturing {
            return Err(Error::InvalidState("File source already started".to_string()));
        }

        let blocks = self.load_blocks()?;
        let (tx, rx) = mpsc::unbounded_channel();

        info!(
            "Replaying {} ({} blocks, realtime={})",
            self.path,
            blocks.len(),
            self.realtime
        );

        if self.realtime {
            let period = Duration::from_secs_f64(
                self.config.block_size.max(1) as f64 / f64::from(self.config.sample_rate),
            );

            self.pacer = Some(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                for block in blocks {
                    ticker.tick().await;
                    if tx.send(block).is_err() {
                        break;
                    }
                }
            }));
        } else {
            for block in blocks {
                // The receiver is still held locally, so this cannot fail
                let _ = tx.send(block);
            }
        }

        self.capturing = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(pacer) = self.pacer.take() {
            pacer.abort();
        }

        self.capturing = false;

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "file"
    }
}
