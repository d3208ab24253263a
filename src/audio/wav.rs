//! Canonical 16-bit mono PCM WAV encoding
//!
//! Layout (little-endian throughout):
//! - `RIFF` chunk: ID, size (36 + data length), `WAVE`
//! - `fmt ` chunk: size 16, PCM, 1 channel, 44100 Hz, byte rate, block align, 16 bits
//! - `data` chunk: ID, length, samples
//!
//! The header is always 44 bytes and the output is byte-for-byte
//! reproducible for identical input.

use base64::Engine;
use std::time::Duration;
use tracing::debug;

use super::block::SampleBlock;
use crate::error::{Error, Result};

/// Capture rate assumed for every recording
pub const SAMPLE_RATE: u32 = 44_100;
/// Mono
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;
/// Size of the RIFF + fmt + data chunk headers
pub const HEADER_LEN: usize = 44;

const BYTES_PER_SAMPLE: u16 = BITS_PER_SAMPLE / 8;
const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;

/// Quantize one normalized sample to signed 16-bit.
///
/// NaN maps to 0. Values are clamped to [-1.0, 1.0]; non-positive values
/// scale by 32768 and positive values by 32767, truncating toward zero.
pub fn quantize_sample(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }

    let s = f64::from(sample.clamp(-1.0, 1.0));
    let scaled = if s <= 0.0 { s * 32768.0 } else { s * 32767.0 };

    // `as` truncates toward zero; the clamp keeps it within i16
    scaled as i16
}

/// Fields of a canonical PCM WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Length of the data section in bytes
    pub data_len: u32,
}

impl WavHeader {
    /// Header for `sample_count` 16-bit mono samples at [`SAMPLE_RATE`].
    ///
    /// Lengths beyond what a RIFF size field can hold saturate at `u32::MAX`.
    pub fn pcm16_mono(sample_count: usize) -> Self {
        let data_len = sample_count
            .checked_mul(usize::from(BYTES_PER_SAMPLE))
            .and_then(|len| u32::try_from(len).ok())
            .unwrap_or(u32::MAX);

        Self {
            channels: CHANNELS,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: BITS_PER_SAMPLE,
            data_len,
        }
    }

    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        let chunk_len = self.data_len.saturating_add(36);

        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&chunk_len.to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        header[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_len.to_le_bytes());

        header
    }

    /// Read back a canonical 44-byte PCM header
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::InvalidAudio(format!(
                "WAV data too short: {} bytes",
                bytes.len()
            )));
        }

        let tag = |offset: usize, expected: &[u8; 4]| -> Result<()> {
            if &bytes[offset..offset + 4] == expected {
                Ok(())
            } else {
                Err(Error::InvalidAudio(format!(
                    "Expected {:?} at offset {}",
                    String::from_utf8_lossy(expected),
                    offset
                )))
            }
        };
        let u16_at = |offset: usize| u16::from_le_bytes([bytes[offset], bytes[offset + 1]]);
        let u32_at = |offset: usize| {
            u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        tag(0, b"RIFF")?;
        tag(8, b"WAVE")?;
        tag(12, b"fmt ")?;
        tag(36, b"data")?;

        if u32_at(16) != FMT_CHUNK_LEN || u16_at(20) != FORMAT_PCM {
            return Err(Error::InvalidAudio(
                "Only canonical linear PCM is supported".to_string(),
            ));
        }

        let header = Self {
            channels: u16_at(22),
            sample_rate: u32_at(24),
            bits_per_sample: u16_at(34),
            data_len: u32_at(40),
        };

        if header.bits_per_sample != BITS_PER_SAMPLE {
            return Err(Error::InvalidAudio(format!(
                "Expected 16-bit samples, got {}",
                header.bits_per_sample
            )));
        }

        Ok(header)
    }
}

/// A complete, self-describing WAV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    bytes: Vec<u8>,
}

impl EncodedAudio {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn header(&self) -> &[u8] {
        &self.bytes[..HEADER_LEN]
    }

    /// Quantized samples, 2 little-endian bytes each
    pub fn data(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the file carries no samples (header only)
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.data().len() / usize::from(BYTES_PER_SAMPLE)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.sample_count() as f64 / f64::from(SAMPLE_RATE))
    }

    /// Standard base64 (with padding), as sent to the chat service
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl AsRef<[u8]> for EncodedAudio {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encode a session's blocks, in order, into one WAV file
pub fn encode(blocks: &[SampleBlock]) -> EncodedAudio {
    let total_samples: usize = blocks.iter().map(SampleBlock::len).sum();
    encode_iter(total_samples, blocks.iter().flat_map(|b| b.samples().iter().copied()))
}

/// Encode an already-flat sample sequence
pub fn encode_samples(samples: &[f32]) -> EncodedAudio {
    encode_iter(samples.len(), samples.iter().copied())
}

fn encode_iter(total_samples: usize, samples: impl Iterator<Item = f32>) -> EncodedAudio {
    let header = WavHeader::pcm16_mono(total_samples);

    let mut bytes = Vec::with_capacity(HEADER_LEN + total_samples * usize::from(BYTES_PER_SAMPLE));
    bytes.extend_from_slice(&header.to_bytes());
    for sample in samples {
        bytes.extend_from_slice(&quantize_sample(sample).to_le_bytes());
    }

    debug!(
        "Encoded {} samples into {} bytes of WAV",
        total_samples,
        bytes.len()
    );

    EncodedAudio { bytes }
}
