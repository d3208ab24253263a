use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::audio::{encode, AudioSource, EncodedAudio, SampleAccumulator, SampleBlock};
use crate::error::{Error, Result};

/// Observable recorder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// A finished recording
#[derive(Debug, Clone)]
pub struct Recording {
    pub session_id: String,
    pub audio: EncodedAudio,
    /// Wall-clock time between start and stop
    pub duration: Duration,
    pub block_count: usize,
}

struct ActiveCapture {
    session_id: String,
    source: Box<dyn AudioSource>,
    blocks: mpsc::UnboundedReceiver<SampleBlock>,
    started_at: Instant,
}

enum State {
    Idle,
    Recording(ActiveCapture),
}

/// Owns one recording session at a time: `Idle -> Recording -> Idle`
///
/// Runs on a single task. Blocks are moved from the source's stream into
/// the accumulator by `pump`/`capture_to_end`, and `stop` encodes the
/// session exactly once.
pub struct Recorder {
    accumulator: SampleAccumulator,
    state: State,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            accumulator: SampleAccumulator::new(),
            state: State::Idle,
        }
    }

    pub fn state(&self) -> RecorderState {
        match self.state {
            State::Idle => RecorderState::Idle,
            State::Recording(_) => RecorderState::Recording,
        }
    }

    /// Start a new session on `source`, returning its ID
    pub async fn start(&mut self, mut source: Box<dyn AudioSource>) -> Result<String> {
        if let State::Recording(active) = &self.state {
            return Err(Error::InvalidState(format!(
                "Session {} is already recording",
                active.session_id
            )));
        }

        self.accumulator.reset();

        let blocks = source.start().await?;
        let session_id = format!("rec-{}", uuid::Uuid::new_v4());

        info!("Recording {} started on {} source", session_id, source.name());

        self.state = State::Recording(ActiveCapture {
            session_id: session_id.clone(),
            source,
            blocks,
            started_at: Instant::now(),
        });

        Ok(session_id)
    }

    /// Move every block delivered so far into the session without waiting
    ///
    /// Returns the number of blocks taken.
    pub fn pump(&mut self) -> usize {
        let State::Recording(active) = &mut self.state else {
            return 0;
        };

        let mut taken = 0;
        while let Ok(block) = active.blocks.try_recv() {
            self.accumulator.append(block);
            taken += 1;
        }

        if taken > 0 {
            debug!(
                "Pumped {} blocks ({} samples total)",
                taken,
                self.accumulator.total_samples()
            );
        }

        taken
    }

    /// Wait until the source closes its stream, collecting every block
    pub async fn capture_to_end(&mut self) -> Result<()> {
        let State::Recording(active) = &mut self.state else {
            return Err(Error::InvalidState("Not recording".to_string()));
        };

        while let Some(block) = active.blocks.recv().await {
            self.accumulator.append(block);
        }

        debug!(
            "Source stream ended ({} samples total)",
            self.accumulator.total_samples()
        );

        Ok(())
    }

    /// Time since the current session started
    pub fn elapsed(&self) -> Option<Duration> {
        match &self.state {
            State::Recording(active) => Some(active.started_at.elapsed()),
            State::Idle => None,
        }
    }

    /// Recording timer as `MM:SS`
    pub fn timer_display(&self) -> Option<String> {
        self.elapsed().map(format_timer)
    }

    /// Stop the session and encode everything captured
    pub async fn stop(&mut self) -> Result<Recording> {
        let State::Recording(mut active) = std::mem::replace(&mut self.state, State::Idle) else {
            return Err(Error::InvalidState("Not recording".to_string()));
        };

        let duration = active.started_at.elapsed();

        if let Err(e) = active.source.stop().await {
            warn!("Failed to stop {} source: {}", active.source.name(), e);
        }

        // Refuse further sends, then take what is already buffered
        active.blocks.close();
        while let Some(block) = active.blocks.recv().await {
            self.accumulator.append(block);
        }

        let blocks = self.accumulator.drain();
        let audio = encode(&blocks);

        info!(
            "Recording {} stopped after {}: {} blocks, {} samples, {} bytes",
            active.session_id,
            format_timer(duration),
            blocks.len(),
            audio.sample_count(),
            audio.len()
        );

        Ok(Recording {
            session_id: active.session_id,
            audio,
            duration,
            block_count: blocks.len(),
        })
    }

    /// Stop the session and discard what was captured
    pub async fn cancel(&mut self) -> Result<()> {
        let State::Recording(mut active) = std::mem::replace(&mut self.state, State::Idle) else {
            return Ok(());
        };

        if let Err(e) = active.source.stop().await {
            warn!("Failed to stop {} source: {}", active.source.name(), e);
        }

        self.accumulator.reset();

        info!("Recording {} cancelled", active.session_id);

        Ok(())
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Format whole elapsed seconds as `MM:SS`
pub fn format_timer(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
