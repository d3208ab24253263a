use tracing::debug;

use super::block::SampleBlock;

/// Retains the sample blocks of one recording session in arrival order.
///
/// Not synchronized: the owning [`Recorder`](crate::recording::Recorder)
/// is the only writer, and it never appends while draining.
#[derive(Debug, Default)]
pub struct SampleAccumulator {
    blocks: Vec<SampleBlock>,
    total_samples: usize,
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all retained blocks at the start of a new session
    pub fn reset(&mut self) {
        if self.blocks.is_empty() {
            return;
        }

        debug!(
            "Discarding {} blocks ({} samples)",
            self.blocks.len(),
            self.total_samples
        );

        self.blocks.clear();
        self.total_samples = 0;
    }

    /// Store a block at the end of the session
    pub fn append(&mut self, block: SampleBlock) {
        if block.is_empty() {
            return;
        }

        self.total_samples += block.len();
        self.blocks.push(block);
    }

    /// Hand over every retained block, leaving the accumulator empty
    pub fn drain(&mut self) -> Vec<SampleBlock> {
        self.total_samples = 0;
        std::mem::take(&mut self.blocks)
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
