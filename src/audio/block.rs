/// One capture callback's worth of mono `f32` samples, nominally in [-1.0, 1.0].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBlock {
    samples: Vec<f32>,
}

impl SampleBlock {
    /// Copy a capture buffer into a new block.
    ///
    /// Capture facilities reuse their buffers between callbacks, so the
    /// block must own its samples.
    pub fn from_slice(samples: &[f32]) -> Self {
        Self {
            samples: samples.to_vec(),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<f32>> for SampleBlock {
    fn from(samples: Vec<f32>) -> Self {
        Self { samples }
    }
}
