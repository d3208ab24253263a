// Source fed by an external real-time capture callback

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::backend::{AudioSource, AudioSourceConfig};
use super::block::SampleBlock;
use crate::error::Result;

type SenderSlot = Arc<Mutex<Option<mpsc::UnboundedSender<SampleBlock>>>>;

/// Handle given to the capture callback
///
/// Cloneable and cheap to call from the callback thread. Pushes are
/// ignored while the paired source is not capturing.
#[derive(Clone)]
pub struct BlockSender {
    slot: SenderSlot,
}

impl BlockSender {
    /// Copy one callback buffer into a block and forward it
    ///
    /// Returns false if the source is idle and the buffer was discarded.
    pub fn push(&self, samples: &[f32]) -> bool {
        let Ok(slot) = self.slot.lock() else {
            return false;
        };

        match slot.as_ref() {
            Some(tx) => tx.send(SampleBlock::from_slice(samples)).is_ok(),
            None => false,
        }
    }
}

/// Capture source whose blocks come from a [`BlockSender`]
pub struct CallbackSource {
    config: AudioSourceConfig,
    slot: SenderSlot,
    capturing: bool,
}

impl CallbackSource {
    pub fn new(config: AudioSourceConfig) -> (Self, BlockSender) {
        let slot: SenderSlot = Arc::new(Mutex::new(None));

        let source = Self {
            config,
            slot: Arc::clone(&slot),
            capturing: false,
        };

        (source, BlockSender { slot })
    }

    fn set_sender(&self, tx: Option<mpsc::UnboundedSender<SampleBlock>>) {
        // A poisoned slot only means a callback panicked mid-push
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = tx;
    }
}

#[async_trait::async_trait]
impl AudioSource for CallbackSource {
    async fn start(&mut self) -> Result<mpsc::UnboundedReceiver<SampleBlock>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.set_sender(Some(tx));
        self.capturing = true;

        info!(
            "Callback capture started ({}Hz, {} samples per block)",
            self.config.sample_rate, self.config.block_size
        );

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }

        // Dropping the sender closes the stream once buffered blocks are read
        self.set_sender(None);
        self.capturing = false;

        debug!("Callback capture stopped");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "callback"
    }
}
