//! Recording session management
//!
//! The `Recorder` owns the capture source and the sample accumulator for
//! one session at a time and turns a finished session into WAV bytes.

mod session;

pub use session::{format_timer, Recorder, RecorderState, Recording};
