// The audio capability consumed by the animation driver.
//
// An `AudioSink` is created once by the embedding program, handed to the
// driver by value, and closed when the driver shuts down. `play()` is
// fire-and-forget from the driver's point of view: an error is logged and
// the animation carries on.

use thiserror::Error;

use crate::note::Pitch;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink is already closed")]
    Closed,

    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Something that can sound a pitch at a gain in `0.0..=1.0`.
pub trait AudioSink: Send {
    fn play(&mut self, pitch: Pitch, gain: f32) -> Result<(), PlaybackError>;

    /// Release the backend. Called once at shutdown.
    fn close(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Accepts every note and discards it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _pitch: Pitch, _gain: f32) -> Result<(), PlaybackError> {
        Ok(())
    }
}
