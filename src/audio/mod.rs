//! Audio output collaborator.
//!
//! The device pulls interleaved `f32` frames from a fill callback on a thread
//! it owns. The app thread only opens the device, installs the callback and
//! pauses/resumes it with the lifecycle.

mod null;
mod tone;

#[cfg(feature = "cpal-audio")]
mod cpal_backend;

use std::fmt;

pub use null::NullOutput;
pub use tone::SineTone;

#[cfg(feature = "cpal-audio")]
pub use cpal_backend::CpalOutput;

/// Channel count the device is opened with.
pub const OUTPUT_CHANNELS: u16 = 2;

/// Error types for audio output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No output device available
    NoDevice,
    /// The device rejected the requested stream parameters
    UnsupportedFormat(String),
    /// Stream could not be created
    StreamCreation(String),
    /// Play/pause request failed
    Playback(String),
    /// Device already closed
    Closed,
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice => write!(f, "No audio output device"),
            Self::UnsupportedFormat(msg) => write!(f, "Unsupported audio format: {}", msg),
            Self::StreamCreation(msg) => write!(f, "Audio stream creation failed: {}", msg),
            Self::Playback(msg) => write!(f, "Audio playback control failed: {}", msg),
            Self::Closed => write!(f, "Audio device is closed"),
        }
    }
}

impl std::error::Error for AudioError {}

pub type AudioResult<T> = Result<T, AudioError>;

/// Layout of the buffers handed to the fill callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub channels: u16,
    pub sample_rate: u32,
}

impl StreamFormat {
    pub const fn stereo(sample_rate: u32) -> Self {
        Self {
            channels: OUTPUT_CHANNELS,
            sample_rate,
        }
    }
}

/// Fills an interleaved buffer (`frames * channels` samples).
///
/// Runs on the device's own thread, never on the app thread.
pub type FillCallback = Box<dyn FnMut(&mut [f32], StreamFormat) + Send>;

/// Low-latency output device.
pub trait AudioOutput {
    fn format(&self) -> StreamFormat;

    /// Replace the fill callback. Until one is set the device plays silence.
    fn set_fill_callback(&mut self, callback: FillCallback);

    fn pause(&mut self) -> AudioResult<()>;

    fn resume(&mut self) -> AudioResult<()>;

    /// Stop the stream and release the device. Idempotent.
    fn close(&mut self);
}
