//! Collaborator factory.
//!
//! The host glue supplies a [`Platform`] at create time. It moves to the app
//! thread, which asks it for every collaborator while processing Create, so the
//! collaborators themselves never cross threads.

#[cfg(feature = "cpal-audio")]
use log::warn;

#[cfg(feature = "cpal-audio")]
use crate::audio::{AudioError, AudioResult};
use crate::audio::{AudioOutput, FillCallback, NullOutput, SineTone};
use crate::error::AppError;
use crate::graphics::GraphicsBinding;
use crate::overlay::DebugOverlay;
use crate::simulation::Simulation;

pub trait Platform: Send {
    fn graphics(&mut self) -> Result<Box<dyn GraphicsBinding>, AppError>;

    fn simulation(&mut self) -> Result<Box<dyn Simulation>, AppError>;

    fn overlay(&mut self) -> Result<Box<dyn DebugOverlay>, AppError>;

    /// Open the output device.
    ///
    /// With the `cpal-audio` feature this is the default device, falling back
    /// to the silent backend when none can be opened. Without it the silent
    /// backend is used.
    fn audio(
        &mut self,
        frames_per_buffer: u32,
        sample_rate: u32,
    ) -> Result<Box<dyn AudioOutput>, AppError> {
        open_default_audio(frames_per_buffer, sample_rate)
    }

    /// Callback installed on the audio device after it opens.
    fn fill_callback(&mut self) -> FillCallback {
        SineTone::default().into_callback()
    }
}

/// Open the default output device through `cpal`, or [`NullOutput`] when no
/// device is usable.
///
/// # Errors
/// Playback control failures other than a missing device or stream.
#[cfg(feature = "cpal-audio")]
pub fn open_default_audio(
    frames_per_buffer: u32,
    sample_rate: u32,
) -> Result<Box<dyn AudioOutput>, AppError> {
    open_or_silent(crate::audio::CpalOutput::open(frames_per_buffer, sample_rate), || {
        NullOutput::open(frames_per_buffer, sample_rate)
    })
}

#[cfg(not(feature = "cpal-audio"))]
pub fn open_default_audio(
    frames_per_buffer: u32,
    sample_rate: u32,
) -> Result<Box<dyn AudioOutput>, AppError> {
    Ok(Box::new(NullOutput::open(frames_per_buffer, sample_rate)))
}

#[cfg(feature = "cpal-audio")]
fn open_or_silent<O: AudioOutput + 'static>(
    opened: AudioResult<O>,
    silent: impl FnOnce() -> NullOutput,
) -> Result<Box<dyn AudioOutput>, AppError> {
    match opened {
        Ok(output) => Ok(Box::new(output)),
        Err(e @ (AudioError::NoDevice | AudioError::StreamCreation(_))) => {
            warn!("{}, audio disabled", e);
            Ok(Box::new(silent()))
        }
        Err(e) => Err(e.into()),
    }
}
