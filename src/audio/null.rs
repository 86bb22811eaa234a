//! Silent output for hosts without an audio device.
//!
//! Keeps the play state and the installed callback so the lifecycle behaves
//! the same as with a real device; [`NullOutput::render`] pulls one buffer
//! through the callback on demand.

use log::debug;

use super::{AudioError, AudioOutput, AudioResult, FillCallback, StreamFormat};

pub struct NullOutput {
    format: StreamFormat,
    frames_per_buffer: usize,
    callback: Option<FillCallback>,
    playing: bool,
    closed: bool,
}

impl NullOutput {
    pub fn open(frames_per_buffer: u32, sample_rate: u32) -> Self {
        debug!(
            "Null audio output: {} frames at {} Hz",
            frames_per_buffer, sample_rate
        );
        Self {
            format: StreamFormat::stereo(sample_rate),
            frames_per_buffer: frames_per_buffer as usize,
            callback: None,
            playing: false,
            closed: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Produce one buffer the way a device would while playing.
    ///
    /// Silence when paused, closed or without a callback.
    pub fn render(&mut self) -> Vec<f32> {
        let mut buffer = vec![0.0; self.frames_per_buffer * usize::from(self.format.channels)];
        if self.playing && !self.closed {
            if let Some(callback) = self.callback.as_mut() {
                callback(&mut buffer, self.format);
            }
        }
        buffer
    }
}

impl AudioOutput for NullOutput {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn set_fill_callback(&mut self, callback: FillCallback) {
        self.callback = Some(callback);
    }

    fn pause(&mut self) -> AudioResult<()> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        self.playing = false;
        Ok(())
    }

    fn resume(&mut self) -> AudioResult<()> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        self.playing = true;
        Ok(())
    }

    fn close(&mut self) {
        self.playing = false;
        self.closed = true;
        self.callback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SineTone;

    #[test]
    fn silent_until_resumed() {
        let mut output = NullOutput::open(64, 48_000);
        output.set_fill_callback(SineTone::default().into_callback());
        assert!(output.render().iter().all(|s| *s == 0.0));

        output.resume().unwrap();
        let buffer = output.render();
        assert_eq!(buffer.len(), 128);
        assert!(buffer.iter().any(|s| *s != 0.0));

        output.pause().unwrap();
        assert!(output.render().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn closed_rejects_control() {
        let mut output = NullOutput::open(64, 48_000);
        output.close();
        output.close();
        assert!(output.is_closed());
        assert_eq!(output.resume(), Err(AudioError::Closed));
        assert_eq!(output.pause(), Err(AudioError::Closed));
    }
}
