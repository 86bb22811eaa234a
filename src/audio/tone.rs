//! Test tone generator, the default fill callback.

use std::f32::consts::TAU;

use super::{FillCallback, StreamFormat};

pub const DEFAULT_FREQUENCY: f32 = 220.0;
pub const DEFAULT_VOLUME: f32 = 0.2;

/// Sine wave written to every channel of each frame.
///
/// The phase carries over between buffers so consecutive callbacks produce a
/// continuous waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineTone {
    frequency: f32,
    volume: f32,
    /// Position within the current period, in [0, 1).
    phase: f32,
}

impl SineTone {
    pub fn new(frequency: f32, volume: f32) -> Self {
        Self {
            frequency,
            volume,
            phase: 0.0,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn fill(&mut self, buffer: &mut [f32], format: StreamFormat) {
        let channels = usize::from(format.channels.max(1));
        if format.sample_rate == 0 {
            buffer.fill(0.0);
            return;
        }
        let step = self.frequency / format.sample_rate as f32;

        for frame in buffer.chunks_mut(channels) {
            let sample = (self.phase * TAU).sin() * self.volume;
            self.phase = (self.phase + step) % 1.0;
            frame.fill(sample);
        }
    }

    pub fn into_callback(mut self) -> FillCallback {
        Box::new(move |buffer, format| self.fill(buffer, format))
    }
}

impl Default for SineTone {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY, DEFAULT_VOLUME)
    }
}
