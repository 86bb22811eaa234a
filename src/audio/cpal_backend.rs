//! Audio output on the platform's default device through `cpal`.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, Stream, StreamConfig};
use log::{debug, error, info};
use parking_lot::Mutex;

use super::{AudioError, AudioOutput, AudioResult, FillCallback, StreamFormat};

type SharedCallback = Arc<Mutex<Option<FillCallback>>>;

pub struct CpalOutput {
    stream: Option<Stream>,
    format: StreamFormat,
    callback: SharedCallback,
}

impl CpalOutput {
    /// Open a stereo `f32` stream. The stream starts paused.
    pub fn open(frames_per_buffer: u32, sample_rate: u32) -> AudioResult<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        if let Ok(name) = device.name() {
            info!("Audio output device: {}", name);
        }

        let format = StreamFormat::stereo(sample_rate);
        let config = StreamConfig {
            channels: format.channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: BufferSize::Fixed(frames_per_buffer),
        };

        let callback: SharedCallback = Arc::new(Mutex::new(None));
        let stream_callback = Arc::clone(&callback);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    match stream_callback.lock().as_mut() {
                        Some(fill) => fill(data, format),
                        None => data.fill(0.0),
                    }
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreation(e.to_string()))?;

        stream
            .pause()
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        debug!(
            "Audio stream opened: {} channels, {} Hz, {} frames per buffer",
            format.channels, sample_rate, frames_per_buffer
        );

        Ok(Self {
            stream: Some(stream),
            format,
            callback,
        })
    }

    fn stream(&self) -> AudioResult<&Stream> {
        self.stream.as_ref().ok_or(AudioError::Closed)
    }
}

impl AudioOutput for CpalOutput {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn set_fill_callback(&mut self, callback: FillCallback) {
        *self.callback.lock() = Some(callback);
    }

    fn pause(&mut self) -> AudioResult<()> {
        self.stream()?
            .pause()
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn resume(&mut self) -> AudioResult<()> {
        self.stream()?
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                debug!("Pausing audio stream on close failed: {}", e);
            }
            drop(stream);
            info!("Audio stream closed");
        }
        *self.callback.lock() = None;
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        self.close();
    }
}
