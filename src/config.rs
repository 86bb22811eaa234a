use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::graphics::SurfaceAttribs;
use crate::logging::LogLevel;

/// Default event queue depth, large enough for a burst of touch events
/// between two frames.
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 64;

/// Fixed simulation step used when the host does not supply one.
pub const DEFAULT_FRAME_DELTA: f32 = 1.0 / 60.0;

/// Startup configuration handed over by the host at Create time.
///
/// The first three fields come from the host activity; the remaining ones are
/// tuning knobs with defaults matching a stock phone setup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// App-private files directory; becomes the working directory.
    pub files_dir: PathBuf,
    pub audio_sample_rate: u32,
    pub audio_frames_per_buffer: u32,

    pub event_queue_capacity: usize,
    pub frame_delta_seconds: f32,
    /// Swap interval applied after every surface bind (1 = vsync).
    pub swap_interval: i32,
    /// Color the back buffer is cleared to after each present.
    pub clear_color: [f32; 4],
    pub surface: SurfaceAttribs,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            files_dir: PathBuf::from("."),
            audio_sample_rate: 48_000,
            audio_frames_per_buffer: 192,
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            frame_delta_seconds: DEFAULT_FRAME_DELTA,
            swap_interval: 1,
            clear_color: [0.2, 0.2, 0.2, 1.0],
            surface: SurfaceAttribs::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// Build a configuration from the raw values the host activity reports.
    ///
    /// Android reports the audio properties as signed integers; zero or negative
    /// values mean the property could not be queried and are rejected.
    pub fn from_host(files_dir: &str, sample_rate: i32, frames_per_buffer: i32) -> Result<Self> {
        if files_dir.trim().is_empty() {
            anyhow::bail!("Files directory must not be empty");
        }
        let audio_sample_rate =
            parse_positive(sample_rate).context("Invalid audio output sample rate")?;
        let audio_frames_per_buffer =
            parse_positive(frames_per_buffer).context("Invalid audio frames per buffer")?;

        Ok(Self {
            files_dir: PathBuf::from(files_dir),
            audio_sample_rate,
            audio_frames_per_buffer,
            ..Self::default()
        })
    }

    /// Check the tuning values for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.event_queue_capacity == 0 {
            anyhow::bail!("Event queue capacity must be at least 1");
        }
        if !(self.frame_delta_seconds.is_finite() && self.frame_delta_seconds > 0.0) {
            anyhow::bail!(
                "Frame delta must be a positive number of seconds, got {}",
                self.frame_delta_seconds
            );
        }
        if self.swap_interval < 0 {
            anyhow::bail!("Swap interval must not be negative");
        }
        if self.audio_sample_rate == 0 || self.audio_frames_per_buffer == 0 {
            anyhow::bail!("Audio sample rate and buffer size must be positive");
        }
        Ok(())
    }

    /// Change the process working directory to `files_dir`.
    pub fn apply_working_dir(&self) -> Result<()> {
        change_dir(&self.files_dir)
    }
}

fn parse_positive(value: i32) -> Result<u32> {
    if value <= 0 {
        anyhow::bail!("Value must be positive, got {}", value);
    }
    Ok(value as u32)
}

fn change_dir(dir: &Path) -> Result<()> {
    log::debug!("chdir to '{}'", dir.display());
    std::env::set_current_dir(dir)
        .with_context(|| format!("Failed to change directory to '{}'", dir.display()))
}
