//! Shared recording collaborators for the integration tests.
//!
//! Each collaborator appends a [`Call`] to a [`Recorder`] shared with the test
//! thread, so the test can observe what the app thread did.

#![allow(dead_code)]

use std::ffi::c_void;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use emptyapp_native::audio::{AudioOutput, AudioResult, FillCallback, StreamFormat};
use emptyapp_native::event::{InputEvent, MotionAction};
use emptyapp_native::graphics::{
    ConfigHandle, ContextHandle, DisplayHandle, GraphicsBinding, GraphicsError, GraphicsResult,
    SurfaceAttribs, SurfaceHandle,
};
use emptyapp_native::overlay::{DebugOverlay, OverlayOutput};
use emptyapp_native::simulation::{FrameInputs, Simulation};
use emptyapp_native::{AppConfig, AppError, NativeWindow, Platform};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateContext,
    CreateSurface(usize),
    DestroySurface,
    DestroyContext,
    Terminate,
    Swap,
    SwapInterval(i32),
    LoadGpu,
    UnloadGpu,
    Update(FrameInputs),
    SimDestroy,
    OverlayBind(usize),
    OverlayUnbind,
    Key(i32),
    Char(u32),
    Touch(MotionAction, i32, i32),
    OverlayRender,
    Resized(i32, i32),
    OverlayShutdown,
    AudioOpen(u32, u32),
    AudioPause,
    AudioResume,
    AudioClose,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Call>>>);

impl Recorder {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|c| pred(c)).count()
    }

    pub fn swaps(&self) -> usize {
        self.count(|c| *c == Call::Swap)
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.0.lock().contains(call)
    }

    pub fn last_update(&self) -> Option<FrameInputs> {
        self.0.lock().iter().rev().find_map(|c| match c {
            Call::Update(inputs) => Some(*inputs),
            _ => None,
        })
    }

    pub fn touches(&self) -> Vec<(MotionAction, i32, i32)> {
        self.0
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Touch(action, x, y) => Some((*action, *x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Poll until `pred` holds, panicking after a few seconds.
    pub fn wait_until(&self, what: &str, pred: impl Fn(&Recorder) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pred(self) {
            assert!(Instant::now() < deadline, "timed out waiting for {}", what);
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

pub fn window(raw: usize) -> NativeWindow {
    NativeWindow::from_raw(raw as *mut c_void).expect("non-null window")
}

/// Config for tests: current directory stays where it is.
pub fn test_config() -> AppConfig {
    AppConfig {
        files_dir: ".".into(),
        event_queue_capacity: 16,
        ..AppConfig::default()
    }
}

struct RecordingBinding {
    rec: Recorder,
    fail_context: bool,
}

impl GraphicsBinding for RecordingBinding {
    fn create_display_connection(&mut self) -> GraphicsResult<DisplayHandle> {
        Ok(DisplayHandle::new(1))
    }

    fn choose_config(
        &mut self,
        _display: DisplayHandle,
        _attribs: &SurfaceAttribs,
    ) -> GraphicsResult<ConfigHandle> {
        Ok(ConfigHandle::new(1))
    }

    fn create_context(
        &mut self,
        _display: DisplayHandle,
        _config: ConfigHandle,
        _client_version: u8,
    ) -> GraphicsResult<ContextHandle> {
        self.rec.push(Call::CreateContext);
        if self.fail_context {
            return Err(GraphicsError::NoMatchingConfig);
        }
        Ok(ContextHandle::new(1))
    }

    fn create_window_surface(
        &mut self,
        _display: DisplayHandle,
        _config: ConfigHandle,
        window: NativeWindow,
    ) -> GraphicsResult<SurfaceHandle> {
        self.rec.push(Call::CreateSurface(window.as_ptr() as usize));
        Ok(SurfaceHandle::new(window.as_ptr() as usize))
    }

    fn make_current(
        &mut self,
        _display: DisplayHandle,
        _surface: Option<SurfaceHandle>,
        _context: Option<ContextHandle>,
    ) -> GraphicsResult<()> {
        Ok(())
    }

    fn destroy_surface(&mut self, _display: DisplayHandle, _surface: SurfaceHandle) {
        self.rec.push(Call::DestroySurface);
    }

    fn destroy_context(&mut self, _display: DisplayHandle, _context: ContextHandle) {
        self.rec.push(Call::DestroyContext);
    }

    fn terminate(&mut self, _display: DisplayHandle) {
        self.rec.push(Call::Terminate);
    }

    fn swap_buffers(&mut self, _display: DisplayHandle, _surface: SurfaceHandle) -> GraphicsResult<()> {
        self.rec.push(Call::Swap);
        Ok(())
    }

    fn set_swap_interval(&mut self, _display: DisplayHandle, interval: i32) {
        self.rec.push(Call::SwapInterval(interval));
    }

    fn get_proc_address(&self, _name: &str) -> *const c_void {
        std::ptr::null()
    }
}

struct RecordingSimulation(Recorder);

impl Simulation for RecordingSimulation {
    fn load_gpu_resources(&mut self) {
        self.0.push(Call::LoadGpu);
    }

    fn unload_gpu_resources(&mut self) {
        self.0.push(Call::UnloadGpu);
    }

    fn update(&mut self, inputs: &FrameInputs) {
        self.0.push(Call::Update(*inputs));
    }

    fn destroy(&mut self) {
        self.0.push(Call::SimDestroy);
    }
}

struct RecordingOverlay {
    rec: Recorder,
    flags: Arc<Mutex<OverlayOutput>>,
    consume_keys: bool,
}

impl DebugOverlay for RecordingOverlay {
    fn output_flags(&self) -> OverlayOutput {
        *self.flags.lock()
    }

    fn bind_to_window(&mut self, window: NativeWindow) {
        self.rec.push(Call::OverlayBind(window.as_ptr() as usize));
    }

    fn unbind_from_window(&mut self) {
        self.rec.push(Call::OverlayUnbind);
    }

    fn handle_input_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                self.rec.push(Call::Key(key.key_code));
                self.consume_keys
            }
            InputEvent::Motion(motion) => {
                let (x, y) = motion.primary().unwrap_or_default();
                self.rec.push(Call::Touch(motion.action, x, y));
                false
            }
        }
    }

    fn inject_unicode_char(&mut self, codepoint: u32) {
        self.rec.push(Call::Char(codepoint));
    }

    fn update_and_render(&mut self) {
        self.rec.push(Call::OverlayRender);
    }

    fn notify_resized(&mut self, width: i32, height: i32) {
        self.rec.push(Call::Resized(width, height));
    }

    fn shutdown(&mut self) {
        self.rec.push(Call::OverlayShutdown);
    }
}

struct RecordingAudio(Recorder);

impl AudioOutput for RecordingAudio {
    fn format(&self) -> StreamFormat {
        StreamFormat::stereo(48_000)
    }

    fn set_fill_callback(&mut self, _callback: FillCallback) {}

    fn pause(&mut self) -> AudioResult<()> {
        self.0.push(Call::AudioPause);
        Ok(())
    }

    fn resume(&mut self) -> AudioResult<()> {
        self.0.push(Call::AudioResume);
        Ok(())
    }

    fn close(&mut self) {
        self.0.push(Call::AudioClose);
    }
}

/// Platform building the recording collaborators.
#[derive(Clone, Default)]
pub struct TestPlatform {
    pub rec: Recorder,
    pub overlay_flags: Arc<Mutex<OverlayOutput>>,
    pub consume_keys: bool,
    pub fail_context: bool,
    pub fail_simulation: bool,
}

impl TestPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn Platform> {
        Box::new(self.clone())
    }
}

impl Platform for TestPlatform {
    fn graphics(&mut self) -> Result<Box<dyn GraphicsBinding>, AppError> {
        Ok(Box::new(RecordingBinding {
            rec: self.rec.clone(),
            fail_context: self.fail_context,
        }))
    }

    fn simulation(&mut self) -> Result<Box<dyn Simulation>, AppError> {
        if self.fail_simulation {
            return Err(AppError::collaborator("simulation", "no shaders"));
        }
        Ok(Box::new(RecordingSimulation(self.rec.clone())))
    }

    fn overlay(&mut self) -> Result<Box<dyn DebugOverlay>, AppError> {
        Ok(Box::new(RecordingOverlay {
            rec: self.rec.clone(),
            flags: Arc::clone(&self.overlay_flags),
            consume_keys: self.consume_keys,
        }))
    }

    fn audio(
        &mut self,
        frames_per_buffer: u32,
        sample_rate: u32,
    ) -> Result<Box<dyn AudioOutput>, AppError> {
        self.rec.push(Call::AudioOpen(frames_per_buffer, sample_rate));
        Ok(Box::new(RecordingAudio(self.rec.clone())))
    }
}
