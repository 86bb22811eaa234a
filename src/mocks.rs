//! Recording collaborators for unit tests.
//!
//! Every call is appended to a shared [`CallLog`] as a short string so tests
//! can assert on order and counts.

use std::ffi::c_void;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::audio::{AudioOutput, AudioResult, FillCallback, StreamFormat};
use crate::error::AppError;
use crate::event::{InputEvent, NativeWindow};
use crate::graphics::{
    ConfigHandle, ContextHandle, DisplayHandle, GraphicsBinding, GraphicsError, GraphicsResult,
    SurfaceAttribs, SurfaceHandle,
};
use crate::overlay::{DebugOverlay, OverlayOutput};
use crate::platform::Platform;
use crate::simulation::{FrameInputs, Simulation};

#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| e.as_str() == entry).count()
    }

    pub(crate) fn contains(&self, entry: &str) -> bool {
        self.count(entry) > 0
    }

    /// Index of the first matching entry.
    pub(crate) fn position(&self, entry: &str) -> Option<usize> {
        self.0.lock().iter().position(|e| e.as_str() == entry)
    }

    pub(crate) fn clear(&self) {
        self.0.lock().clear();
    }
}

pub(crate) fn window(raw: usize) -> NativeWindow {
    NativeWindow::from_raw(raw as *mut c_void).unwrap()
}

struct MockBinding {
    log: CallLog,
    fail_context: bool,
    next_surface: usize,
}

impl GraphicsBinding for MockBinding {
    fn create_display_connection(&mut self) -> GraphicsResult<DisplayHandle> {
        self.log.push("gfx.display");
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
        self.log.push("gfx.create_context");
        if self.fail_context {
            return Err(GraphicsError::ContextCreationFailed("refused".into()));
        }
        Ok(ContextHandle::new(1))
    }

    fn create_window_surface(
        &mut self,
        _display: DisplayHandle,
        _config: ConfigHandle,
        window: NativeWindow,
    ) -> GraphicsResult<SurfaceHandle> {
        self.log
            .push(format!("gfx.create_surface {:#x}", window.as_ptr() as usize));
        self.next_surface += 1;
        Ok(SurfaceHandle::new(self.next_surface))
    }

    fn make_current(
        &mut self,
        _display: DisplayHandle,
        surface: Option<SurfaceHandle>,
        context: Option<ContextHandle>,
    ) -> GraphicsResult<()> {
        if surface.is_none() && context.is_some() {
            self.log.push("gfx.make_current surfaceless");
        }
        Ok(())
    }

    fn destroy_surface(&mut self, _display: DisplayHandle, _surface: SurfaceHandle) {
        self.log.push("gfx.destroy_surface");
    }

    fn destroy_context(&mut self, _display: DisplayHandle, _context: ContextHandle) {
        self.log.push("gfx.destroy_context");
    }

    fn terminate(&mut self, _display: DisplayHandle) {
        self.log.push("gfx.terminate");
    }

    fn swap_buffers(&mut self, _display: DisplayHandle, _surface: SurfaceHandle) -> GraphicsResult<()> {
        self.log.push("gfx.swap");
        Ok(())
    }

    fn set_swap_interval(&mut self, _display: DisplayHandle, interval: i32) {
        self.log.push(format!("gfx.swap_interval {}", interval));
    }

    fn get_proc_address(&self, _name: &str) -> *const c_void {
        std::ptr::null()
    }
}

struct MockSimulation {
    log: CallLog,
    last_inputs: Arc<Mutex<Option<FrameInputs>>>,
}

impl Simulation for MockSimulation {
    fn load_gpu_resources(&mut self) {
        self.log.push("sim.load_gpu");
    }

    fn unload_gpu_resources(&mut self) {
        self.log.push("sim.unload_gpu");
    }

    fn update(&mut self, inputs: &FrameInputs) {
        self.log.push("sim.update");
        *self.last_inputs.lock() = Some(*inputs);
    }

    fn destroy(&mut self) {
        self.log.push("sim.destroy");
    }
}

struct MockOverlay {
    log: CallLog,
    flags: Arc<Mutex<OverlayOutput>>,
    consumes_input: bool,
}

impl DebugOverlay for MockOverlay {
    fn output_flags(&self) -> OverlayOutput {
        *self.flags.lock()
    }

    fn bind_to_window(&mut self, _window: NativeWindow) {
        self.log.push("overlay.bind");
    }

    fn unbind_from_window(&mut self) {
        self.log.push("overlay.unbind");
    }

    fn handle_input_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.log.push(format!("overlay.key {}", key.key_code)),
            InputEvent::Motion(_) => self.log.push("overlay.motion"),
        }
        self.consumes_input
    }

    fn inject_unicode_char(&mut self, codepoint: u32) {
        self.log.push(format!("overlay.char {}", codepoint));
    }

    fn update_and_render(&mut self) {
        self.log.push("overlay.render");
    }

    fn notify_resized(&mut self, width: i32, height: i32) {
        self.log.push(format!("overlay.resized {}x{}", width, height));
    }

    fn shutdown(&mut self) {
        self.log.push("overlay.shutdown");
    }
}

struct MockAudio {
    log: CallLog,
    format: StreamFormat,
}

impl AudioOutput for MockAudio {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn set_fill_callback(&mut self, _callback: FillCallback) {
        self.log.push("audio.callback");
    }

    fn pause(&mut self) -> AudioResult<()> {
        self.log.push("audio.pause");
        Ok(())
    }

    fn resume(&mut self) -> AudioResult<()> {
        self.log.push("audio.resume");
        Ok(())
    }

    fn close(&mut self) {
        self.log.push("audio.close");
    }
}

/// Platform handing out the recording collaborators above.
#[derive(Clone, Default)]
pub(crate) struct MockPlatform {
    pub(crate) log: CallLog,
    pub(crate) overlay_flags: Arc<Mutex<OverlayOutput>>,
    pub(crate) last_inputs: Arc<Mutex<Option<FrameInputs>>>,
    pub(crate) overlay_consumes_input: bool,
    pub(crate) fail_context: bool,
    /// Component whose factory call fails.
    pub(crate) fail_component: Option<&'static str>,
}

impl MockPlatform {
    fn check(&self, component: &'static str) -> Result<(), AppError> {
        if self.fail_component == Some(component) {
            return Err(AppError::collaborator(component, "mock failure"));
        }
        Ok(())
    }

    pub(crate) fn last_inputs(&self) -> Option<FrameInputs> {
        *self.last_inputs.lock()
    }
}

impl Platform for MockPlatform {
    fn graphics(&mut self) -> Result<Box<dyn GraphicsBinding>, AppError> {
        self.check("graphics")?;
        Ok(Box::new(MockBinding {
            log: self.log.clone(),
            fail_context: self.fail_context,
            next_surface: 0,
        }))
    }

    fn simulation(&mut self) -> Result<Box<dyn Simulation>, AppError> {
        self.check("simulation")?;
        self.log.push("sim.init");
        Ok(Box::new(MockSimulation {
            log: self.log.clone(),
            last_inputs: Arc::clone(&self.last_inputs),
        }))
    }

    fn overlay(&mut self) -> Result<Box<dyn DebugOverlay>, AppError> {
        self.check("overlay")?;
        self.log.push("overlay.init");
        Ok(Box::new(MockOverlay {
            log: self.log.clone(),
            flags: Arc::clone(&self.overlay_flags),
            consumes_input: self.overlay_consumes_input,
        }))
    }

    fn audio(
        &mut self,
        frames_per_buffer: u32,
        sample_rate: u32,
    ) -> Result<Box<dyn AudioOutput>, AppError> {
        self.check("audio")?;
        self.log
            .push(format!("audio.open {} {}", frames_per_buffer, sample_rate));
        Ok(Box::new(MockAudio {
            log: self.log.clone(),
            format: StreamFormat::stereo(sample_rate),
        }))
    }
}
