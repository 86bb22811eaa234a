//! App state and the lifecycle transition table.
//!
//! Only the app thread touches an [`AppState`]: it is built inside the thread,
//! mutated by [`AppState::apply`] one event at a time, and dropped when the
//! thread exits. Nothing here is shared, so nothing here is locked.

use log::{debug, info, trace, warn};

use crate::audio::AudioOutput;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::event::{Event, InputEvent, KeyEvent, MotionAction, MotionEvent, NativeWindow};
use crate::graphics::{gl_frame, GraphicsContext};
use crate::host::{HostRequest, HostSender, KEYBOARD_VIBRATE_EFFECT};
use crate::overlay::DebugOverlay;
use crate::platform::Platform;
use crate::simulation::{FrameInputs, Simulation};

/// Coarse lifecycle position. Surface binding is tracked separately since it
/// toggles independently of pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized,
    /// Create processed; neither Resume nor Pause seen yet.
    Created,
    Running,
    Paused,
    /// Terminal.
    Destroyed,
}

/// What the driver does after an event is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Destroy was applied; stop consuming.
    Exit,
}

/// Collaborators created at Create and released at Destroy.
struct Services {
    graphics: GraphicsContext,
    simulation: Box<dyn Simulation>,
    overlay: Box<dyn DebugOverlay>,
    audio: Box<dyn AudioOutput>,
    gpu_resources_loaded: bool,
}

pub struct AppState {
    platform: Box<dyn Platform>,
    host: HostSender,
    config: AppConfig,
    state: LifecycleState,
    paused: bool,
    services: Option<Services>,
    inputs: FrameInputs,
    frames_presented: u64,
}

impl AppState {
    pub fn new(platform: Box<dyn Platform>, host: HostSender) -> Self {
        let config = AppConfig::default();
        Self {
            platform,
            host,
            inputs: FrameInputs::new(config.frame_delta_seconds),
            config,
            state: LifecycleState::Uninitialized,
            paused: false,
            services: None,
            frames_presented: 0,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn surface_bound(&self) -> bool {
        self.services
            .as_ref()
            .is_some_and(|s| s.graphics.is_surface_bound())
    }

    /// A frame can be produced: not paused, not destroyed, surface bound.
    pub fn can_render(&self) -> bool {
        self.state != LifecycleState::Destroyed && !self.paused && self.surface_bound()
    }

    /// Inputs the next frame will hand to the simulation.
    pub fn inputs(&self) -> &FrameInputs {
        &self.inputs
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply one event.
    ///
    /// # Errors
    /// Collaborator creation and graphics setup failures. The instance cannot
    /// continue after an error.
    pub fn apply(&mut self, event: Event) -> Result<Flow, AppError> {
        let name = event.name();
        if event.is_input() {
            trace!("Handle event {}", name);
        } else {
            debug!("Handle event {}", name);
        }

        if self.state == LifecycleState::Destroyed {
            warn!("Ignoring {} after Destroy", name);
            return Ok(Flow::Exit);
        }

        match event {
            Event::Create { config } => self.create(*config)?,
            Event::Destroy => {
                self.destroy();
                return Ok(Flow::Exit);
            }
            _ if self.state == LifecycleState::Uninitialized => {
                warn!("Ignoring {} before Create", name);
            }
            Event::Start | Event::Stop => {}
            Event::WindowFocusChanged { has_focus } => {
                debug!("Window focus: {}", has_focus);
            }
            Event::Resume => self.resume(),
            Event::Pause => self.pause(),
            Event::SurfaceCreated { window } => self.surface_created(window)?,
            Event::SurfaceChanged {
                format,
                width,
                height,
            } => self.surface_changed(format, width, height),
            Event::SurfaceDestroyed => self.surface_destroyed(),
            Event::DispatchKeyEvent { event, handled } => handled.set(self.key_event(event)),
            Event::DispatchTouchEvent { event, handled } => handled.set(self.touch_event(event)),
        }

        Ok(Flow::Continue)
    }

    fn create(&mut self, config: AppConfig) -> Result<(), AppError> {
        if self.state != LifecycleState::Uninitialized {
            warn!("Ignoring duplicate Create");
            return Ok(());
        }

        let mut audio = self
            .platform
            .audio(config.audio_frames_per_buffer, config.audio_sample_rate)?;
        let simulation = self.platform.simulation()?;
        let overlay = self.platform.overlay()?;
        let binding = self.platform.graphics()?;
        audio.set_fill_callback(self.platform.fill_callback());

        info!(
            "Created: audio {} Hz / {} frames, queue capacity {}",
            config.audio_sample_rate, config.audio_frames_per_buffer, config.event_queue_capacity
        );

        self.services = Some(Services {
            graphics: GraphicsContext::new(binding, config.surface, config.swap_interval),
            simulation,
            overlay,
            audio,
            gpu_resources_loaded: false,
        });
        self.inputs = FrameInputs::new(config.frame_delta_seconds);
        self.config = config;
        self.paused = false;
        self.state = LifecycleState::Created;
        Ok(())
    }

    fn destroy(&mut self) {
        if let Some(mut services) = self.services.take() {
            if services.gpu_resources_loaded {
                if let Err(e) = services.graphics.make_current_surfaceless() {
                    warn!("No current context for GPU resource unload: {}", e);
                }
                services.simulation.unload_gpu_resources();
            }
            if services.graphics.is_surface_bound() {
                services.overlay.unbind_from_window();
            }
            services.graphics.teardown();
            services.overlay.shutdown();
            services.simulation.destroy();
            services.audio.close();
        }
        self.state = LifecycleState::Destroyed;
        info!("Destroyed after {} frames", self.frames_presented);
    }

    fn resume(&mut self) {
        self.paused = false;
        self.state = LifecycleState::Running;
        if let Some(services) = self.services.as_mut() {
            if let Err(e) = services.audio.resume() {
                warn!("Audio resume failed: {}", e);
            }
        }
    }

    fn pause(&mut self) {
        self.paused = true;
        self.state = LifecycleState::Paused;
        if let Some(services) = self.services.as_mut() {
            if let Err(e) = services.audio.pause() {
                warn!("Audio pause failed: {}", e);
            }
        }
    }

    fn surface_created(&mut self, window: NativeWindow) -> Result<(), AppError> {
        let Some(services) = self.services.as_mut() else {
            return Ok(());
        };

        if services.graphics.is_surface_bound() {
            services.overlay.unbind_from_window();
        }
        let outcome = services.graphics.bind_window(window)?;
        services.overlay.bind_to_window(window);

        if outcome.context_created && !services.gpu_resources_loaded {
            services.simulation.load_gpu_resources();
            services.gpu_resources_loaded = true;
        }
        Ok(())
    }

    fn surface_changed(&mut self, format: i32, width: i32, height: i32) {
        debug!("Surface changed: format {} size {}x{}", format, width, height);
        self.inputs.set_display_size(width, height);
        if let Some(services) = self.services.as_mut() {
            services.overlay.notify_resized(width, height);
        }
    }

    fn surface_destroyed(&mut self) {
        let Some(services) = self.services.as_mut() else {
            return;
        };
        if !services.graphics.is_surface_bound() {
            debug!("SurfaceDestroyed without a bound surface");
            return;
        }
        services.overlay.unbind_from_window();
        services.graphics.unbind_surface();
    }

    fn key_event(&mut self, event: KeyEvent) -> bool {
        let Some(services) = self.services.as_mut() else {
            return false;
        };
        trace!(
            "Key {:?} code {} char {}",
            event.action,
            event.key_code,
            event.unicode_char
        );
        let handled = services.overlay.handle_input_event(&InputEvent::Key(event));
        if event.unicode_char != 0 {
            services.overlay.inject_unicode_char(event.unicode_char);
        }
        handled
    }

    fn touch_event(&mut self, event: MotionEvent) -> bool {
        let Some(services) = self.services.as_mut() else {
            return false;
        };
        let handled = services
            .overlay
            .handle_input_event(&InputEvent::Motion(event));
        if let Some((x, y)) = event.primary() {
            trace!("Touch {:?} at {} {}", event.action, x, y);
            self.inputs.set_pointer(x, y);
        }

        if services.overlay.output_flags().disable_vsync_on_motion
            && services.graphics.is_surface_bound()
        {
            let result = match event.action {
                MotionAction::Down => services.graphics.set_swap_interval(0),
                MotionAction::Up => services.graphics.restore_swap_interval(),
                _ => Ok(()),
            };
            if let Err(e) = result {
                warn!("Swap interval change failed: {}", e);
            }
        }
        handled
    }

    /// Produce one frame if a surface is bound and the app is not paused.
    ///
    /// Update, overlay, present, then clear for the next frame. A failed
    /// present is logged and skipped.
    pub fn render_frame(&mut self) {
        if !self.can_render() {
            return;
        }
        let Some(services) = self.services.as_mut() else {
            return;
        };

        self.inputs.delta_time = self.config.frame_delta_seconds;
        gl_frame::set_viewport(self.inputs.display_width, self.inputs.display_height);
        services.simulation.update(&self.inputs);

        services.overlay.update_and_render();
        let flags = services.overlay.output_flags();
        if flags.wants_keyboard_shown {
            self.host.send(HostRequest::Vibrate {
                effect: KEYBOARD_VIBRATE_EFFECT,
            });
            self.host.send(HostRequest::ShowSoftInput);
        }
        if flags.wants_keyboard_hidden {
            self.host.send(HostRequest::HideSoftInput);
        }

        match services.graphics.present() {
            Ok(()) => self.frames_presented += 1,
            Err(e) => warn!("Present failed: {}", e),
        }

        gl_frame::clear(self.config.clear_color);
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        if self.services.is_some() {
            debug!("Releasing collaborators without Destroy");
            self.destroy();
        }
    }
}
