//! Host-facing surface.
//!
//! The host glue calls these from its lifecycle and input callbacks. Each call
//! turns into one queued [`Event`]; the calls that must not return before the
//! app thread has caught up (create, destroy, stop, pause, surface create and
//! destroy, key dispatch) use synchronous delivery.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::config::AppConfig;
use crate::driver;
use crate::error::AppError;
use crate::event::{Event, HandledSlot, KeyEvent, MotionEvent, NativeWindow};
use crate::host::{request_channel, HostRequests};
use crate::logging::init_logging;
use crate::platform::Platform;
use crate::queue::{DeliveryMode, Enqueued, EventQueue};
use crate::threading::Thread;

struct AppShared {
    queue: Arc<EventQueue>,
    thread: Mutex<Option<Thread<()>>>,
    requests: HostRequests,
    /// Window registered by the last `on_surface_created`.
    window: Mutex<Option<NativeWindow>>,
}

impl AppShared {
    fn join_thread(&self) {
        let Some(thread) = self.thread.lock().take() else {
            return;
        };
        if let Err(e) = thread.join() {
            warn!("{}", e);
        }
    }
}

impl Drop for AppShared {
    fn drop(&mut self) {
        if !self.queue.is_closed() {
            debug!("Last handle dropped without on_destroy, delivering Destroy");
            if let Err(e) = self.queue.enqueue(Event::Destroy, DeliveryMode::Synchronous) {
                debug!("Destroy on drop: {}", e);
            }
        }
        self.join_thread();
    }
}

/// Handle to one app instance and its app thread.
///
/// Cheap to clone; every clone feeds the same queue. After Destroy (or a fatal
/// failure on the app thread) every call is rejected.
#[derive(Clone)]
pub struct AppHandle {
    shared: Arc<AppShared>,
}

impl AppHandle {
    /// Start the app thread and deliver Create.
    ///
    /// Validates the configuration, installs the logger, changes the working
    /// directory to `files_dir`, then waits until the app thread has created
    /// its collaborators.
    ///
    /// # Errors
    /// Invalid configuration, thread spawn failure, or a collaborator that
    /// failed to initialize.
    pub fn on_create(config: AppConfig, platform: Box<dyn Platform>) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        init_logging(config.log_level);
        info!("onCreate");
        config
            .apply_working_dir()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        let queue = Arc::new(EventQueue::with_capacity(config.event_queue_capacity));
        let (host, requests) = request_channel();
        let thread = driver::spawn_app_thread(Arc::clone(&queue), platform, host)?;

        let handle = Self {
            shared: Arc::new(AppShared {
                queue,
                thread: Mutex::new(Some(thread)),
                requests,
                window: Mutex::new(None),
            }),
        };
        handle.send(
            Event::Create {
                config: Box::new(config),
            },
            DeliveryMode::Synchronous,
        )?;
        Ok(handle)
    }

    fn send(&self, event: Event, mode: DeliveryMode) -> Result<Enqueued, AppError> {
        Ok(self.shared.queue.enqueue(event, mode)?)
    }

    /// Deliver Destroy, wait for it to be applied and join the app thread.
    pub fn on_destroy(&self) -> Result<(), AppError> {
        info!("onDestroy");
        let result = self.send(Event::Destroy, DeliveryMode::Synchronous);
        self.shared.join_thread();
        result.map(|_| ())
    }

    pub fn on_start(&self) -> Result<(), AppError> {
        self.send(Event::Start, DeliveryMode::FireAndForget).map(|_| ())
    }

    pub fn on_stop(&self) -> Result<(), AppError> {
        self.send(Event::Stop, DeliveryMode::Synchronous).map(|_| ())
    }

    pub fn on_resume(&self) -> Result<(), AppError> {
        self.send(Event::Resume, DeliveryMode::FireAndForget).map(|_| ())
    }

    pub fn on_pause(&self) -> Result<(), AppError> {
        self.send(Event::Pause, DeliveryMode::Synchronous).map(|_| ())
    }

    pub fn on_window_focus_changed(&self, has_focus: bool) -> Result<(), AppError> {
        self.send(
            Event::WindowFocusChanged { has_focus },
            DeliveryMode::FireAndForget,
        )
        .map(|_| ())
    }

    /// Bind a new surface for `window`; returns once it is bound.
    ///
    /// The host must keep `window` alive until [`on_surface_destroyed`]
    /// hands it back. A window still registered from an earlier call without
    /// a matching destroy is unbound by now and returned here instead.
    ///
    /// [`on_surface_destroyed`]: Self::on_surface_destroyed
    pub fn on_surface_created(
        &self,
        window: NativeWindow,
    ) -> Result<Option<NativeWindow>, AppError> {
        let previous = self.shared.window.lock().replace(window);
        self.send(Event::SurfaceCreated { window }, DeliveryMode::Synchronous)?;
        if let Some(previous) = previous {
            warn!(
                "Surface created over a live window {:p}, handing it back",
                previous.as_ptr()
            );
        }
        Ok(previous)
    }

    pub fn on_surface_changed(&self, format: i32, width: i32, height: i32) -> Result<(), AppError> {
        self.send(
            Event::SurfaceChanged {
                format,
                width,
                height,
            },
            DeliveryMode::FireAndForget,
        )
        .map(|_| ())
    }

    /// Unbind the surface and hand the window back once the app thread no
    /// longer references it.
    pub fn on_surface_destroyed(&self) -> Result<Option<NativeWindow>, AppError> {
        self.send(Event::SurfaceDestroyed, DeliveryMode::Synchronous)?;
        Ok(self.shared.window.lock().take())
    }

    /// Returns whether the overlay consumed the key. A key dropped on a full
    /// queue counts as not handled.
    pub fn on_dispatch_key_event(&self, event: KeyEvent) -> Result<bool, AppError> {
        let handled = HandledSlot::new(false);
        let outcome = self.send(
            Event::DispatchKeyEvent {
                event,
                handled: handled.clone(),
            },
            DeliveryMode::Synchronous,
        )?;
        Ok(outcome == Enqueued::Queued && handled.get())
    }

    /// Touches are always reported as handled; they are applied
    /// asynchronously.
    pub fn on_dispatch_touch_event(&self, event: MotionEvent) -> Result<bool, AppError> {
        self.send(
            Event::DispatchTouchEvent {
                event,
                handled: HandledSlot::default(),
            },
            DeliveryMode::FireAndForget,
        )?;
        Ok(true)
    }

    /// Requests from the app thread (soft keyboard, vibration, failure).
    pub fn host_requests(&self) -> &HostRequests {
        &self.shared.requests
    }

    /// The app thread has stopped accepting events.
    pub fn is_terminated(&self) -> bool {
        self.shared.queue.is_closed()
    }
}

impl fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppHandle")
            .field("queue", &self.shared.queue)
            .field("terminated", &self.is_terminated())
            .finish()
    }
}
