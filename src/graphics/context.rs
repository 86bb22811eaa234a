//! Graphics context manager.
//!
//! Owns the display connection, the render context and the current drawing
//! surface. The context is created lazily on the first window bind and then
//! outlives individual surfaces: each surface lifecycle only creates and
//! destroys the window surface.

use std::fmt;

use log::{debug, info, warn};

use crate::event::NativeWindow;
use crate::graphics::binding::{
    ConfigHandle, ContextHandle, DisplayHandle, GraphicsBinding, GraphicsError, GraphicsResult,
    SurfaceAttribs, SurfaceHandle,
};
use crate::graphics::gl_frame;

/// Result of binding a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOutcome {
    /// The render context was created by this bind (first surface ever, or
    /// first after a teardown).
    pub context_created: bool,
}

pub struct GraphicsContext {
    binding: Box<dyn GraphicsBinding>,
    attribs: SurfaceAttribs,
    swap_interval: i32,
    display: Option<DisplayHandle>,
    config: Option<ConfigHandle>,
    context: Option<ContextHandle>,
    surface: Option<SurfaceHandle>,
    window: Option<NativeWindow>,
}

impl GraphicsContext {
    pub fn new(binding: Box<dyn GraphicsBinding>, attribs: SurfaceAttribs, swap_interval: i32) -> Self {
        Self {
            binding,
            attribs,
            swap_interval,
            display: None,
            config: None,
            context: None,
            surface: None,
            window: None,
        }
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_surface_bound(&self) -> bool {
        self.surface.is_some()
    }

    /// Window the current surface draws to.
    pub fn window(&self) -> Option<NativeWindow> {
        self.window
    }

    /// Create (or reuse) the render context and bind a new surface for `window`.
    ///
    /// Any previously bound surface is unbound and destroyed first.
    pub fn bind_window(&mut self, window: NativeWindow) -> GraphicsResult<BindOutcome> {
        if self.surface.is_some() {
            debug!("Replacing bound surface");
            self.unbind_surface();
        }

        let context_created = self.context.is_none();
        if context_created {
            self.create_context()?;
        }

        let (Some(display), Some(config), Some(context)) = (self.display, self.config, self.context)
        else {
            return Err(GraphicsError::NoContext);
        };

        debug!("Creating and binding window surface");
        let surface = self.binding.create_window_surface(display, config, window)?;
        if let Err(err) = self.binding.make_current(display, Some(surface), Some(context)) {
            self.binding.destroy_surface(display, surface);
            return Err(err);
        }
        self.surface = Some(surface);
        self.window = Some(window);

        // The interval resets with every new surface.
        self.binding.set_swap_interval(display, self.swap_interval);

        if context_created {
            gl_frame::load_functions(self.binding.as_ref());
        }

        Ok(BindOutcome { context_created })
    }

    fn create_context(&mut self) -> GraphicsResult<()> {
        let display = match self.display {
            Some(display) => display,
            None => {
                let display = self.binding.create_display_connection()?;
                let description = self.binding.describe(display);
                if !description.is_empty() {
                    info!("Display: {}", description);
                }
                self.display = Some(display);
                display
            }
        };

        debug!("Creating render context ({:?})", self.attribs);
        let config = self.binding.choose_config(display, &self.attribs)?;
        let context = self
            .binding
            .create_context(display, config, self.attribs.client_version)?;

        self.config = Some(config);
        self.context = Some(context);
        Ok(())
    }

    /// Clear the current context and destroy the drawing surface.
    ///
    /// The render context survives; a later [`bind_window`](Self::bind_window)
    /// reuses it.
    pub fn unbind_surface(&mut self) {
        let (Some(display), Some(surface)) = (self.display, self.surface.take()) else {
            return;
        };
        debug!("Unbinding and destroying window surface");
        if let Err(err) = self.binding.make_current(display, None, None) {
            warn!("Failed to clear current context: {}", err);
        }
        self.binding.destroy_surface(display, surface);
        self.window = None;
    }

    /// Make the render context current with no drawing surface, so GL
    /// resources can be released after the last surface is gone.
    ///
    /// A no-op while a surface is bound: the context is already current.
    pub fn make_current_surfaceless(&mut self) -> GraphicsResult<()> {
        if self.surface.is_some() {
            return Ok(());
        }
        let (Some(display), Some(context)) = (self.display, self.context) else {
            return Err(GraphicsError::NoContext);
        };
        debug!("Making render context current without a surface");
        self.binding.make_current(display, None, Some(context))
    }

    /// Present the back buffer of the bound surface.
    pub fn present(&mut self) -> GraphicsResult<()> {
        match (self.display, self.surface) {
            (Some(display), Some(surface)) => self.binding.swap_buffers(display, surface),
            _ => Err(GraphicsError::NoSurface),
        }
    }

    /// Override the swap interval until the next bind or
    /// [`restore_swap_interval`](Self::restore_swap_interval).
    pub fn set_swap_interval(&mut self, interval: i32) -> GraphicsResult<()> {
        if self.surface.is_none() {
            return Err(GraphicsError::NoSurface);
        }
        let display = self.display.ok_or(GraphicsError::NoContext)?;
        self.binding.set_swap_interval(display, interval);
        Ok(())
    }

    pub fn restore_swap_interval(&mut self) -> GraphicsResult<()> {
        self.set_swap_interval(self.swap_interval)
    }

    /// Release the surface, the render context and the display connection.
    pub fn teardown(&mut self) {
        self.unbind_surface();
        let Some(display) = self.display.take() else {
            return;
        };
        if let Some(context) = self.context.take() {
            info!("Destroying render context");
            if let Err(err) = self.binding.make_current(display, None, None) {
                warn!("Failed to clear current context: {}", err);
            }
            self.binding.destroy_context(display, context);
        }
        self.config = None;
        self.binding.terminate(display);
    }
}

impl Drop for GraphicsContext {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("display", &self.display)
            .field("context", &self.context)
            .field("surface", &self.surface)
            .field("swap_interval", &self.swap_interval)
            .finish()
    }
}
