//! Graphics binding contract (EGL-shaped).
//!
//! The context manager never calls EGL directly; it goes through a
//! [`GraphicsBinding`] implementation supplied by the platform. Handles are
//! opaque integers so the core stays free of raw EGL pointers.

use std::ffi::c_void;
use std::fmt;

use crate::event::NativeWindow;

/// Error types for graphics binding operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// No display connection could be opened.
    NoDisplay(String),
    /// No pixel format matched the requested attributes.
    NoMatchingConfig,
    /// The binding refused to create a render context.
    ContextCreationFailed(String),
    /// The binding refused to create a window surface.
    SurfaceCreationFailed(String),
    /// Making the context current failed.
    MakeCurrentFailed(String),
    /// Presenting the back buffer failed.
    SwapFailed(String),
    /// Operation requires a context that does not exist yet.
    NoContext,
    /// Operation requires a bound surface.
    NoSurface,
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDisplay(msg) => write!(f, "No display connection: {}", msg),
            Self::NoMatchingConfig => write!(f, "No config matches the requested attributes"),
            Self::ContextCreationFailed(msg) => write!(f, "Context creation failed: {}", msg),
            Self::SurfaceCreationFailed(msg) => write!(f, "Surface creation failed: {}", msg),
            Self::MakeCurrentFailed(msg) => write!(f, "Make current failed: {}", msg),
            Self::SwapFailed(msg) => write!(f, "Swap buffers failed: {}", msg),
            Self::NoContext => write!(f, "No render context"),
            Self::NoSurface => write!(f, "No drawing surface bound"),
        }
    }
}

impl std::error::Error for GraphicsError {}

/// Result type for graphics operations.
pub type GraphicsResult<T> = Result<T, GraphicsError>;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub usize);

        impl $name {
            pub const fn new(raw: usize) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> usize {
                self.0
            }
        }
    };
}

opaque_handle!(
    /// Display connection (EGLDisplay).
    DisplayHandle
);
opaque_handle!(
    /// Chosen pixel format configuration (EGLConfig).
    ConfigHandle
);
opaque_handle!(
    /// Render context (EGLContext).
    ContextHandle
);
opaque_handle!(
    /// Window drawing surface (EGLSurface).
    SurfaceHandle
);

/// Pixel format and context attributes requested at context creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceAttribs {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
    /// GLES client version requested for the context.
    pub client_version: u8,
}

impl Default for SurfaceAttribs {
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            depth_bits: 16,
            client_version: 3,
        }
    }
}

/// Platform graphics binding layer.
///
/// Every call happens on the app thread. Implementations report failures as
/// [`GraphicsError`]; the context manager decides what is fatal.
pub trait GraphicsBinding {
    fn create_display_connection(&mut self) -> GraphicsResult<DisplayHandle>;

    fn choose_config(
        &mut self,
        display: DisplayHandle,
        attribs: &SurfaceAttribs,
    ) -> GraphicsResult<ConfigHandle>;

    fn create_context(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        client_version: u8,
    ) -> GraphicsResult<ContextHandle>;

    fn create_window_surface(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        window: NativeWindow,
    ) -> GraphicsResult<SurfaceHandle>;

    /// Bind `surface` and `context` to the calling thread; `None` for both
    /// clears the current context.
    fn make_current(
        &mut self,
        display: DisplayHandle,
        surface: Option<SurfaceHandle>,
        context: Option<ContextHandle>,
    ) -> GraphicsResult<()>;

    fn destroy_surface(&mut self, display: DisplayHandle, surface: SurfaceHandle);

    fn destroy_context(&mut self, display: DisplayHandle, context: ContextHandle);

    /// Close the display connection.
    fn terminate(&mut self, display: DisplayHandle);

    fn swap_buffers(&mut self, display: DisplayHandle, surface: SurfaceHandle)
        -> GraphicsResult<()>;

    fn set_swap_interval(&mut self, display: DisplayHandle, interval: i32);

    /// Address of a GL entry point, or null when unavailable.
    fn get_proc_address(&self, name: &str) -> *const c_void;

    /// Human readable vendor/version string, logged once at context creation.
    fn describe(&self, _display: DisplayHandle) -> String {
        String::new()
    }
}
