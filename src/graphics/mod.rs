//! Graphics context management.
//!
//! `binding` is the EGL-shaped contract the platform implements, `context`
//! owns the display/context/surface triple, and `gl_frame` holds the few GL
//! calls the frame loop makes directly.

pub mod binding;
pub mod context;
pub mod gl_frame;

pub use binding::{
    ConfigHandle, ContextHandle, DisplayHandle, GraphicsBinding, GraphicsError, GraphicsResult,
    SurfaceAttribs, SurfaceHandle,
};
pub use context::{BindOutcome, GraphicsContext};
