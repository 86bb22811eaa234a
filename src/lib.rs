// EmptyApp native library
// Lifecycle, event queue and render loop behind the Android host glue

pub mod app;
pub mod audio;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod graphics;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod overlay;
pub mod platform;
pub mod queue;
pub mod simulation;
pub mod threading;

#[cfg(test)]
mod mocks;

pub use app::AppHandle;
pub use config::AppConfig;
pub use error::AppError;
pub use event::{Event, KeyAction, KeyEvent, MotionAction, MotionEvent, NativeWindow};
pub use host::{HostRequest, HostRequests};
pub use logging::LogLevel;
pub use platform::Platform;
