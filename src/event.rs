//! Events delivered from the host callbacks to the app thread.

use std::ffi::c_void;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;

/// Maximum number of touch pointers carried by a motion event.
pub const MAX_POINTERS: usize = 10;

/// Borrowed reference to the host's native window (`ANativeWindow*`).
///
/// The core never dereferences it; it is only handed to the graphics binding
/// and the overlay. The host keeps it alive from the moment it is passed to
/// `on_surface_created` until `on_surface_destroyed` has returned, and the core
/// drops every copy when it processes `SurfaceDestroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindow(NonZeroUsize);

impl NativeWindow {
    /// Wrap a raw window pointer; `None` for null.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.get() as *mut c_void
    }
}

/// Key event action (`AKEY_EVENT_ACTION_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Down,
    Up,
    Multiple,
    Other(i32),
}

impl KeyAction {
    pub const fn from_raw(action: i32) -> Self {
        match action {
            0 => Self::Down,
            1 => Self::Up,
            2 => Self::Multiple,
            other => Self::Other(other),
        }
    }
}

/// Motion event action (`AMOTION_EVENT_ACTION_*`, pointer index masked off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionAction {
    Down,
    Up,
    Move,
    Cancel,
    PointerDown,
    PointerUp,
    Other(i32),
}

impl MotionAction {
    const ACTION_MASK: i32 = 0xff;

    pub const fn from_raw(action: i32) -> Self {
        match action & Self::ACTION_MASK {
            0 => Self::Down,
            1 => Self::Up,
            2 => Self::Move,
            3 => Self::Cancel,
            5 => Self::PointerDown,
            6 => Self::PointerUp,
            other => Self::Other(other),
        }
    }
}

/// Key event copied out of the host's event object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub action: KeyAction,
    pub key_code: i32,
    pub scan_code: i32,
    /// Unicode code point produced by the key, 0 if none.
    pub unicode_char: u32,
    pub meta_state: i32,
}

impl KeyEvent {
    pub const fn new(action: KeyAction, key_code: i32, unicode_char: u32) -> Self {
        Self {
            action,
            key_code,
            scan_code: 0,
            unicode_char,
            meta_state: 0,
        }
    }
}

/// Touch event with up to [`MAX_POINTERS`] pointers, stored inline so that
/// queuing one never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    pub action: MotionAction,
    pointer_count: usize,
    x: [i32; MAX_POINTERS],
    y: [i32; MAX_POINTERS],
}

impl MotionEvent {
    /// Single-pointer event.
    pub fn single(action: MotionAction, x: i32, y: i32) -> Self {
        Self::from_pointers(action, &[(x, y)])
    }

    /// Event from a pointer list; pointers past [`MAX_POINTERS`] are ignored.
    pub fn from_pointers(action: MotionAction, pointers: &[(i32, i32)]) -> Self {
        let mut event = Self {
            action,
            pointer_count: pointers.len().min(MAX_POINTERS),
            x: [0; MAX_POINTERS],
            y: [0; MAX_POINTERS],
        };
        for (i, &(x, y)) in pointers.iter().take(MAX_POINTERS).enumerate() {
            event.x[i] = x;
            event.y[i] = y;
        }
        event
    }

    pub fn pointer_count(&self) -> usize {
        self.pointer_count
    }

    pub fn pointer(&self, index: usize) -> Option<(i32, i32)> {
        (index < self.pointer_count).then(|| (self.x[index], self.y[index]))
    }

    /// First pointer, the one that drives the simulation.
    pub fn primary(&self) -> Option<(i32, i32)> {
        self.pointer(0)
    }
}

/// Input event as seen by input-consuming collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Motion(MotionEvent),
}

/// Shared flag the app thread writes to report whether an input event was
/// consumed.
#[derive(Debug, Clone, Default)]
pub struct HandledSlot(Arc<AtomicBool>);

impl HandledSlot {
    pub fn new(initial: bool) -> Self {
        Self(Arc::new(AtomicBool::new(initial)))
    }

    pub fn set(&self, handled: bool) {
        self.0.store(handled, Ordering::Release);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Lifecycle and input events, in the order the host delivers them.
#[derive(Debug, Clone)]
pub enum Event {
    Create { config: Box<AppConfig> },
    Destroy,
    Start,
    Stop,
    Resume,
    Pause,
    WindowFocusChanged { has_focus: bool },
    SurfaceCreated { window: NativeWindow },
    SurfaceChanged { format: i32, width: i32, height: i32 },
    SurfaceDestroyed,
    DispatchKeyEvent { event: KeyEvent, handled: HandledSlot },
    DispatchTouchEvent { event: MotionEvent, handled: HandledSlot },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "Create",
            Self::Destroy => "Destroy",
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Resume => "Resume",
            Self::Pause => "Pause",
            Self::WindowFocusChanged { .. } => "WindowFocusChanged",
            Self::SurfaceCreated { .. } => "SurfaceCreated",
            Self::SurfaceChanged { .. } => "SurfaceChanged",
            Self::SurfaceDestroyed => "SurfaceDestroyed",
            Self::DispatchKeyEvent { .. } => "DispatchKeyEvent",
            Self::DispatchTouchEvent { .. } => "DispatchTouchEvent",
        }
    }

    /// High-frequency input events, logged at trace level only.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::DispatchKeyEvent { .. } | Self::DispatchTouchEvent { .. }
        )
    }
}
