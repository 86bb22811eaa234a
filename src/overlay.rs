//! Debug UI overlay collaborator contract.

use crate::event::{InputEvent, NativeWindow};

/// Requests the overlay raises after its per-frame update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayOutput {
    pub wants_keyboard_shown: bool,
    pub wants_keyboard_hidden: bool,
    /// Drop to swap interval 0 while a touch is held down.
    pub disable_vsync_on_motion: bool,
}

/// Immediate-mode debug UI drawn on top of the simulation.
pub trait DebugOverlay {
    fn output_flags(&self) -> OverlayOutput;

    fn bind_to_window(&mut self, window: NativeWindow);

    fn unbind_from_window(&mut self);

    /// Returns true if the overlay consumed the event.
    fn handle_input_event(&mut self, event: &InputEvent) -> bool;

    fn inject_unicode_char(&mut self, codepoint: u32);

    fn update_and_render(&mut self);

    fn notify_resized(&mut self, width: i32, height: i32);

    fn shutdown(&mut self);
}
