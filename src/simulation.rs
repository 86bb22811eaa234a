//! Render/simulation collaborator contract.

/// Per-frame inputs handed to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInputs {
    pub display_width: i32,
    pub display_height: i32,
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Latest primary pointer position, in surface pixels.
    pub pointer_x: i32,
    pub pointer_y: i32,
}

impl FrameInputs {
    pub fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            ..Self::default()
        }
    }

    pub fn set_display_size(&mut self, width: i32, height: i32) {
        self.display_width = width;
        self.display_height = height;
    }

    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer_x = x;
        self.pointer_y = y;
    }
}

/// The 3D content drawn each frame.
///
/// All calls come from the app thread with the render context current, except
/// `destroy`, which may run after the context is gone.
pub trait Simulation {
    /// Upload GPU resources. Called once, after the first context is created.
    fn load_gpu_resources(&mut self);

    /// Release GPU resources while the context is still alive.
    fn unload_gpu_resources(&mut self);

    /// Advance and draw one frame.
    fn update(&mut self, inputs: &FrameInputs);

    fn destroy(&mut self);
}
