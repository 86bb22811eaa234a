//! GL calls issued by the frame loop itself.
//!
//! Entry points are resolved through the binding's `get_proc_address` after
//! the first context is created. Every call checks that its entry point was
//! loaded, so a binding without a real GL driver leaves these as no-ops.

use std::ffi::CStr;

use log::{debug, info};

use crate::graphics::binding::GraphicsBinding;

/// Resolve GL entry points through the binding and log driver strings.
pub fn load_functions(binding: &dyn GraphicsBinding) {
    gl::load_with(|name| binding.get_proc_address(name));

    if !gl::GetString::is_loaded() {
        debug!("GL entry points unavailable, frame clears disabled");
        return;
    }
    info!("GL_VERSION: {}", gl_string(gl::VERSION));
    info!("GL_VENDOR: {}", gl_string(gl::VENDOR));
    info!("GL_RENDERER: {}", gl_string(gl::RENDERER));
    info!(
        "GL_SHADING_LANGUAGE_VERSION: {}",
        gl_string(gl::SHADING_LANGUAGE_VERSION)
    );
}

pub fn set_viewport(width: i32, height: i32) {
    if width <= 0 || height <= 0 || !gl::Viewport::is_loaded() {
        return;
    }
    // SAFETY: entry point resolved and a context is current on this thread.
    unsafe {
        gl::Viewport(0, 0, width, height);
    }
}

/// Clear color and depth of the current back buffer.
pub fn clear(color: [f32; 4]) {
    if !(gl::Clear::is_loaded() && gl::ClearColor::is_loaded()) {
        return;
    }
    let [r, g, b, a] = color;
    // SAFETY: entry points resolved and a context is current on this thread.
    unsafe {
        gl::ClearColor(r, g, b, a);
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}

fn gl_string(name: gl::types::GLenum) -> String {
    // SAFETY: GetString returns null or a static NUL-terminated string.
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            String::new()
        } else {
            CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned()
        }
    }
}
