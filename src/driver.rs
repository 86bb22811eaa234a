//! Render thread driver.
//!
//! One loop iteration drains every queued event, then produces at most one
//! frame. While no frame can be produced (paused, or no surface) the dequeue
//! blocks, so a backgrounded app does not spin.

use std::sync::Arc;

use log::{error, info};

use crate::error::AppError;
use crate::host::{HostRequest, HostSender};
use crate::lifecycle::{AppState, Flow};
use crate::platform::Platform;
use crate::queue::{CloseReason, EventQueue};
use crate::threading::{Result as ThreadResult, Thread};

/// Name given to the app thread.
pub const APP_THREAD_NAME: &str = "app-thread";

/// Consume events and render until Destroy is applied or the queue closes.
///
/// # Errors
/// The first error a transition returns; the state must not be used further.
pub fn run(queue: &EventQueue, state: &mut AppState) -> Result<(), AppError> {
    loop {
        loop {
            let wait = state.is_paused() || !state.surface_bound();
            let Some(event) = queue.dequeue(wait) else {
                if queue.is_closed() {
                    return Ok(());
                }
                break;
            };
            if state.apply(event)? == Flow::Exit {
                return Ok(());
            }
        }
        state.render_frame();
    }
}

/// Thread body: run the loop, release the collaborators, then close the queue
/// so that every waiting producer returns.
pub fn app_thread_main(queue: Arc<EventQueue>, platform: Box<dyn Platform>, host: HostSender) {
    info!("App thread start");
    let mut state = AppState::new(platform, host.clone());
    let result = run(&queue, &mut state);
    let frames = state.frames_presented();
    drop(state);

    match result {
        Ok(()) => {
            queue.close(CloseReason::Finished);
            info!("App thread end after {} frames", frames);
        }
        Err(e) => {
            let reason = e.to_string();
            error!("App thread failed: {}", reason);
            queue.close(CloseReason::Failed(reason.clone()));
            host.send(HostRequest::Failed { reason });
        }
    }
}

pub fn spawn_app_thread(
    queue: Arc<EventQueue>,
    platform: Box<dyn Platform>,
    host: HostSender,
) -> ThreadResult<Thread<()>> {
    Thread::spawn(APP_THREAD_NAME, move || app_thread_main(queue, platform, host))
}
