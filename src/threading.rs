//! Thread management for the app thread.
//!
//! The app owns exactly one consumer thread, spawned when the host creates the
//! activity and joined when the host destroys it. This module wraps
//! `std::thread` so that spawn and join failures come back as [`ThreadError`]
//! values instead of panics.

use std::fmt;
use std::thread::{self, JoinHandle};

/// Error type for threading operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadError {
    /// Thread spawn failed
    SpawnFailed(String),
    /// Thread join failed
    JoinFailed(String),
}

impl fmt::Display for ThreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadError::SpawnFailed(s) => write!(f, "Thread spawn failed: {}", s),
            ThreadError::JoinFailed(s) => write!(f, "Thread join failed: {}", s),
        }
    }
}

impl std::error::Error for ThreadError {}

pub type Result<T> = std::result::Result<T, ThreadError>;

/// Handle to a spawned thread
///
/// Wraps a `JoinHandle` together with the name it was spawned under, so the
/// name can still be logged after the thread has exited.
pub struct Thread<T> {
    handle: Option<JoinHandle<T>>,
    name: String,
}

impl<T> Thread<T> {
    /// Spawn a new named thread that executes the given function
    ///
    /// # Errors
    /// Returns `ThreadError::SpawnFailed` if the OS refuses to create the thread
    pub fn spawn<F>(name: &str, f: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(f)
            .map_err(|e| ThreadError::SpawnFailed(format!("{}: {}", name, e)))?;

        Ok(Self {
            handle: Some(handle),
            name: name.to_string(),
        })
    }

    /// Wait for the thread to finish and return its result
    ///
    /// # Errors
    /// Returns `ThreadError::JoinFailed` if the thread panicked
    pub fn join(mut self) -> Result<T> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ThreadError::JoinFailed(format!("{} panicked", self.name))),
            None => Err(ThreadError::JoinFailed(format!(
                "{} already joined",
                self.name
            ))),
        }
    }

    /// Check if the thread is still running
    pub fn is_running(&self) -> bool {
        match &self.handle {
            Some(handle) => !handle.is_finished(),
            None => false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> fmt::Debug for Thread<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}
