//! Crate-wide error type returned by the host-facing calls and by lifecycle
//! transitions.

use crate::audio::AudioError;
use crate::graphics::GraphicsError;
use crate::queue::QueueError;
use crate::threading::ThreadError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// The app instance has processed Destroy.
    #[error("App instance is terminated")]
    Terminated,

    /// The app thread stopped on an unrecoverable error.
    #[error("App instance failed: {0}")]
    Failed(String),

    #[error("Graphics setup failed: {0}")]
    Graphics(#[from] GraphicsError),

    #[error("Audio output failed: {0}")]
    Audio(#[from] AudioError),

    #[error("Failed to initialize {component}: {reason}")]
    CollaboratorInit {
        component: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Thread(#[from] ThreadError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn collaborator(component: &'static str, reason: impl Into<String>) -> Self {
        Self::CollaboratorInit {
            component,
            reason: reason.into(),
        }
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Closed => Self::Terminated,
            QueueError::Failed(reason) => Self::Failed(reason),
        }
    }
}
