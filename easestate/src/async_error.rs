use std::any::Any;
use thiserror::Error;
use tokio::task::JoinError;

/// Errors raised by the runtime-facing paths of an [`AsyncState`](crate::AsyncState).
///
/// Failures of the wrapped operation never show up here: those are captured
/// into the container's `error` field. This enum only covers what can go wrong
/// while handing an invocation to the tokio runtime.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum AsyncStateError {
    /// A spawned invocation was requested outside of a tokio runtime.
    #[error("no tokio runtime is available to run the operation")]
    NoRuntime,

    /// The operation panicked while running in a spawned invocation.
    #[error("operation panicked: {0}")]
    Panicked(String),

    /// The spawned invocation was aborted before it settled.
    #[error("invocation was aborted!")]
    Aborted,
}

impl AsyncStateError {
    /// Returns true if this error reports a missing runtime.
    pub fn is_no_runtime(&self) -> bool {
        matches!(self, AsyncStateError::NoRuntime)
    }

    /// Returns true if the operation panicked.
    pub fn is_panicked(&self) -> bool {
        matches!(self, AsyncStateError::Panicked(_))
    }

    /// Returns true if the invocation was aborted.
    pub fn is_aborted(&self) -> bool {
        matches!(self, AsyncStateError::Aborted)
    }
}

impl From<JoinError> for AsyncStateError {
    fn from(error: JoinError) -> Self {
        if error.is_panic() {
            AsyncStateError::Panicked(panic_message(error.into_panic()))
        } else {
            AsyncStateError::Aborted
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send + 'static>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
