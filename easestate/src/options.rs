use serde::{Deserialize, Serialize};

/// Construction options for an [`AsyncState`](crate::AsyncState).
///
/// Missing keys fall back to their defaults when deserialized, so an empty
/// JSON object is a valid configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncStateOptions {
    /// Start one invocation with empty arguments as soon as the container is built.
    pub immediate: bool,
}

impl AsyncStateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }
}
