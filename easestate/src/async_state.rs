use std::sync::Arc;

/// The observable fields of a container at one point in time.
///
/// `data` and `error` use `None` as the "nothing yet" marker. The error is kept
/// exactly as the operation produced it, behind an `Arc` so every reader shares
/// the same value.
#[derive(Debug, PartialEq)]
pub struct Snapshot<T, E> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<Arc<E>>,
}

impl<T, E> Snapshot<T, E> {
    pub fn status(&self) -> Async<T, E>
    where
        T: Clone,
    {
        Async::from(self)
    }
}

impl<T: Clone, E> Clone for Snapshot<T, E> {
    fn clone(&self) -> Self {
        Snapshot {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

impl<T, E> Default for Snapshot<T, E> {
    fn default() -> Self {
        Snapshot {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Lifecycle view of a container, folded from its [`Snapshot`].
#[derive(Debug, PartialEq)]
pub enum Async<T, E> {
    Uninitialized,
    Loading(Option<T>),
    Success { value: T },
    Fail { error: Arc<E>, value: Option<T> },
}

impl<T, E> Async<T, E> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Async::Success { .. } | Async::Fail { .. })
    }

    pub fn should_load(&self) -> bool {
        matches!(self, Async::Uninitialized | Async::Fail { .. })
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Async::Uninitialized | Async::Loading(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Async::Loading(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Async::Success { .. })
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Async::Fail { .. })
    }

    /// The retained data, whatever the phase.
    pub fn value_ref(&self) -> Option<&T> {
        match self {
            Async::Uninitialized => None,
            Async::Loading(value) => value.as_ref(),
            Async::Success { value } => Some(value),
            Async::Fail { value, .. } => value.as_ref(),
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Async::Uninitialized => None,
            Async::Loading(value) => value,
            Async::Success { value } => Some(value),
            Async::Fail { value, .. } => value,
        }
    }

    pub fn error(&self) -> Option<&Arc<E>> {
        match self {
            Async::Fail { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl<T: Clone, E> Clone for Async<T, E> {
    fn clone(&self) -> Self {
        match self {
            Async::Uninitialized => Async::Uninitialized,
            Async::Loading(value) => Async::Loading(value.clone()),
            Async::Success { value } => Async::Success {
                value: value.clone(),
            },
            Async::Fail { error, value } => Async::Fail {
                error: Arc::clone(error),
                value: value.clone(),
            },
        }
    }
}

impl<T, E> Default for Async<T, E> {
    fn default() -> Self {
        Async::Uninitialized
    }
}

impl<T: Clone, E> From<&Snapshot<T, E>> for Async<T, E> {
    fn from(snapshot: &Snapshot<T, E>) -> Self {
        if snapshot.loading {
            return Async::Loading(snapshot.data.clone());
        }
        match (&snapshot.error, &snapshot.data) {
            (Some(error), value) => Async::Fail {
                error: Arc::clone(error),
                value: value.clone(),
            },
            (None, Some(value)) => Async::Success {
                value: value.clone(),
            },
            (None, None) => Async::Uninitialized,
        }
    }
}
