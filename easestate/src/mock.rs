//! Scripted operations for exercising containers in tests.

use crate::OperationFuture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

struct Script<A, T, E> {
    /// Outcomes handed out in order, one per call
    results: VecDeque<Result<T, E>>,
    /// Used once the queue is empty
    fallback: Option<Box<dyn Fn() -> Result<T, E> + Send>>,
    /// Arguments of every call so far
    calls: Vec<A>,
    delay: Option<Duration>,
}

/// An operation whose outcomes are queued up front.
///
/// Each call records its arguments, takes the next queued outcome and resolves
/// to it after the optional delay. Clones share the same script.
pub struct MockOperation<A, T, E> {
    script: Arc<Mutex<Script<A, T, E>>>,
}

impl<A, T, E> MockOperation<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        MockOperation {
            script: Arc::new(Mutex::new(Script {
                results: VecDeque::new(),
                fallback: None,
                calls: Vec::new(),
                delay: None,
            })),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script<A, T, E>> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_ok(&self, value: T) -> &Self {
        self.script().results.push_back(Ok(value));
        self
    }

    pub fn push_err(&self, error: E) -> &Self {
        self.script().results.push_back(Err(error));
        self
    }

    pub fn push_sequence(&self, results: impl IntoIterator<Item = Result<T, E>>) -> &Self {
        self.script().results.extend(results);
        self
    }

    /// Outcome produced for every call once the queue runs dry.
    pub fn fallback<F>(&self, fallback: F) -> &Self
    where
        F: Fn() -> Result<T, E> + Send + 'static,
    {
        self.script().fallback = Some(Box::new(fallback));
        self
    }

    pub fn set_delay(&self, delay: Duration) -> &Self {
        self.script().delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.script().calls.len()
    }

    pub fn calls(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.script().calls.clone()
    }

    pub fn remaining(&self) -> usize {
        self.script().results.len()
    }

    /// The operation to hand to a container.
    ///
    /// # Panics
    ///
    /// A call panics when the queue is empty and no fallback is set.
    pub fn operation(&self) -> impl Fn(A) -> OperationFuture<T, E> + Send + Sync + 'static {
        let script = Arc::clone(&self.script);
        move |args: A| -> OperationFuture<T, E> {
            let (outcome, delay) = {
                let mut script = script.lock().unwrap_or_else(PoisonError::into_inner);
                script.calls.push(args);
                let outcome = match script.results.pop_front() {
                    Some(outcome) => outcome,
                    None => match &script.fallback {
                        Some(fallback) => fallback(),
                        None => panic!("MockOperation called with no scripted outcome left"),
                    },
                };
                (outcome, script.delay)
            };
            Box::pin(async move {
                if let Some(delay) = delay {
                    sleep(delay).await;
                }
                outcome
            })
        }
    }
}

impl<A, T, E> Default for MockOperation<A, T, E>
where
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T, E> Clone for MockOperation<A, T, E> {
    fn clone(&self) -> Self {
        MockOperation {
            script: Arc::clone(&self.script),
        }
    }
}
