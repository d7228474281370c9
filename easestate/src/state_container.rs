use crate::{AsyncStateError, AsyncStateOptions, Async, OperationFuture, Snapshot};
use futures_signals::signal::{Mutable, MutableSignalCloned, SignalExt, SignalStream};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

type Operation<A, T, E> = Box<dyn Fn(A) -> OperationFuture<T, E> + Send + Sync>;

struct Inner<A, T, E> {
    cell: Mutable<Snapshot<T, E>>,
    operation: Operation<A, T, E>,
    invocations: AtomicU64,
}

impl<A, T, E> Inner<A, T, E>
where
    A: 'static,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Starts one invocation.
    ///
    /// `loading` is raised, `error` cleared and the operation called before
    /// this returns; the returned future only waits for settlement.
    fn invoke(self: &Arc<Self>, args: A) -> impl Future<Output = Option<T>> + Send + 'static {
        let id = self.invocations.fetch_add(1, Ordering::Relaxed) + 1;
        {
            let mut cell = self.cell.lock_mut();
            cell.loading = true;
            cell.error = None;
        }
        trace!(invocation = id, "invocation started");

        let mut in_flight = InFlight {
            cell: self.cell.clone(),
            id,
            settled: false,
        };
        let pending = (self.operation)(args);
        async move {
            let outcome = pending.await;
            in_flight.settle(outcome)
        }
    }

    fn spawn(self: &Arc<Self>, args: A) -> Result<Invocation<T>, AsyncStateError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| AsyncStateError::NoRuntime)?;
        Ok(Invocation {
            handle: handle.spawn(self.invoke(args)),
        })
    }
}

/// Settles exactly one invocation; lowers `loading` if dropped unsettled.
struct InFlight<T, E> {
    cell: Mutable<Snapshot<T, E>>,
    id: u64,
    settled: bool,
}

impl<T: Clone, E> InFlight<T, E> {
    fn settle(&mut self, outcome: Result<T, E>) -> Option<T> {
        let mut cell = self.cell.lock_mut();
        match outcome {
            Ok(value) => {
                cell.data = Some(value);
                debug!(invocation = self.id, "invocation succeeded");
            }
            Err(error) => {
                cell.error = Some(Arc::new(error));
                debug!(invocation = self.id, "invocation failed, error captured");
            }
        }
        cell.loading = false;
        self.settled = true;
        cell.data.clone()
    }
}

impl<T, E> Drop for InFlight<T, E> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(invocation = self.id, "invocation dropped before it settled");
            self.cell.lock_mut().loading = false;
        }
    }
}

/// A container tracking the data, loading flag and error of one async operation.
///
/// The operation takes its arguments as a single value `A`; use a tuple for
/// several arguments and `()` for none. Every call to [`run`](Self::run) (or a
/// [`Trigger`] obtained from this container) updates only this container.
///
/// Overlapping invocations are not sequenced: each one writes the shared
/// fields when it starts and when it settles, so the container reflects
/// whichever invocation touched it last.
pub struct AsyncState<A, T, E> {
    inner: Arc<Inner<A, T, E>>,
}

impl<A, T, E> AsyncState<A, T, E>
where
    A: 'static,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Wraps `operation` without running it.
    pub fn new<F, Fut>(operation: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let boxed: Operation<A, T, E> =
            Box::new(move |args: A| -> OperationFuture<T, E> { Box::pin(operation(args)) });
        AsyncState {
            inner: Arc::new(Inner {
                cell: Mutable::new(Snapshot::default()),
                operation: boxed,
                invocations: AtomicU64::new(0),
            }),
        }
    }

    /// Wraps `operation`, starting one invocation with `A::default()` when
    /// `options.immediate` is set. The invocation runs as a detached tokio task.
    ///
    /// # Panics
    ///
    /// Panics when `options.immediate` is set outside of a tokio runtime. See
    /// [`try_with_options`](Self::try_with_options) for the fallible form.
    pub fn with_options<F, Fut>(operation: F, options: AsyncStateOptions) -> Self
    where
        A: Default,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let state = Self::new(operation);
        if options.immediate {
            tokio::spawn(state.inner.invoke(A::default()));
        }
        state
    }

    /// Like [`with_options`](Self::with_options), but reports a missing
    /// runtime instead of panicking. Nothing is invoked in that case.
    pub fn try_with_options<F, Fut>(
        operation: F,
        options: AsyncStateOptions,
    ) -> Result<Self, AsyncStateError>
    where
        A: Default,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let state = Self::new(operation);
        if options.immediate {
            let _detached = state.inner.spawn(A::default())?;
        }
        Ok(state)
    }

    /// Runs the operation once and resolves to `data` after it settles.
    ///
    /// `loading` is already true when this returns. A failure is stored in
    /// `error` and never surfaces here; the output is then the data retained
    /// from earlier invocations.
    pub fn run(&self, args: A) -> impl Future<Output = Option<T>> + Send + 'static {
        self.inner.invoke(args)
    }

    /// Runs the operation on the tokio runtime; it settles even if the
    /// returned handle is dropped.
    pub fn spawn(&self, args: A) -> Result<Invocation<T>, AsyncStateError> {
        self.inner.spawn(args)
    }

    /// A cloneable handle that runs this container's operation.
    pub fn trigger(&self) -> Trigger<A, T, E> {
        Trigger {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn data(&self) -> Option<T> {
        self.inner.cell.lock_ref().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.cell.lock_ref().loading
    }

    pub fn is_loading(&self) -> bool {
        self.loading()
    }

    pub fn error(&self) -> Option<Arc<E>> {
        self.inner.cell.lock_ref().error.clone()
    }

    pub fn snapshot(&self) -> Snapshot<T, E> {
        self.inner.cell.get_cloned()
    }

    pub fn status(&self) -> Async<T, E> {
        Async::from(&*self.inner.cell.lock_ref())
    }

    /// Number of invocations started on this container.
    pub fn invocations(&self) -> u64 {
        self.inner.invocations.load(Ordering::Relaxed)
    }

    /// Waits until no invocation is in flight and returns the fields at that point.
    pub async fn settled(&self) -> Snapshot<T, E> {
        loop {
            let snapshot = self.snapshot();
            if !snapshot.loading {
                return snapshot;
            }
            let _ = self
                .inner
                .cell
                .signal_ref(|snapshot| snapshot.loading)
                .wait_for(false)
                .await;
        }
    }

    pub fn to_signal(&self) -> MutableSignalCloned<Snapshot<T, E>> {
        self.inner.cell.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<Snapshot<T, E>>> {
        self.to_signal().to_stream()
    }
}

impl<A, T, E> fmt::Debug for AsyncState<A, T, E>
where
    T: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.inner.cell.lock_ref();
        f.debug_struct("AsyncState")
            .field("data", &cell.data)
            .field("loading", &cell.loading)
            .field("error", &cell.error)
            .finish()
    }
}

/// Runs the operation of the container it was taken from, and only that one.
pub struct Trigger<A, T, E> {
    inner: Arc<Inner<A, T, E>>,
}

impl<A, T, E> Trigger<A, T, E>
where
    A: 'static,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// See [`AsyncState::run`].
    pub fn run(&self, args: A) -> impl Future<Output = Option<T>> + Send + 'static {
        self.inner.invoke(args)
    }

    /// See [`AsyncState::spawn`].
    pub fn spawn(&self, args: A) -> Result<Invocation<T>, AsyncStateError> {
        self.inner.spawn(args)
    }

    pub fn is_bound_to(&self, state: &AsyncState<A, T, E>) -> bool {
        Arc::ptr_eq(&self.inner, &state.inner)
    }
}

impl<A, T, E> Clone for Trigger<A, T, E> {
    fn clone(&self) -> Self {
        Trigger {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Handle to a spawned invocation, resolving to the container's data once it settles.
#[must_use = "dropping the handle detaches the invocation; await it to observe the data"]
pub struct Invocation<T> {
    handle: JoinHandle<Option<T>>,
}

impl<T> Future for Invocation<T> {
    type Output = Result<Option<T>, AsyncStateError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| {
            joined.map_err(|error| {
                let error = AsyncStateError::from(error);
                warn!(%error, "spawned invocation did not complete");
                error
            })
        })
    }
}

/// Builds a container for `operation`; see [`AsyncState::with_options`].
pub fn create_async_state<A, T, E, F, Fut>(operation: F, options: AsyncStateOptions) -> AsyncState<A, T, E>
where
    A: Default + 'static,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    AsyncState::with_options(operation, options)
}

/// Fallible form of [`create_async_state`]; see [`AsyncState::try_with_options`].
pub fn try_create_async_state<A, T, E, F, Fut>(
    operation: F,
    options: AsyncStateOptions,
) -> Result<AsyncState<A, T, E>, AsyncStateError>
where
    A: Default + 'static,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    AsyncState::try_with_options(operation, options)
}
