use futures_core::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream adaptors used to follow a container's snapshots.
pub trait EaseStateStreamExt: Stream {
    /// Yields items up to and including the first one matching `done`, then ends.
    ///
    /// Handy for watching a container until an invocation settles:
    ///
    /// ```
    /// use easestate::{AsyncState, EaseStateStreamExt};
    ///
    /// async fn watch(state: &AsyncState<(), u32, String>) {
    ///     let _until_idle = state.to_stream().take_through(|snapshot| !snapshot.loading);
    /// }
    /// ```
    fn take_through<F>(self, done: F) -> TakeThrough<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        TakeThrough {
            stream: self,
            finished: false,
            done,
        }
    }
}

impl<S: ?Sized + Stream> EaseStateStreamExt for S {}

/// Stream returned by [`EaseStateStreamExt::take_through`].
#[pin_project]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct TakeThrough<S, F> {
    #[pin]
    stream: S,
    finished: bool,
    done: F,
}

impl<S, F> Stream for TakeThrough<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.finished {
            return Poll::Ready(None);
        }
        let next = futures_core::ready!(this.stream.poll_next(cx));
        match &next {
            Some(item) => *this.finished = (this.done)(item),
            None => *this.finished = true,
        }
        Poll::Ready(next)
    }
}
