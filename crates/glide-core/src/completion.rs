//! Future resolved when an animation emits its `end` event.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;

/// Resolves once, on the first `end` emission after it was created.
///
/// Obtained from [`Animation::finished`](crate::Animation::finished). Time
/// only moves when the scheduler does, so poll it from the same thread that
/// drives the scheduler. Yields [`oneshot::Canceled`] if the animation is
/// dropped before it ends.
#[derive(Debug)]
pub struct Completion {
    receiver: oneshot::Receiver<()>,
    done: bool,
}

/// Sending half kept by the `end` listener.
#[derive(Debug)]
pub(crate) struct Resolver {
    sender: Option<oneshot::Sender<()>>,
}

impl Resolver {
    pub(crate) fn resolve(&mut self) {
        if let Some(sender) = self.sender.take() {
            // The receiver may already be gone; nothing waits then.
            let _ = sender.send(());
        }
    }
}

impl Completion {
    pub(crate) fn channel() -> (Resolver, Self) {
        let (sender, receiver) = oneshot::channel();
        (
            Resolver {
                sender: Some(sender),
            },
            Self {
                receiver,
                done: false,
            },
        )
    }

    /// Whether `end` has been emitted, without waiting.
    pub fn is_done(&mut self) -> bool {
        if !self.done {
            self.done = matches!(self.receiver.try_recv(), Ok(Some(())));
        }
        self.done
    }
}

impl Future for Completion {
    type Output = Result<(), oneshot::Canceled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.done {
            return Poll::Ready(Ok(()));
        }
        let result = self.receiver.poll_unpin(cx);
        if let Poll::Ready(Ok(())) = result {
            self.done = true;
        }
        result
    }
}
