use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_channel::oneshot;

/// How a choice window ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// OK on an enabled entry.
    Chosen(usize),
    /// Cancel input, resolved to a slot or a cancel-branch value.
    Cancelled(usize),
    /// The auto-resolve timer ran out; `None` when nothing was eligible.
    TimedOut(Option<usize>),
    /// Nothing survived filtering, so no window was shown.
    Empty,
    /// The window was torn down before resolving (scene change).
    Aborted,
}

impl ChoiceOutcome {
    /// Branch value for the host, -1 meaning "no selection".
    pub fn value(&self) -> i32 {
        match *self {
            Self::Chosen(slot) | Self::Cancelled(slot) | Self::TimedOut(Some(slot)) => slot as i32,
            Self::TimedOut(None) | Self::Empty | Self::Aborted => -1,
        }
    }
}

/// Resolves once the choice window it came from resolves.
///
/// The caller's script suspends on this instead of polling the window.
#[derive(Debug)]
pub struct ChoiceHandle {
    rx: oneshot::Receiver<ChoiceOutcome>,
    // The channel hands its value out once; later polls read this.
    outcome: Option<ChoiceOutcome>,
}

impl ChoiceHandle {
    pub(crate) fn channel() -> (oneshot::Sender<ChoiceOutcome>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx, outcome: None })
    }

    /// Non-blocking check, for hosts that poll once per frame. Keeps
    /// returning the same outcome once the window has resolved.
    pub fn try_outcome(&mut self) -> Option<ChoiceOutcome> {
        if self.outcome.is_none() {
            self.outcome = match self.rx.try_recv() {
                Ok(outcome) => outcome,
                Err(oneshot::Canceled) => Some(ChoiceOutcome::Aborted),
            };
        }
        self.outcome
    }
}

impl Future for ChoiceHandle {
    type Output = ChoiceOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = self.outcome {
            return Poll::Ready(outcome);
        }
        let outcome = ready!(Pin::new(&mut self.rx).poll(cx)).unwrap_or(ChoiceOutcome::Aborted);
        self.outcome = Some(outcome);
        Poll::Ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values() {
        assert_eq!(ChoiceOutcome::Chosen(6).value(), 6);
        assert_eq!(ChoiceOutcome::Cancelled(4).value(), 4);
        assert_eq!(ChoiceOutcome::TimedOut(None).value(), -1);
        assert_eq!(ChoiceOutcome::Empty.value(), -1);
    }

    #[test]
    fn dropped_sender_aborts() {
        let (tx, handle) = ChoiceHandle::channel();
        drop(tx);
        assert_eq!(pollster::block_on(handle), ChoiceOutcome::Aborted);
    }

    #[test]
    fn try_outcome_before_and_after() {
        let (tx, mut handle) = ChoiceHandle::channel();
        assert_eq!(handle.try_outcome(), None);
        tx.send(ChoiceOutcome::Chosen(1)).unwrap();
        assert_eq!(handle.try_outcome(), Some(ChoiceOutcome::Chosen(1)));
    }

    #[test]
    fn outcome_is_kept_after_first_read() {
        let (tx, mut handle) = ChoiceHandle::channel();
        tx.send(ChoiceOutcome::Cancelled(4)).unwrap();
        assert_eq!(handle.try_outcome(), Some(ChoiceOutcome::Cancelled(4)));
        assert_eq!(handle.try_outcome(), Some(ChoiceOutcome::Cancelled(4)));
        assert_eq!(pollster::block_on(handle), ChoiceOutcome::Cancelled(4));
    }
}
