//! One-shot `done` continuations.
//!
//! Callback-style collaborators (verifiers, key providers, verify callbacks)
//! receive a [`Done`] and complete it exactly once, from any task or thread.
//! The strategy awaits the paired receiver. Dropping a `Done` without
//! completing it is reported as [`Abandoned`].

use tokio::sync::oneshot;

pub struct Done<T, E> {
    tx: oneshot::Sender<Result<T, E>>,
}

/// The continuation was dropped without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("callback completed without a result")]
pub struct Abandoned;

impl<T, E> Done<T, E> {
    pub fn ok(self, value: T) {
        self.send(Ok(value));
    }

    pub fn err(self, error: E) {
        self.send(Err(error));
    }

    pub fn send(self, result: Result<T, E>) {
        // Receiver gone means the attempt is already over; nothing to report to.
        let _ = self.tx.send(result);
    }
}

impl<T, E> std::fmt::Debug for Done<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Done")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

pub(crate) struct Pending<T, E> {
    rx: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> Pending<T, E> {
    pub(crate) async fn wait(self) -> Result<Result<T, E>, Abandoned> {
        self.rx.await.map_err(|_| Abandoned)
    }
}

pub(crate) fn channel<T, E>() -> (Done<T, E>, Pending<T, E>) {
    let (tx, rx) = oneshot::channel();
    (Done { tx }, Pending { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_from_another_task() {
        let (done, pending) = channel::<u32, String>();
        tokio::spawn(async move { done.ok(7) });
        assert_eq!(pending.wait().await, Ok(Ok(7)));
    }

    #[tokio::test]
    async fn error_is_delivered() {
        let (done, pending) = channel::<u32, String>();
        done.err("boom".into());
        assert_eq!(pending.wait().await, Ok(Err("boom".to_string())));
    }

    #[tokio::test]
    async fn dropped_continuation_is_abandoned() {
        let (done, pending) = channel::<u32, String>();
        drop(done);
        assert_eq!(pending.wait().await, Err(Abandoned));
    }
}
