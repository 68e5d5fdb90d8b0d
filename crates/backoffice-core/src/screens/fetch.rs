use std::future::Future;

use futures::future::{AbortHandle, Abortable};
use tracing::debug;

/// One screen's in-flight request.
///
/// Starting a new fetch aborts the previous one, and every result is tagged
/// with the generation it was started under so a late reply from an older
/// request can be dropped.
#[derive(Debug, Default)]
pub struct Fetch {
    handle: Option<AbortHandle>,
    generation: u64,
}

impl Fetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` on the tokio runtime, aborting whatever ran before.
    /// Returns the generation to hand back with the result.
    pub fn spawn<F>(&mut self, task: impl FnOnce(u64) -> F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let (handle, registration) = AbortHandle::new_pair();
        self.handle = Some(handle);
        tokio::spawn(Abortable::new(task(generation), registration));
        generation
    }

    /// Abort the in-flight request; its result will be ignored.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(generation = self.generation, "Aborting in-flight fetch");
            handle.abort();
            self.generation += 1;
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }

    /// Accept a result. False for stale generations, which the caller drops.
    pub fn finish(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Fetch {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_new_fetch_aborts_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut fetch = Fetch::new();

        let slow_tx = tx.clone();
        let first = fetch.spawn(move |generation| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            let _ = slow_tx.send(generation);
        });
        let second = fetch.spawn(move |generation| async move {
            let _ = tx.send(generation);
        });

        assert_ne!(first, second);
        let got = rx.recv().await.unwrap();
        assert_eq!(got, second);
        assert!(fetch.finish(got));
        assert!(!fetch.is_running());
        // The aborted task dropped its sender without sending
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_stale_generation_rejected() {
        let mut fetch = Fetch::new();
        let generation = fetch.spawn(|_| async {});
        fetch.cancel();
        assert!(!fetch.finish(generation));

        let generation = fetch.spawn(|_| async {});
        assert!(!fetch.finish(generation + 1));
        assert!(fetch.finish(generation));
        assert!(!fetch.finish(generation));
    }

    #[tokio::test]
    async fn test_drop_aborts() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        {
            let mut fetch = Fetch::new();
            fetch.spawn(move |_| async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                let _ = tx.send(());
            });
        }
        assert_eq!(rx.recv().await, None);
    }
}
