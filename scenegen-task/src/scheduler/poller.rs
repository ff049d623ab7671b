//! Cancellable fixed-interval poller
//!
//! Drives periodic work on a tokio interval inside a spawned task until
//! the callback asks to stop or the poller is cancelled.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

/// Repeatedly invokes an async callback at a fixed interval.
///
/// The first tick fires immediately. The loop ends when the callback
/// returns [`ControlFlow::Break`] or when [`Poller::cancel`] is called;
/// dropping the handle also stops the loop. Ticks never overlap: the
/// next tick is not scheduled until the previous callback has resolved.
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawns the polling loop.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stops the loop without waiting for it to finish.
    ///
    /// A tick parked at an await point is aborted there; a request
    /// already sent to the backend is not recalled.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the polling loop is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn wait_until_stopped(poller: &Poller) {
        for _ in 0..200 {
            if !poller.is_active() {
                return;
            }
            time::sleep(Duration::from_millis(5)).await;
        }
        panic!("poller did not stop in time");
    }

    #[tokio::test]
    async fn test_first_tick_is_immediate() {
        let count = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::clone(&count);
        let _poller = Poller::spawn(Duration::from_secs(3600), move || {
            let ticks = Arc::clone(&ticks);
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_break_stops_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::clone(&count);
        let poller = Poller::spawn(Duration::from_millis(5), move || {
            let ticks = Arc::clone(&ticks);
            async move {
                if ticks.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });

        wait_until_stopped(&poller).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancel_stops_future_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::clone(&count);
        let poller = Poller::spawn(Duration::from_millis(5), move || {
            let ticks = Arc::clone(&ticks);
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        time::sleep(Duration::from_millis(30)).await;
        poller.cancel();
        wait_until_stopped(&poller).await;

        let at_cancel = count.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_cancel);
    }
}
