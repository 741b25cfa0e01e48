//! Cosmetic progress ticker.
//!
//! Advances a synthetic percentage on a fixed schedule while a remote edit
//! is in flight. The value is presentation-only: it is never read for
//! completion detection.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Interval between synthetic progress steps.
pub const PROGRESS_TICK: Duration = Duration::from_millis(400);
/// Size of each synthetic step.
pub const PROGRESS_STEP: u8 = 10;
/// The ticker never passes this; only a real completion reaches 100.
pub const PROGRESS_CEILING: u8 = 90;

/// Background task advancing a progress watch channel.
#[derive(Debug)]
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Start ticking from the channel's current value.
    pub fn start(progress: Arc<watch::Sender<u8>>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(PROGRESS_TICK);
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let current = *progress.borrow();
                if current < PROGRESS_CEILING {
                    let _ = progress.send((current + PROGRESS_STEP).min(PROGRESS_CEILING));
                }
            }
        });
        Self { handle }
    }

    /// Stop ticking. The caller decides the final value (100 on success,
    /// 0 on failure or exit from the processing phase).
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticker_advances_and_caps() {
        let (tx, rx) = watch::channel(0u8);
        let tx = Arc::new(tx);

        let ticker = ProgressTicker::start(tx.clone());

        tokio::time::sleep(PROGRESS_TICK * 3 + Duration::from_millis(10)).await;
        assert_eq!(*rx.borrow(), 30);

        // Well past the cap
        tokio::time::sleep(PROGRESS_TICK * 20).await;
        ticker.stop();
        assert_eq!(*rx.borrow(), PROGRESS_CEILING);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_value() {
        let (tx, rx) = watch::channel(0u8);
        let ticker = ProgressTicker::start(Arc::new(tx));

        tokio::time::sleep(PROGRESS_TICK + Duration::from_millis(10)).await;
        ticker.stop();
        let frozen = *rx.borrow();

        tokio::time::sleep(PROGRESS_TICK * 5).await;
        assert_eq!(*rx.borrow(), frozen);
    }
}
