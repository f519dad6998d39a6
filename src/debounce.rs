//! Trailing-edge debounce for rapid parameter input.
//!
//! Each control owns one [`Debouncer`]. Every call cancels the pending action
//! and restarts the timer, so only the last value of a burst is applied.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Delay for slider and color input.
pub const COLOR_DEBOUNCE: Duration = Duration::from_millis(300);
/// Delay for text field input.
pub const TEXT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runs only the most recent action after `delay` of quiet.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules `action`, discarding any action still waiting.
    pub fn call<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drops the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while an action is scheduled but has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(COLOR_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn only_last_value_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(COLOR_DEBOUNCE);

        for value in [0.1_f32, 0.2, 0.3] {
            let tx = tx.clone();
            debouncer.call(move || {
                let _ = tx.send(value);
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(rx.recv().await, Some(0.3));
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_restarts_on_each_call() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(TEXT_DEBOUNCE);

        let first = tx.clone();
        debouncer.call(move || {
            let _ = first.send("first");
        });
        tokio::time::sleep(Duration::from_millis(400)).await;

        debouncer.call(move || {
            let _ = tx.send("second");
        });
        assert!(debouncer.is_pending());

        // 800ms after the first call: the first deadline has passed but was cancelled.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_discard_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();

        let mut debouncer = Debouncer::default();
        let cancelled = tx.clone();
        debouncer.call(move || {
            let _ = cancelled.send(1);
        });
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        let mut last = Debouncer::default();
        last.call(move || {
            let _ = tx.send(2);
        });
        drop(last);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
