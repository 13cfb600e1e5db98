//!  src/util/debounce.rs
//!  ===================================================================
//!  Trailing-edge debouncer for keystroke storms
//!
//!  • 100 % async-safe: no busy-waits, no un-awaited tasks.
//!  • One pending sleeper at a time; every `submit` aborts the previous
//!    one, so only the last value of a burst is ever delivered.
//!  • Every delivery carries the sequence number of the submit that
//!    produced it. A tick that was already queued when a newer submit
//!    arrived is recognisable as stale through `is_current`.

use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::{debug, trace};

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone)]
pub struct DebounceConfig {
    pub delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_input()
    }
}

impl DebounceConfig {
    /// Quick config for search input debouncing
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: Duration::from_millis(200),
        }
    }

    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

/* ============================ Debouncer ============================ */

/// A value that survived its settle window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounced<T> {
    pub seq: u64,
    pub value: T,
}

pub struct Debouncer<T> {
    cfg: DebounceConfig,
    seq: u64,
    sleeper: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Debounced<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a new debouncer and its Rx endpoint
    #[must_use]
    pub fn new(cfg: DebounceConfig) -> (Self, mpsc::UnboundedReceiver<Debounced<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let deb = Self {
            cfg,
            seq: 0,
            sleeper: None,
            tx,
        };
        (deb, rx)
    }

    /// Submit an event; restarts the settle window.
    pub fn submit(&mut self, ev: T) {
        self.seq += 1;
        let seq = self.seq;
        trace!("Debouncer received event #{}", seq);

        // Cancel any existing sleeper
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }

        let delay = self.cfg.delay;
        let tx = self.tx.clone();

        self.sleeper = Some(tokio::spawn(async move {
            sleep(delay).await;
            debug!("Triggering trailing edge for event #{}", seq);
            let _ = tx.send(Debounced { seq, value: ev });
        }));
    }

    /// Drop the pending event, if any, and invalidate queued ticks.
    pub fn cancel(&mut self) {
        self.seq += 1;
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
            trace!("Debouncer cancelled pending event");
        }
    }

    /// True when `seq` belongs to the most recent submit.
    #[must_use]
    pub const fn is_current(&self, seq: u64) -> bool {
        seq == self.seq
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_delivers_only_last_value() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::search_input());

        for word in ["i", "in", "ins", "inst", "install"] {
            deb.submit(word);
            tokio::time::advance(Duration::from_millis(50)).await;
        }

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.value, "install");
        assert!(deb.is_current(fired.seq));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_fire() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::with_delay(Duration::from_millis(200)));

        deb.submit(1);
        let first = rx.recv().await.unwrap();
        deb.submit(2);
        let second = rx.recv().await.unwrap();

        assert_eq!((first.value, second.value), (1, 2));
        assert!(!deb.is_current(first.seq));
        assert!(deb.is_current(second.seq));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_pending_and_queued() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::search_input());

        deb.submit("queued");
        tokio::time::sleep(Duration::from_millis(250)).await;
        // tick is already in the channel; cancel must still mark it stale
        deb.cancel();
        let queued = rx.recv().await.unwrap();
        assert!(!deb.is_current(queued.seq));

        deb.submit("pending");
        deb.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
