//! Live countdown toward the on-chain minimum staking unlock.
//!
//! One decrementing counter per active goal, ticking at one-second
//! resolution. Remaining time is recomputed from the clock on every tick, so
//! a long-lived counter cannot drift. The background task is aborted
//! deterministically when the handle is dropped, the engine is cleared, or
//! the goal identity changes.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::chain::Address;
use crate::utils::Clock;

/// Identity of a countdown. A change in any field invalidates the running
/// counter and forces a recomputation from a fresh clock read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownKey {
    pub goal_id: String,
    pub address: Address,
    pub min_staking_secs: u64,
}

/// Observable handle to one running countdown.
///
/// The counter value is seconds until withdrawal unlocks, never negative.
/// Dropping the handle stops the ticker.
pub struct CountdownHandle {
    rx: watch::Receiver<u64>,
    task: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    /// Latest published remaining-seconds value.
    pub fn remaining(&self) -> u64 {
        *self.rx.borrow()
    }

    /// A receiver for observing ticks.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Owns at most one countdown at a time, keyed by goal identity.
pub struct CountdownEngine {
    clock: Arc<dyn Clock>,
    active: Option<(CountdownKey, CountdownHandle)>,
}

impl CountdownEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            active: None,
        }
    }

    /// Ensures a countdown is running for `key`, recomputing it if the key
    /// changed. `created_at_secs` is the goal's creation instant in Unix
    /// seconds; the unlock instant is `created_at_secs + min_staking_secs`.
    pub fn sync(&mut self, key: CountdownKey, created_at_secs: u64) -> &CountdownHandle {
        let stale = match &self.active {
            Some((current, _)) => *current != key,
            None => true,
        };

        if stale {
            let unlock_at = created_at_secs.saturating_add(key.min_staking_secs);
            debug!(
                "Starting countdown for goal {} (unlock at {})",
                key.goal_id, unlock_at
            );
            let handle = Self::start(self.clock.clone(), unlock_at);
            self.active = Some((key, handle));
        }

        // Just set above when stale; present otherwise.
        &self.active.as_ref().unwrap().1
    }

    /// Stops and discards the running countdown, if any.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Remaining seconds of the running countdown, if one exists.
    pub fn remaining(&self) -> Option<u64> {
        self.active.as_ref().map(|(_, handle)| handle.remaining())
    }

    fn start(clock: Arc<dyn Clock>, unlock_at: u64) -> CountdownHandle {
        let initial = unlock_at.saturating_sub(clock.unix_secs());
        let (tx, rx) = watch::channel(initial);

        // Already unlocked: publish 0 and never start a ticker.
        if initial == 0 {
            return CountdownHandle { rx, task: None };
        }

        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let remaining = unlock_at.saturating_sub(clock.unix_secs());
                if tx.send(remaining).is_err() {
                    break;
                }
                if remaining == 0 {
                    break;
                }
            }
        });

        CountdownHandle {
            rx,
            task: Some(task),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualClock;
    use chrono::DateTime;

    fn key(min_staking_secs: u64) -> CountdownKey {
        CountdownKey {
            goal_id: "0x4444444444444444444444444444444444444444".to_string(),
            address: Address::parse("0x4444444444444444444444444444444444444444").unwrap(),
            min_staking_secs,
        }
    }

    fn clock_at(secs: i64) -> ManualClock {
        ManualClock::new(DateTime::from_timestamp(secs, 0).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_unlocked_reads_zero_without_ticker() {
        let clock = clock_at(1_700_000_100);
        let mut engine = CountdownEngine::new(Arc::new(clock));

        // Created 100 s ago with a 60 s minimum: unlocked before we looked.
        let handle = engine.sync(key(60), 1_700_000_000);
        assert_eq!(handle.remaining(), 0);
        assert!(handle.task.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_reaches_exactly_zero() {
        let clock = clock_at(1_700_000_000);
        let mut engine = CountdownEngine::new(Arc::new(clock.clone()));

        let handle = engine.sync(key(60), 1_700_000_000);
        assert_eq!(handle.remaining(), 60);

        // 61 s later the counter must read exactly 0, not negative.
        clock.advance_secs(61);
        let mut rx = handle.subscribe();
        rx.wait_for(|remaining| *remaining == 0).await.unwrap();
        assert_eq!(engine.remaining(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_is_monotonic() {
        let clock = clock_at(1_700_000_000);
        let mut engine = CountdownEngine::new(Arc::new(clock.clone()));

        let handle = engine.sync(key(10), 1_700_000_000);
        let mut rx = handle.subscribe();

        let mut prev = *rx.borrow();
        assert_eq!(prev, 10);
        for _ in 0..10 {
            clock.advance_secs(1);
            rx.changed().await.unwrap();
            let value = *rx.borrow();
            assert!(value <= prev, "countdown went up: {value} > {prev}");
            prev = value;
        }
        rx.wait_for(|remaining| *remaining == 0).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_recomputes_on_key_change() {
        let clock = clock_at(1_700_000_000);
        let mut engine = CountdownEngine::new(Arc::new(clock.clone()));

        engine.sync(key(60), 1_700_000_000);
        assert_eq!(engine.remaining(), Some(60));

        // Clock moved on; a changed min-staking parameter must recompute
        // from a fresh wall-clock read, not restart from the stale value.
        clock.advance_secs(30);
        let handle = engine.sync(key(120), 1_700_000_000);
        assert_eq!(handle.remaining(), 90);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_keeps_running_counter() {
        let clock = clock_at(1_700_000_000);
        let mut engine = CountdownEngine::new(Arc::new(clock.clone()));

        engine.sync(key(60), 1_700_000_000);
        clock.advance_secs(5);
        // Same identity: the running counter is kept, not restarted.
        let handle = engine.sync(key(60), 1_700_000_000);
        let mut rx = handle.subscribe();
        rx.wait_for(|remaining| *remaining == 55).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_tears_down_ticker() {
        let clock = clock_at(1_700_000_000);
        let mut engine = CountdownEngine::new(Arc::new(clock.clone()));

        let rx = engine.sync(key(60), 1_700_000_000).subscribe();
        engine.clear();
        assert!(engine.remaining().is_none());

        // The aborted task publishes nothing further.
        clock.advance_secs(5);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(*rx.borrow(), 60);
    }
}
