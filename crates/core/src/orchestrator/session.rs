//! Per-account client session.

use std::sync::{Arc, Mutex};

use super::orchestrator_service::TransactionOrchestrator;
use crate::countdown::{CountdownEngine, CountdownKey};
use crate::goals::Goal;
use crate::utils::Clock;

/// Everything that lives exactly as long as one connected account on one
/// chain: the orchestrator (with its pending-transaction state) and the
/// countdown handles. Dropped and rebuilt on account or chain change, which
/// tears down any running countdown ticker.
pub struct VaultSession {
    orchestrator: Arc<TransactionOrchestrator>,
    countdown: Mutex<CountdownEngine>,
}

impl VaultSession {
    pub fn new(orchestrator: TransactionOrchestrator, clock: Arc<dyn Clock>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            countdown: Mutex::new(CountdownEngine::new(clock)),
        }
    }

    pub fn orchestrator(&self) -> Arc<TransactionOrchestrator> {
        self.orchestrator.clone()
    }

    /// Aligns the countdown with the given goal and minimum-staking
    /// parameter, recomputing it when either changed. Returns the current
    /// remaining seconds.
    pub fn sync_countdown(&self, goal: &Goal, min_staking_secs: u64) -> u64 {
        let key = CountdownKey {
            goal_id: goal.id.clone(),
            address: self.orchestrator.address().clone(),
            min_staking_secs,
        };
        let created_at_secs = goal.created_date.timestamp().max(0) as u64;

        let mut engine = self.countdown.lock().unwrap();
        engine.sync(key, created_at_secs).remaining()
    }

    /// Tears down the countdown, e.g. when the goal was withdrawn.
    pub fn clear_countdown(&self) {
        self.countdown.lock().unwrap().clear();
    }

    /// Remaining seconds of the running countdown, if one exists.
    pub fn countdown_remaining(&self) -> Option<u64> {
        self.countdown.lock().unwrap().remaining()
    }
}
