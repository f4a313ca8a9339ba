//! Countdown module - live minimum-staking countdown per active goal.

mod countdown_engine;

pub use countdown_engine::{CountdownEngine, CountdownHandle, CountdownKey};
