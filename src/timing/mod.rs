//! Pacing for human-like interaction
//!
//! The remote service gives no signal when rendering or read tracking has
//! finished, so the sweep waits instead. Two kinds of waits exist:
//! - fixed settle delays after navigation and reading
//! - randomized pauses drawn from a [`DelayPolicy`] between interactions
//!
//! All waits go through [`Pacing`], which owns a [`Sleeper`] and the random
//! source, so tests can swap in a recording sleeper and a seeded rng.

mod policy;
mod sleeper;

pub use policy::DelayPolicy;
pub use sleeper::{Sleeper, TokioSleeper};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Owns the sleeper and random source used for every pause in a run
pub struct Pacing {
    sleeper: Box<dyn Sleeper>,
    rng: StdRng,
}

impl Pacing {
    pub fn new(sleeper: Box<dyn Sleeper>, rng: StdRng) -> Self {
        Self { sleeper, rng }
    }

    /// Real-time pacing with an OS-seeded random source
    pub fn realtime() -> Self {
        Self::new(Box::new(TokioSleeper), StdRng::from_os_rng())
    }

    /// Deterministic pacing, for reproducible runs and tests
    pub fn seeded(sleeper: Box<dyn Sleeper>, seed: u64) -> Self {
        Self::new(sleeper, StdRng::seed_from_u64(seed))
    }

    /// Waits a fixed settle interval
    pub async fn settle(&mut self, duration: Duration) {
        self.sleeper.sleep(duration).await;
    }

    /// Waits a random duration drawn from `policy` and returns it
    pub async fn pause(&mut self, policy: &DelayPolicy) -> Duration {
        let duration = policy.sample(&mut self.rng);
        self.sleeper.sleep(duration).await;
        duration
    }

    /// Draws a value uniformly from `low..=high`
    pub fn draw(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }
}

impl std::fmt::Debug for Pacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacing").finish_non_exhaustive()
    }
}
