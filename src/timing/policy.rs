use rand::Rng;
use serde::Deserialize;
use std::time::Duration;

/// Bounds for a randomized pause
///
/// Deserialized from `{ min-ms = .., max-ms = .. }`. Validation rejects
/// `min > max`; sampling such a policy yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DelayPolicy {
    #[serde(rename = "min-ms")]
    min_ms: u64,

    #[serde(rename = "max-ms")]
    max_ms: u64,
}

impl DelayPolicy {
    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Draws a duration uniformly from `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_ms <= self.min_ms {
            return self.min();
        }
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}
