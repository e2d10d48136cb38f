//! Named retry-policy definitions.
//!
//! A retry policy pairs an attempt budget with a delay strategy. The registry
//! stores policies by name and client definitions reference them by name.
//! Running the retry loop is the caller's concern; the policy only computes
//! the delay for a given attempt.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_multiplier() -> f64 {
    1.5
}

/// Delay strategy for a retry policy.
///
/// The wire format matches generated configuration documents:
/// `{"type": "constant_delay", "params": {"delay_ms": 200}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum RetryStrategy {
    /// The same delay before every retry.
    ConstantDelay {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },
    /// Delay grows by `multiplier` per attempt, capped at `max_delay_ms`.
    ExponentialBackoff {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        #[serde(default = "default_max_delay_ms")]
        max_delay_ms: u64,
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::ExponentialBackoff {
            delay_ms: default_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// A retry policy definition: attempt budget plus delay strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt.
    pub max_retries: u32,
    #[serde(default)]
    pub strategy: RetryStrategy,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, strategy: RetryStrategy) -> Self {
        Self {
            max_retries,
            strategy,
        }
    }

    /// Policy with a constant delay between attempts.
    pub const fn constant_delay(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            strategy: RetryStrategy::ConstantDelay { delay_ms },
        }
    }

    /// Policy with exponential backoff.
    pub const fn exponential_backoff(
        max_retries: u32,
        delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
    ) -> Self {
        Self {
            max_retries,
            strategy: RetryStrategy::ExponentialBackoff {
                delay_ms,
                max_delay_ms,
                multiplier,
            },
        }
    }

    /// Delay before retry `attempt`, 0-based: attempt 0 is the first retry.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self.strategy {
            RetryStrategy::ConstantDelay { delay_ms } => Duration::from_millis(delay_ms),
            RetryStrategy::ExponentialBackoff {
                delay_ms,
                max_delay_ms,
                multiplier,
            } => {
                let delay = (delay_ms as f64) * multiplier.powi(attempt as i32);
                let capped = delay.min(max_delay_ms as f64);
                Duration::from_millis(capped as u64)
            }
        }
    }
}
