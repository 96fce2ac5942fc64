// sweetshop/core/src/ledger/retry.rs

use rand::Rng;
use std::time::Duration;

/// Bounded retry with capped, jittered exponential backoff for contended records.
///
/// `max_attempts` counts every try, including the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub initial_backoff: Duration,
  pub max_backoff: Duration,
  pub multiplier: f64,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 8,
      initial_backoff: Duration::from_millis(5),
      max_backoff: Duration::from_millis(200),
      multiplier: 2.0,
    }
  }
}

impl RetryPolicy {
  /// A policy that never waits between attempts. Handy for tests.
  pub fn immediate(max_attempts: u32) -> Self {
    Self {
      max_attempts,
      initial_backoff: Duration::ZERO,
      max_backoff: Duration::ZERO,
      multiplier: 1.0,
    }
  }

  pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
    self.max_attempts = max_attempts.max(1);
    self
  }

  /// Delay to wait after the given failed attempt (1-based).
  ///
  /// Scaled by a random factor in `[0.5, 1.0]` so callers that collided once do
  /// not wake up together and collide again.
  pub fn delay_after(&self, attempt: u32) -> Duration {
    let base = self.base_delay_after(attempt);
    if base.is_zero() {
      return base;
    }
    base.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
  }

  /// Un-jittered delay after the given failed attempt.
  fn base_delay_after(&self, attempt: u32) -> Duration {
    if attempt == 0 || self.initial_backoff.is_zero() {
      return Duration::ZERO;
    }
    let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
    let scaled = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
    let capped = scaled.min(self.max_backoff.as_secs_f64());
    Duration::from_secs_f64(capped.max(0.0))
  }

  pub fn allows_another(&self, attempts_made: u32) -> bool {
    attempts_made < self.max_attempts
  }
}
