//! Failed-attempt tracking and lockout.
//!
//! The guard counts failed retrievals across the whole vault, not per
//! record. Once the count reaches the policy threshold the vault is locked
//! until a successful reauthorization. The cooldown only gates when
//! reauthorization is accepted; it never unlocks the vault on its own.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, VaultError};

/// Default number of failed retrievals before locking.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default wait after the latest failure before reauthorization.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Lockout threshold and cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_attempts: u32,
    cooldown: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl LockoutPolicy {
    /// # Errors
    ///
    /// Returns `VaultError::Config` if `max_attempts` is zero.
    pub fn new(max_attempts: u32, cooldown: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(VaultError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            cooldown,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

/// Snapshot of the failed-attempt counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptState {
    pub failed_count: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Open,
    Locked,
}

/// Session-wide lockout state machine.
#[derive(Debug)]
pub struct AttemptGuard {
    policy: LockoutPolicy,
    state: AttemptState,
    clock: Arc<dyn Clock>,
}

impl AttemptGuard {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: LockoutPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            state: AttemptState::default(),
            clock,
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Count a failed retrieval. Returns the state after the update.
    pub fn record_failure(&mut self) -> LockState {
        let was_locked = self.is_locked();
        self.state.failed_count = self.state.failed_count.saturating_add(1);
        self.state.last_failure_at = Some(self.clock.now());

        if self.is_locked() && !was_locked {
            tracing::warn!(
                failed_count = self.state.failed_count,
                cooldown_secs = self.policy.cooldown.as_secs(),
                "vault locked after repeated failed retrievals"
            );
        }
        self.lock_state()
    }

    /// Clear all failure state.
    pub fn record_success(&mut self) {
        self.state = AttemptState::default();
    }

    pub fn is_locked(&self) -> bool {
        self.state.failed_count >= self.policy.max_attempts
    }

    pub fn lock_state(&self) -> LockState {
        if self.is_locked() {
            LockState::Locked
        } else {
            LockState::Open
        }
    }

    pub fn failed_count(&self) -> u32 {
        self.state.failed_count
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.policy
            .max_attempts
            .saturating_sub(self.state.failed_count)
    }

    /// Time left before reauthorization is accepted. Zero while open.
    pub fn cooldown_remaining(&self) -> Duration {
        if !self.is_locked() {
            return Duration::ZERO;
        }
        let Some(last_failure) = self.state.last_failure_at else {
            return Duration::ZERO;
        };

        // A clock that moved backwards counts as no time elapsed.
        let elapsed = (self.clock.now() - last_failure)
            .to_std()
            .unwrap_or(Duration::ZERO);
        self.policy.cooldown.saturating_sub(elapsed)
    }
}
