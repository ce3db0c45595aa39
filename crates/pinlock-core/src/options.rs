//! Flow controller configuration
//!
//! An immutable [`Options`] value is handed to the controller at construction
//! and validated there; invalid configuration is rejected up front rather than
//! producing undefined buffer behavior later.

use std::time::Duration;

use crate::error::{PinLockError, Result};

/// Default PIN length
pub const DEFAULT_PIN_LENGTH: usize = 4;
/// Default number of wrong entries before the lockout trips
pub const DEFAULT_MAX_ATTEMPT: u32 = 10;
/// Default lockout countdown duration
pub const DEFAULT_LOCK_DURATION: Duration = Duration::from_millis(60_000);
/// Default cooldown between failed attempts
pub const DEFAULT_RETRY_LOCK_DURATION: Duration = Duration::from_millis(1_000);

/// Behavior configuration for the PIN flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Number of digits in a full PIN
    pub pin_length: usize,

    /// Wrong full-length entries tolerated before the Locked screen is shown
    pub max_attempt: u32,

    /// How long the Locked screen counts down before returning to Enter
    pub lock_duration: Duration,

    /// Input-disable window after a single failed attempt; also the timeout
    /// for hiding the error message
    pub retry_lock_duration: Duration,

    /// Disable the Locked mode entirely (failed attempts never lock)
    pub disable_lock: bool,

    /// Show the "Forgot PIN?" affordance on the Enter screen
    pub allow_reset: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pin_length: DEFAULT_PIN_LENGTH,
            max_attempt: DEFAULT_MAX_ATTEMPT,
            lock_duration: DEFAULT_LOCK_DURATION,
            retry_lock_duration: DEFAULT_RETRY_LOCK_DURATION,
            disable_lock: false,
            allow_reset: true,
        }
    }
}

impl Options {
    /// Create options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the PIN length
    pub fn with_pin_length(mut self, pin_length: usize) -> Self {
        self.pin_length = pin_length;
        self
    }

    /// Set the attempt limit
    pub fn with_max_attempt(mut self, max_attempt: u32) -> Self {
        self.max_attempt = max_attempt;
        self
    }

    /// Set the lockout duration
    pub fn with_lock_duration(mut self, lock_duration: Duration) -> Self {
        self.lock_duration = lock_duration;
        self
    }

    /// Set the per-attempt cooldown duration
    pub fn with_retry_lock_duration(mut self, retry_lock_duration: Duration) -> Self {
        self.retry_lock_duration = retry_lock_duration;
        self
    }

    /// Disable or enable the Locked mode
    pub fn with_disable_lock(mut self, disable_lock: bool) -> Self {
        self.disable_lock = disable_lock;
        self
    }

    /// Allow or forbid the reset flow
    pub fn with_allow_reset(mut self, allow_reset: bool) -> Self {
        self.allow_reset = allow_reset;
        self
    }

    /// Reject configurations the state machine cannot operate on.
    pub fn validate(&self) -> Result<()> {
        if self.pin_length == 0 {
            return Err(PinLockError::InvalidOptions(
                "pin_length must be greater than zero".to_string(),
            ));
        }
        if self.max_attempt == 0 {
            return Err(PinLockError::InvalidOptions(
                "max_attempt must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
