//! Render-agnostic state snapshot
//!
//! The presentation layer receives these and draws dots, keypad, and
//! countdown however it likes; all strings come pre-rendered with
//! placeholders substituted for the current mode and status.

use std::time::Duration;

use serde::Serialize;

use crate::flow::{Mode, Status};

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PinPadSnapshot {
    /// Active top-level screen
    pub mode: Mode,
    /// Sub-state within the mode
    pub status: Status,
    /// How many digits have been entered
    pub filled: usize,
    /// Total digits in a full PIN
    pub pin_length: usize,
    /// Transient error indicator (wrong PIN, confirmation mismatch)
    pub show_error: bool,
    /// Whether the keypad should reject input
    pub input_disabled: bool,
    /// Failed attempts in the current Enter session
    pub attempts_used: u32,
    /// Attempts left before the lockout trips
    pub attempts_remaining: u32,
    /// Remaining lockout time, when in Locked mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_remaining: Option<Duration>,
    /// Remaining lockout time as `minutes:seconds`, when in Locked mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_display: Option<String>,
    /// Rendered title for the active screen
    pub title: String,
    /// Rendered subtitle (or confirmation/repeat prompt) for the active screen
    pub sub_title: String,
    /// Rendered error message for the active screen
    pub error_text: String,
    /// Whether the "Forgot PIN?" affordance should be shown
    pub allow_reset: bool,
}
