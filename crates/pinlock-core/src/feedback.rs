//! Haptic feedback hook
//!
//! Fire-and-forget: the controller never waits on or inspects the result.

/// Host-provided feedback for failed attempts (vibration on mobile, bell in a
/// terminal, nothing in tests).
pub trait FeedbackSink {
    fn vibrate(&mut self);
}

/// Feedback sink that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn vibrate(&mut self) {}
}
