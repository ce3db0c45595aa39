//! Mode/status state machine for the PIN flow
//!
//! [`PinFlowController`] owns the mode, the sub-status, the entered-digits
//! buffer, the attempt counter, and all timers. Input handlers and timer
//! ticks are the only entry points; each returns the host-visible
//! [`PinEvent`]s it produced. Rendering is driven entirely off
//! [`snapshot`](PinFlowController::snapshot).
//!
//! Every transition into a new mode resets the status to `Initial` and wipes
//! buffers, the input lock, the error flag, and pending timers. No state
//! leaks across mode boundaries; the attempt counter alone survives the
//! Enter -> Locked transition and is reset when the countdown completes.

mod countdown;
mod timers;

pub use countdown::{Countdown, COUNTDOWN_TICK};

use std::time::{Duration, Instant};

use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::{Result, StoreError};
use crate::feedback::FeedbackSink;
use crate::options::Options;
use crate::snapshot::PinPadSnapshot;
use crate::store::PinStore;
use crate::text::{self, TextOptions};
use timers::{TimerKind, TimerTable};

/// How long the Set-mode confirmation mismatch error stays visible.
const SET_ERROR_DISPLAY: Duration = Duration::from_millis(3_000);
/// How long the mismatched digits stay visible before the buffer clears.
const SET_MISMATCH_CLEAR_DELAY: Duration = Duration::from_millis(1_500);

/// Top-level screen selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// User must enter the PIN to access
    #[default]
    Enter,
    /// User is setting up a new PIN
    Set,
    /// Too many failures; counting down before Enter is allowed again
    Locked,
    /// User forgot the PIN and may erase it
    Reset,
}

/// Sub-state within a mode, for multi-step flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Status {
    #[default]
    #[serde(rename = "initial")]
    Initial,
    /// First PIN captured during Set, awaiting confirmation
    #[serde(rename = "set.once")]
    SetOnce,
    /// Awaiting reset confirmation
    #[serde(rename = "reset.prompted")]
    ResetPrompted,
}

/// A keypad press forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// A digit button, 0 through 9
    Digit(u8),
    /// The backspace button
    Delete,
}

/// Host-visible outcomes. Each fires at most once per logical event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinEvent {
    /// Correct PIN entered in Enter mode
    Entered(String),
    /// New PIN confirmed and persisted in Set mode
    Set(String),
    /// The user cancelled the Set flow; the host decides the next mode
    SetCancelled,
    /// The stored PIN was erased via the Reset flow
    Reset,
    /// The controller itself changed mode (never fired for `set_mode`)
    ModeChanged { from: Mode, to: Mode },
    /// The sub-status changed within the current mode
    StatusChanged { mode: Mode, status: Status },
    /// The store failed; the entry was not counted as an attempt
    VerificationUnavailable,
}

/// Host-supplied PIN check, overriding the store comparison.
pub type Verifier = Box<dyn FnMut(&str) -> std::result::Result<bool, StoreError> + Send>;

/// The PIN flow state machine.
///
/// Single-threaded and event-driven: all state changes happen inside the
/// input handlers and [`tick`](Self::tick). The input lock is raised for the
/// whole verification window, so at most one verification is ever in flight.
pub struct PinFlowController<S, F> {
    options: Options,
    texts: TextOptions,
    store: S,
    feedback: F,
    verifier: Option<Verifier>,

    mode: Mode,
    status: Status,
    entered: Zeroizing<String>,
    pending: Option<Zeroizing<String>>,
    attempts: u32,
    input_locked: bool,
    show_error: bool,
    timers: TimerTable,
    countdown: Option<Countdown>,
}

impl<S: PinStore, F: FeedbackSink> PinFlowController<S, F> {
    /// Create a controller in Enter mode. Fails fast on invalid options.
    pub fn new(store: S, feedback: F, options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            texts: TextOptions::default(),
            store,
            feedback,
            verifier: None,
            mode: Mode::Enter,
            status: Status::Initial,
            entered: Zeroizing::new(String::new()),
            pending: None,
            attempts: 0,
            input_locked: false,
            show_error: false,
            timers: TimerTable::default(),
            countdown: None,
        })
    }

    /// Replace the default texts with a merged text surface.
    pub fn with_texts(mut self, texts: TextOptions) -> Self {
        self.texts = texts;
        self
    }

    /// Install a host verification callback used instead of comparing against
    /// the stored PIN.
    pub fn with_verifier(
        mut self,
        verifier: impl FnMut(&str) -> std::result::Result<bool, StoreError> + Send + 'static,
    ) -> Self {
        self.verifier = Some(Box::new(verifier));
        self
    }

    /// Active mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Active sub-status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Failed attempts in the current Enter session
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The injected store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The injected feedback sink
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Authoritative mode change from the host. Rebuilds the whole session,
    /// including the attempt counter. Does not emit [`PinEvent::ModeChanged`]
    /// because the host already knows.
    pub fn set_mode(&mut self, mode: Mode, now: Instant) {
        self.attempts = 0;
        self.enter_mode(mode, now);
    }

    /// Handle a keypad press. Ignored while input is locked or while the
    /// Locked or Reset screen is active.
    pub fn press(&mut self, key: KeyPress, now: Instant) -> Vec<PinEvent> {
        let mut events = Vec::new();
        if self.input_locked || !matches!(self.mode, Mode::Enter | Mode::Set) {
            return events;
        }

        match key {
            KeyPress::Delete => {
                self.entered.pop();
            }
            KeyPress::Digit(digit) => {
                if digit > 9 || self.entered.len() >= self.options.pin_length {
                    return events;
                }
                self.entered.push(char::from(b'0' + digit));
            }
        }

        if self.entered.len() == self.options.pin_length {
            match self.mode {
                Mode::Enter => self.verify_entry(now, &mut events),
                Mode::Set => self.handle_set_entry(now, &mut events),
                Mode::Locked | Mode::Reset => {}
            }
        }
        events
    }

    /// "Forgot PIN" affordance: Enter -> Reset, when permitted.
    pub fn request_reset(&mut self, now: Instant) -> Vec<PinEvent> {
        let mut events = Vec::new();
        if self.mode == Mode::Enter && self.options.allow_reset {
            self.transition(Mode::Reset, now, &mut events);
        }
        events
    }

    /// First step of the Reset flow: show the confirmation prompt.
    pub fn tap_reset(&mut self, _now: Instant) -> Vec<PinEvent> {
        let mut events = Vec::new();
        if self.mode == Mode::Reset && self.status == Status::Initial {
            self.change_status(Status::ResetPrompted, &mut events);
        }
        events
    }

    /// Confirmed reset: erase the stored PIN and return to Enter.
    pub fn confirm_reset(&mut self, now: Instant) -> Vec<PinEvent> {
        let mut events = Vec::new();
        if self.mode != Mode::Reset || self.status != Status::ResetPrompted {
            return events;
        }
        match self.store.remove() {
            Ok(()) => {
                tracing::info!("stored pin removed");
                events.push(PinEvent::Reset);
                self.transition(Mode::Enter, now, &mut events);
            }
            Err(err) => {
                tracing::warn!(%err, "failed to remove stored pin");
                events.push(PinEvent::VerificationUnavailable);
            }
        }
        events
    }

    /// Cancel the current multi-step flow. In Set mode this clears all
    /// progress and notifies the host without changing mode; in Reset mode
    /// it returns to Enter with no side effects.
    pub fn cancel(&mut self, now: Instant) -> Vec<PinEvent> {
        let mut events = Vec::new();
        match self.mode {
            Mode::Set => {
                self.clear_entered();
                self.pending = None;
                self.show_error = false;
                self.input_locked = false;
                self.timers.cancel(TimerKind::ErrorClear);
                self.timers.cancel(TimerKind::BufferClear);
                if self.status != Status::Initial {
                    self.change_status(Status::Initial, &mut events);
                }
                events.push(PinEvent::SetCancelled);
            }
            Mode::Reset => {
                self.transition(Mode::Enter, now, &mut events);
            }
            Mode::Enter | Mode::Locked => {}
        }
        events
    }

    /// Advance time. Fires any due timers: error-display clear, cooldown
    /// unlock, delayed buffer clear, and the lockout countdown tick.
    pub fn tick(&mut self, now: Instant) -> Vec<PinEvent> {
        let mut events = Vec::new();
        for kind in self.timers.take_due(now) {
            match kind {
                TimerKind::ErrorClear => self.show_error = false,
                TimerKind::CooldownUnlock => self.input_locked = false,
                TimerKind::BufferClear => {
                    self.clear_entered();
                    self.input_locked = false;
                }
                TimerKind::CountdownTick => self.countdown_tick(now, &mut events),
            }
        }
        events
    }

    /// Render-agnostic view of the current state.
    pub fn snapshot(&self) -> PinPadSnapshot {
        let (title, sub_title, error_text) = self.current_texts();
        PinPadSnapshot {
            mode: self.mode,
            status: self.status,
            filled: self.entered.len(),
            pin_length: self.options.pin_length,
            show_error: self.show_error,
            input_disabled: self.input_locked,
            attempts_used: self.attempts,
            attempts_remaining: self.options.max_attempt.saturating_sub(self.attempts),
            countdown_remaining: self.countdown.as_ref().map(Countdown::remaining),
            countdown_display: self.countdown.as_ref().map(Countdown::display),
            title,
            sub_title,
            error_text,
            allow_reset: self.options.allow_reset,
        }
    }

    fn verify_entry(&mut self, now: Instant, events: &mut Vec<PinEvent>) {
        // Input stays disabled for the whole verification window so a second
        // digit sequence cannot race the one in flight.
        self.input_locked = true;
        let candidate = self.take_entered();

        let outcome = match self.verifier.as_mut() {
            Some(check) => check(&candidate),
            None => self.store.get().map(|stored| {
                stored
                    .map(|pin| pin.as_str() == candidate.as_str())
                    .unwrap_or(false)
            }),
        };

        match outcome {
            Ok(true) => {
                tracing::info!("pin accepted");
                self.attempts = 0;
                self.input_locked = false;
                events.push(PinEvent::Entered(candidate.to_string()));
            }
            Ok(false) => self.handle_failed_entry(now, events),
            Err(err) => {
                tracing::warn!(%err, "verification unavailable");
                self.input_locked = false;
                events.push(PinEvent::VerificationUnavailable);
            }
        }
    }

    fn handle_failed_entry(&mut self, now: Instant, events: &mut Vec<PinEvent>) {
        // The lock-vs-retry decision happens strictly at the moment of the
        // failure; the tripping attempt is not counted, and the counter is
        // reset when the countdown completes, not here.
        if !self.options.disable_lock && self.attempts >= self.options.max_attempt - 1 {
            tracing::warn!(attempts = self.attempts, "attempt limit reached, locking");
            self.transition(Mode::Locked, now, events);
            return;
        }

        self.attempts += 1;
        tracing::debug!(attempts = self.attempts, "wrong pin");
        self.feedback.vibrate();
        self.show_error = true;

        // Error display and cooldown share the retry window; input stays
        // locked until the cooldown fires.
        let unlock_at = now + self.options.retry_lock_duration;
        self.timers.schedule(TimerKind::ErrorClear, unlock_at);
        self.timers.schedule(TimerKind::CooldownUnlock, unlock_at);
    }

    fn handle_set_entry(&mut self, now: Instant, events: &mut Vec<PinEvent>) {
        match self.status {
            // Step 1: capture the first PIN, ask for confirmation.
            Status::Initial => {
                self.pending = Some(self.take_entered());
                self.change_status(Status::SetOnce, events);
            }
            // Step 2: compare with the first entry.
            Status::SetOnce => {
                let pending = self.pending.take();
                let matched = pending
                    .map(|pin| pin.as_str() == self.entered.as_str())
                    .unwrap_or(false);

                if matched {
                    let pin = self.take_entered();
                    match self.store.set(&pin) {
                        Ok(()) => {
                            tracing::info!("new pin persisted");
                            self.change_status(Status::Initial, events);
                            events.push(PinEvent::Set(pin.to_string()));
                        }
                        Err(err) => {
                            tracing::warn!(%err, "failed to persist new pin");
                            self.change_status(Status::Initial, events);
                            events.push(PinEvent::VerificationUnavailable);
                        }
                    }
                } else {
                    // The mismatched digits stay visible briefly; input is
                    // locked until the delayed clear fires. The user restarts
                    // the two-step process from scratch.
                    self.feedback.vibrate();
                    self.show_error = true;
                    self.input_locked = true;
                    self.timers
                        .schedule(TimerKind::ErrorClear, now + SET_ERROR_DISPLAY);
                    self.timers
                        .schedule(TimerKind::BufferClear, now + SET_MISMATCH_CLEAR_DELAY);
                    self.change_status(Status::Initial, events);
                }
            }
            Status::ResetPrompted => {}
        }
    }

    fn countdown_tick(&mut self, now: Instant, events: &mut Vec<PinEvent>) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };
        if countdown.tick() {
            self.countdown = None;
            self.transition(Mode::Enter, now, events);
        } else {
            self.timers
                .schedule(TimerKind::CountdownTick, now + COUNTDOWN_TICK);
        }
    }

    /// Controller-initiated transition; emits [`PinEvent::ModeChanged`].
    fn transition(&mut self, to: Mode, now: Instant, events: &mut Vec<PinEvent>) {
        let from = self.mode;
        self.enter_mode(to, now);
        if from == Mode::Locked && to == Mode::Enter {
            self.attempts = 0;
        }
        events.push(PinEvent::ModeChanged { from, to });
    }

    fn enter_mode(&mut self, mode: Mode, now: Instant) {
        tracing::debug!(?mode, "entering mode");
        self.mode = mode;
        self.status = Status::Initial;
        self.clear_entered();
        self.pending = None;
        self.input_locked = false;
        self.show_error = false;
        self.timers.invalidate_all();
        self.countdown = None;

        if mode == Mode::Locked {
            self.countdown = Some(Countdown::new(self.options.lock_duration));
            self.timers
                .schedule(TimerKind::CountdownTick, now + COUNTDOWN_TICK);
        }
    }

    fn change_status(&mut self, status: Status, events: &mut Vec<PinEvent>) {
        self.status = status;
        events.push(PinEvent::StatusChanged {
            mode: self.mode,
            status,
        });
    }

    fn clear_entered(&mut self) {
        // Dropping the old buffer zeroizes it.
        self.entered = Zeroizing::new(String::new());
    }

    fn take_entered(&mut self) -> Zeroizing<String> {
        std::mem::replace(&mut self.entered, Zeroizing::new(String::new()))
    }

    fn current_texts(&self) -> (String, String, String) {
        let texts = &self.texts;
        let options = &self.options;
        match self.mode {
            Mode::Enter => (
                texts.enter.title.clone(),
                text::render(&texts.enter.sub_title, options),
                text::render(&texts.enter.error, options),
            ),
            Mode::Set => {
                let sub_title = if self.status == Status::SetOnce {
                    texts.set.repeat.clone()
                } else {
                    text::render(&texts.set.sub_title, options)
                };
                (
                    texts.set.title.clone(),
                    sub_title,
                    text::render(&texts.set.error, options),
                )
            }
            Mode::Locked => (
                texts.locked.title.clone(),
                text::render(&texts.locked.sub_title, options),
                String::new(),
            ),
            Mode::Reset => {
                let sub_title = if self.status == Status::ResetPrompted {
                    texts.reset.confirm.clone()
                } else {
                    text::render(&texts.reset.sub_title, options)
                };
                (texts.reset.title.clone(), sub_title, String::new())
            }
        }
    }
}
