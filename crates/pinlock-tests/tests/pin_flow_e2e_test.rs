//! End-to-end tests for the pinlock widget
//!
//! These tests drive the full flow a host application sees: setting up a PIN
//! against the file store, entering it, exhausting attempts into the lockout
//! countdown, and erasing it through the reset flow.

use std::time::{Duration, Instant};

use pinlock_core::driver::{self, DriverCommand, DEFAULT_TICK_RATE};
use pinlock_core::{
    KeyPress, MemoryStore, Mode, NoFeedback, Options, PinEvent, PinFlowController, PinStore,
    Status,
};
use pinlock_store::FilePinStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn press_pin<S: PinStore>(
    controller: &mut PinFlowController<S, NoFeedback>,
    pin: &str,
    now: Instant,
) -> Vec<PinEvent> {
    let mut events = Vec::new();
    for ch in pin.chars() {
        let digit = ch.to_digit(10).unwrap() as u8;
        events.extend(controller.press(KeyPress::Digit(digit), now));
    }
    events
}

/// Set up a PIN, hand the widget back to the host, then unlock with it.
#[test]
fn test_set_then_enter_lifecycle_with_file_store() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let store = FilePinStore::with_path(dir.path().join("pin.json"));
    let mut controller =
        PinFlowController::new(store, NoFeedback, Options::default()).unwrap();
    let now = Instant::now();

    // ==========================================
    // STEP 1: First run, host asks for PIN setup
    // ==========================================
    controller.set_mode(Mode::Set, now);
    press_pin(&mut controller, "4711", now);
    assert_eq!(controller.status(), Status::SetOnce);

    let events = press_pin(&mut controller, "4711", now);
    assert!(events.contains(&PinEvent::Set("4711".to_string())));
    assert!(controller.store().has_pin(4).unwrap());

    // ==========================================
    // STEP 2: Host switches to Enter, user unlocks
    // ==========================================
    controller.set_mode(Mode::Enter, now);
    let events = press_pin(&mut controller, "4711", now);
    assert!(events.contains(&PinEvent::Entered("4711".to_string())));
}

/// The concrete lockout scenario: three wrong entries, countdown, recovery.
#[test]
fn test_lockout_and_countdown_recovery() {
    let mut controller = PinFlowController::new(
        MemoryStore::with_pin("9999"),
        NoFeedback,
        Options::new()
            .with_max_attempt(3)
            .with_lock_duration(Duration::from_secs(5)),
    )
    .unwrap();
    let mut now = Instant::now();

    for (wrong, expected_attempts) in [("1111", 1), ("2222", 2)] {
        press_pin(&mut controller, wrong, now);
        assert_eq!(controller.mode(), Mode::Enter);
        assert_eq!(controller.attempts(), expected_attempts);
        now += Duration::from_secs(1);
        controller.tick(now);
    }

    let events = press_pin(&mut controller, "3333", now);
    assert!(events.contains(&PinEvent::ModeChanged {
        from: Mode::Enter,
        to: Mode::Locked,
    }));

    let mut events = Vec::new();
    for _ in 0..5 {
        now += Duration::from_secs(1);
        events.extend(controller.tick(now));
    }
    assert!(events.contains(&PinEvent::ModeChanged {
        from: Mode::Locked,
        to: Mode::Enter,
    }));
    assert_eq!(controller.attempts(), 0);

    // The correct PIN works immediately after the lockout lifts
    let events = press_pin(&mut controller, "9999", now);
    assert!(events.contains(&PinEvent::Entered("9999".to_string())));
}

/// Forgot-PIN path erases the stored PIN exactly once.
#[test]
fn test_reset_flow_erases_stored_pin() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FilePinStore::with_path(dir.path().join("pin.json"));
    store.set("4711").unwrap();

    let mut controller =
        PinFlowController::new(store, NoFeedback, Options::default()).unwrap();
    let now = Instant::now();

    controller.request_reset(now);
    controller.tap_reset(now);
    let events = controller.confirm_reset(now);

    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, PinEvent::Reset))
            .count(),
        1
    );
    assert_eq!(controller.mode(), Mode::Enter);
    assert!(!controller.store().has_pin(4).unwrap());
    assert!(!dir.path().join("pin.json").exists());
}

/// Mismatched confirmation leaves the stored PIN untouched.
#[test]
fn test_set_mismatch_leaves_storage_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FilePinStore::with_path(dir.path().join("pin.json"));
    store.set("0000").unwrap();

    let mut controller =
        PinFlowController::new(store, NoFeedback, Options::default()).unwrap();
    let now = Instant::now();
    controller.set_mode(Mode::Set, now);

    press_pin(&mut controller, "1234", now);
    let events = press_pin(&mut controller, "4321", now);

    assert!(!events.iter().any(|e| matches!(e, PinEvent::Set(_))));
    assert_eq!(controller.status(), Status::Initial);
    assert_eq!(
        controller.store().get().unwrap().unwrap().as_str(),
        "0000"
    );

    // Digits clear after the display delay
    controller.tick(now + Duration::from_millis(1_500));
    assert_eq!(controller.snapshot().filled, 0);
}

/// The async driver wires commands, events, and snapshots together.
#[tokio::test(start_paused = true)]
async fn test_driver_end_to_end() {
    let controller = PinFlowController::new(
        MemoryStore::with_pin("2580"),
        NoFeedback,
        Options::new()
            .with_max_attempt(1)
            .with_lock_duration(Duration::from_secs(2)),
    )
    .unwrap();
    let mut handle = driver::spawn(controller, DEFAULT_TICK_RATE);

    // Wrong PIN with max_attempt=1 locks straight away
    for digit in [0u8, 0, 0, 0] {
        handle
            .commands
            .send(DriverCommand::Key(KeyPress::Digit(digit)))
            .unwrap();
    }
    assert_eq!(
        handle.events.recv().await.unwrap(),
        PinEvent::ModeChanged {
            from: Mode::Enter,
            to: Mode::Locked,
        }
    );

    // Countdown completes under the paused clock
    assert_eq!(
        handle.events.recv().await.unwrap(),
        PinEvent::ModeChanged {
            from: Mode::Locked,
            to: Mode::Enter,
        }
    );

    // And the correct PIN now unlocks
    for digit in [2u8, 5, 8, 0] {
        handle
            .commands
            .send(DriverCommand::Key(KeyPress::Digit(digit)))
            .unwrap();
    }
    assert_eq!(
        handle.events.recv().await.unwrap(),
        PinEvent::Entered("2580".to_string())
    );

    let snapshot = handle.snapshots.borrow().clone();
    assert_eq!(snapshot.mode, Mode::Enter);
    assert_eq!(snapshot.attempts_used, 0);
}
