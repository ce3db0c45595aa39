//! Cooperative event loop around a [`PinFlowController`]
//!
//! A single task owns the controller. Input arrives as [`DriverCommand`]s on
//! an mpsc channel, time advances on a fixed interval tick, host-visible
//! [`PinEvent`]s go out on another mpsc channel, and a fresh
//! [`PinPadSnapshot`] is published on a watch channel after every change.
//! No state is shared; everything funnels through the one loop.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::feedback::FeedbackSink;
use crate::flow::{KeyPress, Mode, PinEvent, PinFlowController};
use crate::snapshot::PinPadSnapshot;
use crate::store::PinStore;

/// Default tick rate for the driver loop.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(100);

/// Inputs the presentation layer can send to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    /// A keypad press
    Key(KeyPress),
    /// Authoritative mode change from the host
    SetMode(Mode),
    /// "Forgot PIN" affordance on the Enter screen
    RequestReset,
    /// First tap on the Reset screen
    TapReset,
    /// Confirmation tap on the Reset screen
    ConfirmReset,
    /// Cancel the current multi-step flow
    Cancel,
    /// Stop the driver loop
    Shutdown,
}

/// Channel ends handed to the presentation layer.
pub struct PinPadHandle {
    /// Send inputs here
    pub commands: mpsc::UnboundedSender<DriverCommand>,
    /// Host-visible outcomes
    pub events: mpsc::UnboundedReceiver<PinEvent>,
    /// Latest render-ready state
    pub snapshots: watch::Receiver<PinPadSnapshot>,
}

/// Drives a controller with tokio timers.
pub struct PinPadDriver<S, F> {
    controller: PinFlowController<S, F>,
    commands: mpsc::UnboundedReceiver<DriverCommand>,
    events: mpsc::UnboundedSender<PinEvent>,
    snapshots: watch::Sender<PinPadSnapshot>,
    tick_rate: Duration,
}

impl<S: PinStore, F: FeedbackSink> PinPadDriver<S, F> {
    /// Wrap a controller, returning the driver and the host-facing handle.
    pub fn new(controller: PinFlowController<S, F>, tick_rate: Duration) -> (Self, PinPadHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let driver = Self {
            controller,
            commands: command_rx,
            events: event_tx,
            snapshots: snapshot_tx,
            tick_rate,
        };
        let handle = PinPadHandle {
            commands: command_tx,
            events: event_rx,
            snapshots: snapshot_rx,
        };
        (driver, handle)
    }

    /// Run until [`DriverCommand::Shutdown`] or the command channel closes.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.tick_rate);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let events = self.controller.tick(now());
                    self.publish(events);
                }
                command = self.commands.recv() => {
                    match command {
                        None | Some(DriverCommand::Shutdown) => break,
                        Some(command) => {
                            let events = self.apply(command);
                            self.publish(events);
                        }
                    }
                }
            }
        }
        tracing::debug!("pinpad driver stopped");
    }

    fn apply(&mut self, command: DriverCommand) -> Vec<PinEvent> {
        let now = now();
        match command {
            DriverCommand::Key(key) => self.controller.press(key, now),
            DriverCommand::SetMode(mode) => {
                self.controller.set_mode(mode, now);
                Vec::new()
            }
            DriverCommand::RequestReset => self.controller.request_reset(now),
            DriverCommand::TapReset => self.controller.tap_reset(now),
            DriverCommand::ConfirmReset => self.controller.confirm_reset(now),
            DriverCommand::Cancel => self.controller.cancel(now),
            DriverCommand::Shutdown => Vec::new(),
        }
    }

    fn publish(&mut self, events: Vec<PinEvent>) {
        for event in events {
            // A host that dropped its receiver just stops listening
            let _ = self.events.send(event);
        }
        let _ = self.snapshots.send(self.controller.snapshot());
    }
}

/// Spawn the driver on the current runtime.
pub fn spawn<S, F>(controller: PinFlowController<S, F>, tick_rate: Duration) -> PinPadHandle
where
    S: PinStore + Send + 'static,
    F: FeedbackSink + Send + 'static,
{
    let (driver, handle) = PinPadDriver::new(controller, tick_rate);
    tokio::spawn(driver.run());
    handle
}

/// Virtualized under tokio's paused clock in tests.
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}
