//! Pinlock Core Library
//!
//! A reusable, render-agnostic screen-lock widget core. The
//! [`PinFlowController`] state machine governs PIN entry, two-step setup,
//! temporary lockout after repeated failures, and PIN reset; presentation
//! layers render from [`PinPadSnapshot`]s and forward key presses back.
//!
//! Storage ([`PinStore`]), haptics ([`FeedbackSink`]) and rendering are
//! injected collaborators. The PIN is compared and stored in plain form;
//! this is a widget, not a cryptographic authentication system.

pub mod driver;
pub mod error;
pub mod feedback;
pub mod flow;
pub mod options;
pub mod snapshot;
pub mod store;
pub mod text;

pub use error::{PinLockError, Result, StoreError};
pub use feedback::{FeedbackSink, NoFeedback};
pub use flow::{KeyPress, Mode, PinEvent, PinFlowController, Status};
pub use options::Options;
pub use snapshot::PinPadSnapshot;
pub use store::{has_pin, MemoryStore, PinStore};
pub use text::{TextOptions, TextOverrides};
