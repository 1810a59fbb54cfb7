#![forbid(unsafe_code)]

//! Injected runtime services for dropkit widgets.
//!
//! These are the process-wide singletons of the host environment, modeled
//! as explicit service values that components receive by reference: the
//! [`KeyboardRegistry`] for named-key accelerators, [`DocumentClicks`] for
//! document-level click listeners, and the [`ResponsiveMonitor`] for
//! viewport size-class transitions. Registration and deregistration are
//! always explicit calls, so pairing across open/close cycles is countable
//! in tests.

pub mod clicks;
pub mod keyboard;
pub mod responsive;

pub use clicks::DocumentClicks;
pub use keyboard::{KeyboardRegistry, OwnerId};
pub use responsive::{ResponsiveMonitor, ResponsiveSubscription, SMALL_WIDTH};
