//! Timer session engine.
//!
//! This module contains the timer core:
//! - `timer`: the session state machine and its events
//! - `ticker`: the armed/disarmed one-second tick task
//! - `controller`: async facade pairing the two

pub mod controller;
pub mod ticker;
pub mod timer;

pub use controller::TimerController;
pub use ticker::{TickHandle, TICK_PERIOD};
pub use timer::{TimerEngine, TimerEvent};
