//! Animation engine for widget transitions.
//!
//! - `tween`: one timed interpolation (easing, completion action)
//! - `sequencer`: exclusive (drawable, property) tween runner with
//!   cancel-on-restart
//! - `scheduler`: deferred one-shot continuations for multi-phase transitions
//!
//! Everything is stepped from `Display::tick` on the same cooperative context
//! that handles events, so no state here is ever touched concurrently.

mod scheduler;
mod sequencer;
mod tween;

pub use scheduler::{Scheduler, TimerId};
pub use sequencer::Sequencer;
pub use tween::{Easing, OnReady, PROGRESS_ONE, RunningTween, Tween};
