//! Timing module
//!
//! Provides the repeat-timing harness and the routines it is
//! usually pointed at.

mod timer;
pub mod routines;

pub use timer::*;
pub use routines::{Routine, RoutineInput};
