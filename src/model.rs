//! Core data model for trailmark.
//!
//! A workout is a shared base (where, when, how far, how long) plus a
//! kind-specific payload carrying its derived metric.

mod coords;
mod validation;
mod workout;

pub use coords::Coords;
pub use validation::{Field, ValidationError};
pub use workout::{Workout, WorkoutId, WorkoutKind, WorkoutType};
