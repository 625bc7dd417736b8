//! Collaborators the session drives but does not own the rendering of.

use crate::model::{Coords, Workout};

/// Why the current location could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct LocationUnavailable {
    pub reason: String,
}

/// One-shot source of the user's current location. No streaming updates.
pub trait Locator {
    fn locate(&mut self) -> Result<Coords, LocationUnavailable>;
}

/// The map: a view centered somewhere, with one marker per workout.
pub trait MapView {
    /// Shows the map for the first time.
    fn set_view(&mut self, center: Coords, zoom: u8);

    fn add_marker(&mut self, workout: &Workout);

    /// Animated move to an existing point of interest.
    fn pan_to(&mut self, center: Coords, zoom: u8);

    fn clear_markers(&mut self);
}

/// The new-workout form.
pub trait FormView {
    /// Shows an empty form for a workout at `at`.
    fn open(&mut self, at: Coords);

    /// Hides and clears the form.
    fn close(&mut self);

    /// Reports a problem to the user.
    fn alert(&mut self, message: &str);
}

/// The list of workouts, one entry each, in insertion order.
pub trait WorkoutList {
    fn render(&mut self, workout: &Workout);

    fn clear(&mut self);
}
