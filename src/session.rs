//! Session controller: sequences user actions over the workout store and the
//! views that render it.
//!
//! A session starts by restoring the store and asking for the current
//! location once. Creating a workout is a two-step cycle:
//!
//! ```text
//! Idle --select_location--> FormOpen { pending } --submit (valid)--> Idle
//!                                    ^                  |
//!                                    +--submit (invalid)+
//! ```
//!
//! Selecting an existing workout pans the map and counts a click without
//! leaving the current state.

mod views;

use jiff::{Timestamp, tz::TimeZone};

use crate::model::{Coords, ValidationError, Workout, WorkoutId, WorkoutType};
use crate::storage::StorageError;
use crate::store::{Restored, WorkoutStore};

pub use views::{FormView, LocationUnavailable, Locator, MapView, WorkoutList};

/// Zoom level used when no other is configured.
pub const DEFAULT_ZOOM: u8 = 13;

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("location unavailable: new workouts cannot be placed on the map")]
    LocationUnavailable,

    #[error("no location selected for the new workout")]
    NoPendingLocation,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Raw field values from the new-workout form, exactly as entered.
///
/// Only the field matching the workout type (cadence or elevation) is read.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    pub workout_type: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// Where the current creation cycle stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Idle,
    FormOpen { pending: Coords },
}

/// One session of use, from start to exit or reset.
pub struct Session<M, F, L> {
    store: WorkoutStore,
    map: M,
    form: F,
    list: L,
    zoom: u8,
    time_zone: TimeZone,
    clock: Box<dyn FnMut() -> Timestamp>,
    location: Option<Coords>,
    state: FormState,
}

impl<M: MapView, F: FormView, L: WorkoutList> Session<M, F, L> {
    pub fn new(store: WorkoutStore, map: M, form: F, list: L) -> Self {
        Self {
            store,
            map,
            form,
            list,
            zoom: DEFAULT_ZOOM,
            time_zone: TimeZone::system(),
            clock: Box::new(Timestamp::now),
            location: None,
            state: FormState::Idle,
        }
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Zone in which workout descriptions are rendered.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Source of creation timestamps.
    #[cfg(test)]
    #[must_use]
    pub fn with_clock(mut self, clock: impl FnMut() -> Timestamp + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Restores persisted workouts, lists them, and acquires the current
    /// location.
    ///
    /// Without a location the session still lists and selects restored
    /// workouts, but cannot create new ones. The failure is alerted once.
    pub fn start(&mut self, locator: &mut impl Locator) -> Result<Restored, SessionError> {
        let restored = self.store.restore(&self.time_zone)?;
        for workout in self.store.workouts() {
            self.list.render(workout);
        }

        match locator.locate() {
            Ok(center) => {
                tracing::debug!(%center, zoom = self.zoom, "map ready");
                self.map.set_view(center, self.zoom);
                for workout in self.store.workouts() {
                    self.map.add_marker(workout);
                }
                self.location = Some(center);
            }
            Err(e) => {
                tracing::warn!(reason = %e, "could not acquire location");
                self.form.alert(&format!("Couldn't get your position: {e}"));
                self.location = None;
            }
        }

        Ok(restored)
    }

    /// Opens the form for a new workout at `at`.
    ///
    /// Selecting again while the form is open moves the pending location.
    pub fn select_location(&mut self, at: Coords) -> Result<(), SessionError> {
        if self.location.is_none() {
            return Err(SessionError::LocationUnavailable);
        }
        self.state = FormState::FormOpen { pending: at };
        self.form.open(at);
        Ok(())
    }

    /// Validates the form and commits a new workout at the pending location.
    ///
    /// On a validation error the user is alerted, the form stays open and
    /// nothing is committed. The snapshot is written before anything is
    /// rendered; if that fails the form also stays open and nothing is kept.
    pub fn submit(&mut self, submission: &FormSubmission) -> Result<WorkoutId, SessionError> {
        let FormState::FormOpen { pending } = self.state else {
            return Err(SessionError::NoPendingLocation);
        };

        let workout = match self.build(submission, pending) {
            Ok(w) => w,
            Err(e) => {
                tracing::debug!(error = %e, "rejected workout form");
                self.form.alert(&e.to_string());
                return Err(e.into());
            }
        };

        let workout = self.store.commit(workout)?;
        self.map.add_marker(workout);
        self.list.render(workout);
        self.form.close();
        self.state = FormState::Idle;

        let id = workout.id().clone();
        tracing::info!(%id, kind = workout.workout_type().as_str(), "workout created");
        Ok(id)
    }

    /// Focuses the map on a workout and counts the click.
    ///
    /// Unknown ids are ignored and yield `None`.
    pub fn select_workout(&mut self, id: &WorkoutId) -> Result<Option<&Workout>, SessionError> {
        let Some(workout) = self.store.find_by_id_mut(id) else {
            tracing::debug!(%id, "selected workout not found");
            return Ok(None);
        };
        workout.register_click();
        let coords = workout.coords();

        if self.location.is_some() {
            self.map.pan_to(coords, self.zoom);
        }
        self.store.serialize()?;
        Ok(self.store.find_by_id(id))
    }

    /// Removes every workout, persisted and rendered, and returns to idle.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.store.reset_all()?;
        self.list.clear();
        self.map.clear_markers();
        if matches!(self.state, FormState::FormOpen { .. }) {
            self.form.close();
        }
        self.state = FormState::Idle;
        Ok(())
    }

    fn build(&mut self, submission: &FormSubmission, at: Coords) -> Result<Workout, ValidationError> {
        let workout_type: WorkoutType = submission.workout_type.parse()?;
        let distance = parse_field(&submission.distance);
        let duration = parse_field(&submission.duration);
        let created_at = (self.clock)().to_zoned(self.time_zone.clone());

        match workout_type {
            WorkoutType::Running => {
                let cadence = parse_field(&submission.cadence);
                Workout::running(at, distance, duration, cadence, &created_at)
            }
            WorkoutType::Cycling => {
                let elevation = parse_field(&submission.elevation);
                Workout::cycling(at, distance, duration, elevation, &created_at)
            }
        }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    #[cfg(test)]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// The current location, once acquired.
    pub fn location(&self) -> Option<Coords> {
        self.location
    }

    pub fn list_mut(&mut self) -> &mut L {
        &mut self.list
    }

    #[cfg(test)]
    fn views(&self) -> (&M, &F, &L) {
        (&self.map, &self.form, &self.list)
    }
}

/// Reads a numeric form field. Blank reads as zero; anything unparsable
/// reads as NaN, which validation rejects.
fn parse_field(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse().unwrap_or(f64::NAN)
}
