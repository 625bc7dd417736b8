//! Workout records: running and cycling sessions with their derived metrics.

use std::fmt;
use std::str::FromStr;

use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};

use super::validation::{non_negative, positive};
use super::{Coords, Field, ValidationError};

/// Identifier derived from the creation timestamp.
///
/// Not a store-enforced key: two workouts created in the same millisecond
/// share an id, and lookups return the first match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// The last ten digits of the Unix millisecond count.
    pub fn from_timestamp(ts: Timestamp) -> Self {
        let millis = ts.as_millisecond().to_string();
        let start = millis.len().saturating_sub(10);
        Self(millis[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WorkoutId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of workout, without their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutType {
    Running,
    Cycling,
}

impl WorkoutType {
    /// Capitalized name used in descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }
}

impl FromStr for WorkoutType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            _ => Err(ValidationError::UnknownType(s.to_string())),
        }
    }
}

/// Kind-specific fields. The derived metric is computed once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutKind {
    Running {
        /// Steps per minute.
        cadence: f64,
        /// Minutes per kilometer.
        pace: f64,
    },
    Cycling {
        /// Meters climbed; may be zero.
        elevation_gain: f64,
        /// Kilometers per hour.
        speed: f64,
    },
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            Self::Running { .. } => WorkoutType::Running,
            Self::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// One recorded activity.
///
/// Everything but the click counter is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    date: Timestamp,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    kind: WorkoutKind,
    clicks: u32,
}

impl Workout {
    /// Creates a running workout. Distance in km, duration in minutes,
    /// cadence in steps per minute; all must be finite and positive.
    pub fn running(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
        created_at: &Zoned,
    ) -> Result<Self, ValidationError> {
        let distance = positive(Field::Distance, distance)?;
        let duration = positive(Field::Duration, duration)?;
        let cadence = positive(Field::Cadence, cadence)?;
        let pace = duration / distance;
        Ok(Self::assemble(
            coords,
            distance,
            duration,
            WorkoutKind::Running { cadence, pace },
            created_at,
        ))
    }

    /// Creates a cycling workout. Distance and duration must be finite and
    /// positive; elevation gain must be finite and not negative.
    pub fn cycling(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
        created_at: &Zoned,
    ) -> Result<Self, ValidationError> {
        let distance = positive(Field::Distance, distance)?;
        let duration = positive(Field::Duration, duration)?;
        let elevation_gain = non_negative(Field::ElevationGain, elevation_gain)?;
        let speed = distance / (duration / 60.0);
        Ok(Self::assemble(
            coords,
            distance,
            duration,
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            },
            created_at,
        ))
    }

    fn assemble(
        coords: Coords,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
        created_at: &Zoned,
    ) -> Self {
        let date = created_at.timestamp();
        Self {
            id: WorkoutId::from_timestamp(date),
            date,
            coords,
            distance,
            duration,
            description: describe(kind.workout_type(), created_at),
            kind,
            clicks: 0,
        }
    }

    /// Carries over the identity, click count and description of a
    /// persisted record onto a freshly constructed one. An empty
    /// description keeps the one rendered at construction.
    pub(crate) fn with_history(mut self, id: WorkoutId, clicks: u32, description: String) -> Self {
        self.id = id;
        self.clicks = clicks;
        if !description.is_empty() {
            self.description = description;
        }
        self
    }

    /// Records one selection of this workout.
    pub fn register_click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn date(&self) -> Timestamp {
        self.date
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }
}

/// `"<Type> on <Month> <day>"`, e.g. `"Running on October 16"`.
fn describe(workout_type: WorkoutType, created_at: &Zoned) -> String {
    format!("{} on {}", workout_type.label(), created_at.strftime("%B %-d"))
}
