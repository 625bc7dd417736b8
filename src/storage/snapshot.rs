//! The persisted snapshot format for the workout store.
//!
//! ```json
//! { "version": 1, "workouts": [{ "type": "running", "id": "…", … }] }
//! ```
//!
//! Each workout is a flat record: the shared fields, a `type` tag, the
//! kind-specific fields and the derived metric. Derived metrics are written
//! for readers of the file but recomputed on load. The description is kept.
//!
//! Version history:
//!
//! - 0: a bare array of records with no version tag; `clicks` may be absent.
//! - 1: the same records wrapped in an object with an explicit `version`.
//!
//! Older versions are upgraded on read and the next write stores the current
//! version. Newer versions are refused.

use jiff::{Timestamp, tz::TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::{Coords, ValidationError, Workout, WorkoutId, WorkoutKind};

/// The snapshot version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// A snapshot that cannot be turned back into workouts.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot does not have the expected shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("workout {id} in snapshot is invalid: {source}")]
    InvalidWorkout {
        id: WorkoutId,
        #[source]
        source: ValidationError,
    },
}

#[derive(Serialize)]
struct Snapshot {
    version: u32,
    workouts: Vec<Record>,
}

/// Versioned envelope, read before the records so the version can be
/// checked without committing to a record layout.
#[derive(Deserialize)]
struct Envelope {
    version: u32,
    workouts: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    id: WorkoutId,
    date: Timestamp,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(default)]
    description: String,
    #[serde(flatten)]
    kind: KindRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clicks: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum KindRecord {
    Running {
        cadence: f64,
        #[serde(default)]
        pace: Option<f64>,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        #[serde(default)]
        speed: Option<f64>,
    },
}

/// Encodes the full ordered collection at [`CURRENT_VERSION`].
pub(crate) fn encode(workouts: &[Workout]) -> serde_json::Result<String> {
    let snapshot = Snapshot {
        version: CURRENT_VERSION,
        workouts: workouts.iter().map(to_record).collect(),
    };
    serde_json::to_string(&snapshot)
}

/// Decodes a snapshot of any supported version into typed workouts.
///
/// Every record is rebuilt through the same constructors used for new
/// workouts, so derived metrics are recomputed and invalid records rejected.
/// A stored description is kept as written; records without one get it
/// rendered in `tz`.
pub(crate) fn decode(json: &str, tz: &TimeZone) -> Result<Vec<Workout>, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let records: Vec<Record> = if value.is_array() {
        tracing::debug!("upgrading unversioned snapshot");
        serde_json::from_value(value)?
    } else {
        let envelope: Envelope = serde_json::from_value(value)?;
        if envelope.version > CURRENT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: envelope.version,
                supported: CURRENT_VERSION,
            });
        }
        serde_json::from_value(envelope.workouts)?
    };

    records
        .into_iter()
        .map(|record| rehydrate(record, tz))
        .collect()
}

fn to_record(workout: &Workout) -> Record {
    let kind = match *workout.kind() {
        WorkoutKind::Running { cadence, pace } => KindRecord::Running {
            cadence,
            pace: Some(pace),
        },
        WorkoutKind::Cycling {
            elevation_gain,
            speed,
        } => KindRecord::Cycling {
            elevation_gain,
            speed: Some(speed),
        },
    };
    Record {
        id: workout.id().clone(),
        date: workout.date(),
        coords: workout.coords(),
        distance: workout.distance(),
        duration: workout.duration(),
        description: workout.description().to_string(),
        kind,
        clicks: Some(workout.clicks()),
    }
}

fn rehydrate(record: Record, tz: &TimeZone) -> Result<Workout, SnapshotError> {
    let created_at = record.date.to_zoned(tz.clone());
    let built = match record.kind {
        KindRecord::Running { cadence, .. } => Workout::running(
            record.coords,
            record.distance,
            record.duration,
            cadence,
            &created_at,
        ),
        KindRecord::Cycling { elevation_gain, .. } => Workout::cycling(
            record.coords,
            record.distance,
            record.duration,
            elevation_gain,
            &created_at,
        ),
    };
    let workout = match built {
        Ok(w) => w,
        Err(source) => {
            return Err(SnapshotError::InvalidWorkout {
                id: record.id,
                source,
            });
        }
    };

    Ok(workout.with_history(
        record.id,
        record.clicks.unwrap_or(0),
        record.description,
    ))
}
