//! Output formatting for CLI display.

use crate::model::{Workout, WorkoutKind, WorkoutType};

/// Icon shown beside a workout's description.
pub(super) fn icon(workout_type: WorkoutType) -> &'static str {
    match workout_type {
        WorkoutType::Running => "🏃",
        WorkoutType::Cycling => "🚴",
    }
}

/// Marker popup text: icon and description.
pub(super) fn format_popup(workout: &Workout) -> String {
    format!("{} {}", icon(workout.workout_type()), workout.description())
}

/// A two-line list entry:
///
/// ```text
/// 🏃 Running on October 16  [0000000123]
///    5 km · 30 min · 6.0 min/km · 150 spm
/// ```
pub(super) fn format_entry(workout: &Workout) -> String {
    let metrics = match *workout.kind() {
        WorkoutKind::Running { cadence, pace } => {
            format!("{pace:.1} min/km · {cadence} spm")
        }
        WorkoutKind::Cycling {
            elevation_gain,
            speed,
        } => format!("{speed:.1} km/h · {elevation_gain} m"),
    };
    format!(
        "{}  [{}]\n   {} km · {} min · {metrics}",
        format_popup(workout),
        workout.id(),
        workout.distance(),
        workout.duration(),
    )
}
