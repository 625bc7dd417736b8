//! Terminal renderings of the session's views.
//!
//! Workout entries go to stdout; everything else goes to stderr or the log,
//! so stdout stays pipeable.

use crate::model::{Coords, Workout};
use crate::session::{FormView, MapView, WorkoutList};

use super::format::{format_entry, format_popup};

/// The map, reduced to log lines and a pan notice.
#[derive(Debug, Default)]
pub struct TerminalMap;

impl MapView for TerminalMap {
    fn set_view(&mut self, center: Coords, zoom: u8) {
        tracing::debug!(lat = center.lat(), lng = center.lng(), zoom, "map view set");
    }

    fn add_marker(&mut self, workout: &Workout) {
        tracing::debug!(
            coords = %workout.coords(),
            popup = %format_popup(workout),
            "marker added"
        );
    }

    fn pan_to(&mut self, center: Coords, zoom: u8) {
        eprintln!("Map centered on {center} (zoom {zoom})");
    }

    fn clear_markers(&mut self) {
        tracing::debug!("markers cleared");
    }
}

/// The form has no screen presence; alerts are printed.
#[derive(Debug, Default)]
pub struct TerminalForm;

impl FormView for TerminalForm {
    fn open(&mut self, at: Coords) {
        tracing::debug!(%at, "form opened");
    }

    fn close(&mut self) {
        tracing::debug!("form closed");
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Prints list entries while echoing is on.
#[derive(Debug, Default)]
pub struct TerminalList {
    echo: bool,
}

impl TerminalList {
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }
}

impl WorkoutList for TerminalList {
    fn render(&mut self, workout: &Workout) {
        if self.echo {
            println!("{}", format_entry(workout));
        }
    }

    fn clear(&mut self) {
        tracing::debug!("list cleared");
    }
}
