//! CLI interface for trailmark.
//!
//! Each subcommand runs one short session: restore the workouts, resolve the
//! current location, perform one action, persist.
//!
//! Locations are `<lat>,<lng>` in decimal degrees. The current location comes
//! from `--from`, then `TRAILMARK_LOCATION`, then the config file.

mod format;
mod terminal;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use jiff::tz::TimeZone;

use crate::config::Config;
use crate::location::ChainLocator;
use crate::model::{Coords, WorkoutId};
use crate::session::{FormSubmission, Session, SessionError};
use crate::storage::Storage;
use crate::store::{Restored, WorkoutStore};

use terminal::{TerminalForm, TerminalList, TerminalMap};

type TerminalSession = Session<TerminalMap, TerminalForm, TerminalList>;

/// trailmark — pin your runs and rides to the map.
#[derive(Debug, Parser)]
#[command(name = "trailmark", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Current location, `<lat>,<lng>`. Overrides TRAILMARK_LOCATION and the config file.
    #[arg(long, global = true, allow_hyphen_values = true)]
    from: Option<Coords>,

    /// Directory holding the workout snapshot. Defaults to `~/.trailmark/`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq).
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    command: Command,
}

const USAGE_HELP: &str = r#"Examples:
  trailmark --from 40.71,-74.00 add running --distance 5 --duration 30 --cadence 150
  trailmark add cycling --distance 20 --duration 60 --elevation 400 --at 40.78,-73.97
  trailmark list
  trailmark show 0601600123
  trailmark reset"#;

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a workout. Prints its list entry.
    ///
    /// Numbers are taken as typed and validated together:
    /// distance, duration and cadence must be positive,
    /// elevation must not be negative.
    Add {
        /// `running` or `cycling`.
        workout_type: String,

        /// Distance in kilometers.
        #[arg(long)]
        distance: String,

        /// Duration in minutes.
        #[arg(long)]
        duration: String,

        /// Steps per minute (running).
        #[arg(long)]
        cadence: Option<String>,

        /// Meters climbed (cycling).
        #[arg(long)]
        elevation: Option<String>,

        /// Where the workout happened, `<lat>,<lng>`. Defaults to the current location.
        #[arg(long, allow_hyphen_values = true)]
        at: Option<Coords>,
    },

    /// List all workouts, oldest first.
    List,

    /// Focus on one workout and count the visit.
    Show {
        /// Workout ID, as printed by `list`.
        id: String,
    },

    /// Remove every workout.
    Reset,
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    let root = cli
        .data_dir
        .or_else(|| config.data_dir.clone())
        .or_else(Storage::default_root)
        .ok_or("could not determine home directory")?;
    let storage = Storage::new(&root)
        .map_err(|e| format!("failed to initialize storage at {}: {e}", root.display()))?;

    let time_zone = match &config.time_zone {
        Some(name) => {
            TimeZone::get(name).map_err(|e| format!("unknown time zone {name:?}: {e}"))?
        }
        None => TimeZone::system(),
    };

    let echo = matches!(cli.command, Command::List);
    let mut session = Session::new(
        WorkoutStore::new(storage),
        TerminalMap,
        TerminalForm,
        TerminalList::new(echo),
    )
    .with_zoom(config.zoom)
    .with_time_zone(time_zone);
    let mut locator = ChainLocator::new(cli.from, config.location);

    match cli.command {
        Command::Add {
            workout_type,
            distance,
            duration,
            cadence,
            elevation,
            at,
        } => {
            let submission = FormSubmission {
                workout_type,
                distance,
                duration,
                cadence: cadence.unwrap_or_default(),
                elevation: elevation.unwrap_or_default(),
            };
            cmd_add(&mut session, &mut locator, &submission, at)
        }
        Command::List => cmd_list(&mut session, &mut locator),
        Command::Show { id } => cmd_show(&mut session, &mut locator, &WorkoutId::from(id)),
        Command::Reset => cmd_reset(&mut session),
    }
}

fn start(session: &mut TerminalSession, locator: &mut ChainLocator) -> Result<(), String> {
    match session.start(locator) {
        Ok(Restored::Discarded(e)) => {
            eprintln!(
                "Ignoring unreadable saved workouts ({e}); they will be replaced on the next save."
            );
            Ok(())
        }
        Ok(Restored::Workouts(count)) => {
            tracing::debug!(count, "workouts restored");
            Ok(())
        }
        Ok(Restored::Nothing) => Ok(()),
        Err(e) => Err(format!("failed to start session: {e}")),
    }
}

fn cmd_add(
    session: &mut TerminalSession,
    locator: &mut ChainLocator,
    submission: &FormSubmission,
    at: Option<Coords>,
) -> Result<(), String> {
    start(session, locator)?;

    let at = at
        .or_else(|| session.location())
        .ok_or("cannot place a workout without a current location")?;
    session.select_location(at).map_err(|e| e.to_string())?;

    session.list_mut().set_echo(true);
    match session.submit(submission) {
        Ok(_) => Ok(()),
        // Already alerted through the form.
        Err(SessionError::Validation(_)) => Err("workout not recorded".to_string()),
        Err(e) => Err(format!("failed to record workout: {e}")),
    }
}

fn cmd_list(session: &mut TerminalSession, locator: &mut ChainLocator) -> Result<(), String> {
    start(session, locator)?;

    if session.store().is_empty() {
        println!("No workouts");
    }
    Ok(())
}

fn cmd_show(
    session: &mut TerminalSession,
    locator: &mut ChainLocator,
    id: &WorkoutId,
) -> Result<(), String> {
    start(session, locator)?;

    let selected = session
        .select_workout(id)
        .map_err(|e| format!("failed to select workout: {e}"))?;
    match selected {
        Some(workout) => {
            println!("{}", format::format_entry(workout));
            eprintln!("Viewed {} time(s)", workout.clicks());
        }
        None => eprintln!("No workout with ID {id}"),
    }
    Ok(())
}

fn cmd_reset(session: &mut TerminalSession) -> Result<(), String> {
    session
        .reset()
        .map_err(|e| format!("failed to reset workouts: {e}"))?;
    eprintln!("All workouts removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "trailmark",
            "--from",
            "-33.87,151.21",
            "add",
            "running",
            "--distance",
            "5",
            "--duration",
            "30",
            "--cadence",
            "150",
            "--at",
            "-33.86,151.20",
        ])
        .unwrap();

        assert_eq!(cli.from, Some(Coords::new(-33.87, 151.21).unwrap()));
        let Command::Add { at, cadence, elevation, .. } = cli.command else {
            panic!("expected add");
        };
        assert_eq!(at, Some(Coords::new(-33.86, 151.20).unwrap()));
        assert_eq!(cadence.as_deref(), Some("150"));
        assert_eq!(elevation, None);
    }

    #[test]
    fn malformed_location_is_a_parse_error() {
        let result = Cli::try_parse_from(["trailmark", "--from", "nowhere", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn add_passes_raw_numbers_through() {
        // Validation happens in the session, not in argument parsing.
        let cli = Cli::try_parse_from([
            "trailmark",
            "add",
            "cycling",
            "--distance",
            "0",
            "--duration",
            "abc",
        ])
        .unwrap();

        let Command::Add {
            distance, duration, ..
        } = cli.command
        else {
            panic!("expected add");
        };
        assert_eq!(distance, "0");
        assert_eq!(duration, "abc");
    }
}
