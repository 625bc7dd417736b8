//! Current-location resolution for the command line.
//!
//! There is no GPS here, so "where am I" is resolved through a chain:
//!
//! 1. `--from <lat,lng>` — explicit per-command override
//! 2. `TRAILMARK_LOCATION` env var — process/session level
//! 3. `location = [lat, lng]` in `~/.trailmark/config.toml`
//!
//! The resolved location centers the map and is the default spot for new
//! workouts.

use std::env;

use crate::model::Coords;
use crate::session::{LocationUnavailable, Locator};

/// Environment variable consulted after `--from`.
pub const LOCATION_ENV: &str = "TRAILMARK_LOCATION";

/// Reason given when no source yields a location.
pub const LOCATION_REQUIRED: &str = "no location set: pass --from <lat,lng>, \
    set TRAILMARK_LOCATION, or add `location = [lat, lng]` to ~/.trailmark/config.toml";

/// [`Locator`] over the `--from` / env / config chain.
#[derive(Debug, Clone)]
pub struct ChainLocator {
    explicit: Option<Coords>,
    configured: Option<Coords>,
}

impl ChainLocator {
    pub fn new(explicit: Option<Coords>, configured: Option<Coords>) -> Self {
        Self {
            explicit,
            configured,
        }
    }
}

impl Locator for ChainLocator {
    fn locate(&mut self) -> Result<Coords, LocationUnavailable> {
        resolve(self.explicit, env::var(LOCATION_ENV).ok(), self.configured)
    }
}

/// Resolve the current location from the tiered chain.
///
/// A set-but-malformed env var is an error rather than a silent fall-through.
fn resolve(
    explicit: Option<Coords>,
    from_env: Option<String>,
    configured: Option<Coords>,
) -> Result<Coords, LocationUnavailable> {
    // 1. Explicit --from flag.
    if let Some(coords) = explicit {
        return Ok(coords);
    }

    // 2. TRAILMARK_LOCATION environment variable.
    if let Some(raw) = from_env
        && !raw.trim().is_empty()
    {
        return raw.parse().map_err(|e| LocationUnavailable {
            reason: format!("{LOCATION_ENV}: {e}"),
        });
    }

    // 3. Config file.
    configured.ok_or_else(|| LocationUnavailable {
        reason: LOCATION_REQUIRED.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Coords {
        Coords::new(48.85, 2.35).unwrap()
    }

    fn oslo() -> Coords {
        Coords::new(59.91, 10.75).unwrap()
    }

    #[test]
    fn explicit_wins() {
        let coords = resolve(Some(paris()), Some("1,1".into()), Some(oslo())).unwrap();
        assert_eq!(coords, paris());
    }

    #[test]
    fn env_beats_config() {
        let coords = resolve(None, Some("59.91, 10.75".into()), Some(paris())).unwrap();
        assert_eq!(coords, oslo());
    }

    #[test]
    fn blank_env_falls_through_to_config() {
        let coords = resolve(None, Some("  ".into()), Some(paris())).unwrap();
        assert_eq!(coords, paris());
    }

    #[test]
    fn malformed_env_is_unavailable() {
        let err = resolve(None, Some("somewhere".into()), Some(paris())).unwrap_err();
        assert!(err.reason.starts_with(LOCATION_ENV));
    }

    #[test]
    fn nothing_set_is_unavailable() {
        let err = resolve(None, None, None).unwrap_err();
        assert_eq!(err.reason, LOCATION_REQUIRED);
    }
}
