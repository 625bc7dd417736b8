//! trailmark configuration.
//!
//! Loaded from `~/.trailmark/config.toml`. A missing file means defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::Coords;
use crate::session::DEFAULT_ZOOM;

/// Highest zoom level the map understands.
const MAX_ZOOM: u8 = 20;

/// trailmark configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Fallback current location, `[lat, lng]`.
    /// Used when neither `--from` nor `TRAILMARK_LOCATION` is set.
    pub location: Option<Coords>,

    /// Map zoom level when centering on a location.
    pub zoom: u8,

    /// Where workouts are stored. Defaults to `~/.trailmark/`.
    pub data_dir: Option<PathBuf>,

    /// IANA time zone for workout descriptions (e.g. `"Europe/Paris"`).
    /// Defaults to the system time zone.
    pub time_zone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: None,
            zoom: DEFAULT_ZOOM,
            data_dir: None,
            time_zone: None,
        }
    }
}

impl Config {
    /// Load config from `~/.trailmark/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self, String> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.zoom > MAX_ZOOM {
            return Err(format!(
                "zoom {} in {} is out of range (0-{MAX_ZOOM})",
                config.zoom,
                path.display()
            ));
        }

        if let Some(location) = config.location {
            location
                .within_range()
                .map_err(|e| format!("location in {}: {e}", path.display()))?;
        }

        Ok(config)
    }

    /// The config file path: `~/.trailmark/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".trailmark").join("config.toml"))
    }
}
