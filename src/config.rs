use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Overlay settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// JSON file mapping driver names to divisions.
    pub division_file: PathBuf,

    /// How often telemetry is sampled, in milliseconds.
    pub poll_interval_ms: u64,

    /// How often the leaderboard is redrawn, in milliseconds.
    pub render_interval_ms: u64,

    /// Order the division filter cycles through when the player is not on track.
    pub division_cycle: Vec<String>,

    /// Filter the leaderboard starts with: `All`, `Mine` or a division label.
    pub division_filter: String,

    /// Field size of the built-in synthetic session.
    pub synthetic_cars: usize,
}

impl Default for OverlayConfig {
    fn default() -> OverlayConfig {
        OverlayConfig {
            division_file: PathBuf::from("league_divisions.json"),
            poll_interval_ms: 100,
            render_interval_ms: 100,
            division_cycle: ["Pro", "ProAm", "Am", "Rookie", "All"].iter().map(|s| s.to_string()).collect(),
            division_filter: "All".to_string(),
            synthetic_cars: 6,
        }
    }
}

impl OverlayConfig {
    /// Reads a config file; a file that does not exist gives the defaults.
    pub fn load(path: &Path) -> Result<OverlayConfig, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                return Ok(OverlayConfig::default());
            }
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };

        serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms.max(1))
    }
}
