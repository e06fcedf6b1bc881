use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_WEEKS_PER_MONTH: u32 = 4;
pub const MAX_WEEKS_PER_MONTH: u32 = 5;
const DEFAULT_DEVIATION_TOLERANCE: f64 = 1.0;
const DEFAULT_DECIMAL_PLACES: u32 = 2;
const MAX_DECIMAL_PLACES: u32 = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CalendarConfig {
    /// Every month is split into this many week slots.
    pub weeks_per_month: u32,
    /// Year used for the fallback span when neither contract date parses.
    pub default_year: Option<i32>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            weeks_per_month: DEFAULT_WEEKS_PER_MONTH,
            default_year: None,
        }
    }
}

impl CalendarConfig {
    pub fn weeks_per_month(&self) -> u32 {
        if (1..=MAX_WEEKS_PER_MONTH).contains(&self.weeks_per_month) {
            self.weeks_per_month
        } else {
            DEFAULT_WEEKS_PER_MONTH
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    /// Deviation (in percentage points) still considered on track.
    pub deviation_tolerance: f64,
    /// Rounding applied when values are shown or exported.
    pub decimal_places: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            deviation_tolerance: DEFAULT_DEVIATION_TOLERANCE,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl Config {
    /// Reads `config.json` from `base_dir`. A missing file yields defaults.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config.sanitized())
    }

    pub fn save(&self, base_dir: &Path) -> Result<()> {
        fs::create_dir_all(base_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(base_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        let weeks = self.calendar.weeks_per_month;
        if weeks != self.calendar.weeks_per_month() {
            warn!(weeks, "weeks_per_month out of range, using {}", DEFAULT_WEEKS_PER_MONTH);
            self.calendar.weeks_per_month = DEFAULT_WEEKS_PER_MONTH;
        }
        if !self.deviation_tolerance.is_finite() || self.deviation_tolerance < 0.0 {
            warn!(
                tolerance = self.deviation_tolerance,
                "invalid deviation_tolerance, using {}", DEFAULT_DEVIATION_TOLERANCE
            );
            self.deviation_tolerance = DEFAULT_DEVIATION_TOLERANCE;
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            self.decimal_places = MAX_DECIMAL_PLACES;
        }
        self
    }
}
