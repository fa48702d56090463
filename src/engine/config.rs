//! Runtime configuration: database location, time zone, clock and
//! projection policy.

use super::clock::{Clock, FixedClock, ZonedClock, DEFAULT_TIMEZONE};
use super::error::FolgaError;
use super::projection::WindowPolicy;
use super::types::parse_date;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

pub const DB_DIR: &str = ".folga";
pub const DB_FILE: &str = "state.db";

/// Default database path relative to the working directory.
#[must_use]
pub fn default_db_path() -> PathBuf {
    Path::new(DB_DIR).join(DB_FILE)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub timezone: Tz,
    /// Pins "today" instead of reading the system clock.
    pub today: Option<NaiveDate>,
    pub window: WindowPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            timezone: DEFAULT_TIMEZONE,
            today: None,
            window: WindowPolicy::default(),
        }
    }
}

impl Config {
    /// Builds a configuration from raw flag/env values.
    ///
    /// # Errors
    /// Returns `FolgaError` for an unknown time zone, a malformed pinned date
    /// or an unknown window policy.
    pub fn from_raw(
        db_path: Option<PathBuf>,
        timezone: Option<&str>,
        today: Option<&str>,
        window: Option<&str>,
    ) -> Result<Self, FolgaError> {
        let timezone = match timezone {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| FolgaError::InvalidInput(format!("unknown time zone '{name}'")))?,
            None => DEFAULT_TIMEZONE,
        };
        let today = today.map(|s| parse_date("today", s)).transpose()?;
        let window = window
            .map(str::parse::<WindowPolicy>)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            db_path: db_path.unwrap_or_else(default_db_path),
            timezone,
            today,
            window,
        })
    }

    /// The clock every command reads "today" from.
    #[must_use]
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.today {
            Some(day) => Box::new(FixedClock(day)),
            None => Box::new(ZonedClock::new(self.timezone)),
        }
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock().today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_raw(None, None, None, None).unwrap();
        assert_eq!(config.timezone, chrono_tz::America::Sao_Paulo);
        assert_eq!(config.window, WindowPolicy::Fixed);
        assert_eq!(config.db_path, Path::new(".folga").join("state.db"));
        assert!(config.today.is_none());
    }

    #[test]
    fn test_pinned_today_drives_clock() {
        let config = Config::from_raw(None, Some("UTC"), Some("2024-03-01"), Some("widening")).unwrap();
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(config.window, WindowPolicy::Widening);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Config::from_raw(None, Some("Mars/Olympus"), None, None).is_err());
        assert!(Config::from_raw(None, None, Some("yesterday"), None).is_err());
        assert!(Config::from_raw(None, None, None, Some("elastic")).is_err());
    }
}
