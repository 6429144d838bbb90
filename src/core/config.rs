// Author: Dustin Pilgrim
// License: MIT

use crate::core::duration::Labels;
use crate::core::error::{ConfigError, Error};

/// Raw `duration` values below this are read as seconds, not milliseconds.
///
/// Quirk: 180 seconds and 180000 ms mean the same thing, but 179999 is
/// read as ~50 hours. Kept as-is; callers depending on it exist.
pub const SECONDS_HEURISTIC_LIMIT: f64 = 180_000.0;

/// Keepalive thresholds at or below this never signal.
pub const KEEPALIVE_FLOOR_SECONDS: u64 = 30;

/// Raw, unvalidated values as the host collected them (config file, flags).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub duration: Option<String>,
    pub when: Option<String>,
    pub keepalive: Option<String>,
    pub keepalive_command: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl Settings {
    /// Fields set in `other` win.
    pub fn overlay(mut self, other: Settings) -> Settings {
        fn pick(a: &mut Option<String>, b: Option<String>) {
            if b.is_some() {
                *a = b;
            }
        }

        pick(&mut self.duration, other.duration);
        pick(&mut self.when, other.when);
        pick(&mut self.keepalive, other.keepalive);
        pick(&mut self.keepalive_command, other.keepalive_command);
        pick(&mut self.before, other.before);
        pick(&mut self.after, other.after);
        pick(&mut self.start, other.start);
        pick(&mut self.end, other.end);
        self
    }
}

/// Validated controller configuration. Built once per (re)configuration
/// and never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum session lifetime used by relative resets.
    pub duration_ms: i64,

    /// Explicit initial target, as given. Parsed when the controller starts.
    pub when: Option<String>,

    pub keepalive_threshold_seconds: u64,

    /// Shell command run by the host in place of the default signal.
    pub keepalive_command: Option<String>,

    pub labels: Labels,
}

impl Config {
    /// Nothing configured: relative resets fail and keepalive is off.
    pub fn disabled() -> Self {
        Self {
            duration_ms: 0,
            when: None,
            keepalive_threshold_seconds: 0,
            keepalive_command: None,
            labels: Labels::default(),
        }
    }

    pub fn with_duration(self, raw: &str) -> Result<Self, Error> {
        let duration_ms = parse_duration_ms(raw).map_err(Error::InvalidConfig)?;
        Ok(Self { duration_ms, ..self })
    }

    pub fn with_keepalive(self, raw: &str) -> Result<Self, Error> {
        let keepalive_threshold_seconds =
            parse_keepalive_seconds(raw).map_err(Error::InvalidConfig)?;
        Ok(Self { keepalive_threshold_seconds, ..self })
    }

    pub fn with_when(self, raw: Option<&str>) -> Self {
        let when = raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Self { when, ..self }
    }

    pub fn with_keepalive_command(self, raw: Option<&str>) -> Self {
        let keepalive_command = raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Self { keepalive_command, ..self }
    }

    pub fn with_labels(self, labels: Labels) -> Self {
        Self { labels, ..self }
    }

    /// Validate every field of `settings`. Fields that fail keep their
    /// disabled value and are reported back; the rest still apply.
    pub fn from_settings(settings: &Settings) -> (Self, Vec<Error>) {
        let mut cfg = Config::disabled();
        let mut errors = Vec::new();

        if let Some(raw) = settings.duration.as_deref() {
            match cfg.clone().with_duration(raw) {
                Ok(next) => cfg = next,
                Err(e) => errors.push(e),
            }
        }

        if let Some(raw) = settings.keepalive.as_deref() {
            match cfg.clone().with_keepalive(raw) {
                Ok(next) => cfg = next,
                Err(e) => errors.push(e),
            }
        }

        let defaults = Labels::default();
        let labels = Labels {
            before: settings.before.clone().unwrap_or(defaults.before),
            after: settings.after.clone().unwrap_or(defaults.after),
            start: settings.start.clone().unwrap_or(defaults.start),
            end: settings.end.clone().unwrap_or(defaults.end),
        };

        let cfg = cfg
            .with_when(settings.when.as_deref())
            .with_keepalive_command(settings.keepalive_command.as_deref())
            .with_labels(labels);
        (cfg, errors)
    }

    pub fn keepalive_enabled(&self) -> bool {
        self.keepalive_threshold_seconds > KEEPALIVE_FLOOR_SECONDS
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::disabled()
    }
}

/// Parse a session duration into milliseconds, applying the
/// seconds-vs-milliseconds heuristic.
pub fn parse_duration_ms(raw: &str) -> Result<i64, ConfigError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidDuration(raw.to_string()))?;

    if !value.is_finite() {
        return Err(ConfigError::InvalidDuration(raw.to_string()));
    }

    let ms = if value < SECONDS_HEURISTIC_LIMIT { value * 1000.0 } else { value };
    Ok(ms.trunc() as i64)
}

pub fn parse_keepalive_seconds(raw: &str) -> Result<u64, ConfigError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidKeepalive(raw.to_string()))?;

    if !value.is_finite() {
        return Err(ConfigError::InvalidKeepalive(raw.to_string()));
    }

    Ok(value.max(0.0).trunc() as u64)
}
