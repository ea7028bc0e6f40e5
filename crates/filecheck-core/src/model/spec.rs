/// Validated scan parameters for one configuration section.
///
/// A `ScanSpec` can only be built through [`ScanSpec::new`], which enforces
/// the invariants the scanner relies on: a positive poll interval, at least
/// one attempt, and a window that does not cross midnight.
use crate::config::{KEY_CHECK_INTERVAL, KEY_MAX_CHECKS};
use crate::error::ConfigError;
use chrono::NaiveTime;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSpec {
    section: String,
    path: PathBuf,
    pattern: String,
    start: NaiveTime,
    end: NaiveTime,
    interval: Duration,
    max_checks: u32,
}

impl ScanSpec {
    /// Build a spec, rejecting a zero interval, zero attempts, or a window
    /// whose start lies after its end.
    pub fn new(
        section: impl Into<String>,
        path: impl Into<PathBuf>,
        pattern: impl Into<String>,
        start: NaiveTime,
        end: NaiveTime,
        interval_secs: u64,
        max_checks: u32,
    ) -> Result<Self, ConfigError> {
        let section = section.into();
        if interval_secs == 0 {
            return Err(ConfigError::NonPositive {
                section,
                key: KEY_CHECK_INTERVAL,
            });
        }
        if max_checks == 0 {
            return Err(ConfigError::NonPositive {
                section,
                key: KEY_MAX_CHECKS,
            });
        }
        if start > end {
            return Err(ConfigError::InvertedWindow {
                section,
                start: start.format("%H:%M").to_string(),
                end: end.format("%H:%M").to_string(),
            });
        }

        Ok(Self {
            section,
            path: path.into(),
            pattern: pattern.into(),
            start,
            end,
            interval: Duration::from_secs(interval_secs),
            max_checks,
        })
    }

    /// Name of the configuration section this spec came from.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Directory to poll, with environment references already expanded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Case-sensitive substring a file name must contain.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Wait between two consecutive attempts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Upper bound on the number of attempts.
    pub fn max_checks(&self) -> u32 {
        self.max_checks
    }

    /// `true` if `file_name` contains the pattern.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.contains(self.pattern.as_str())
    }
}
