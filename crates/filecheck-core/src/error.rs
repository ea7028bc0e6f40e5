/// Error types for configuration, directory listing, and logging setup.
///
/// Each category has its own recovery scope: a [`ListingError`] is absorbed
/// by the attempt that raised it, a [`ConfigError`] skips one section (or the
/// whole run when the document itself is unreadable), and a
/// [`LoggingSetupError`] only downgrades logging to stderr.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The configuration source, or one section of it, could not be turned into
/// a valid [`ScanSpec`](crate::model::ScanSpec).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(String),

    #[error("section '{0}' not found")]
    MissingSection(String),

    #[error("section '{section}': missing key '{key}'")]
    MissingKey { section: String, key: &'static str },

    #[error("section '{section}': '{key}' must be an integer, got '{value}'")]
    InvalidNumber {
        section: String,
        key: &'static str,
        value: String,
    },

    #[error("section '{section}': '{key}' must be greater than zero")]
    NonPositive { section: String, key: &'static str },

    #[error("section '{section}': '{key}' must be HH:MM, got '{value}'")]
    InvalidTime {
        section: String,
        key: &'static str,
        value: String,
    },

    #[error("section '{section}': start_time {start} is after end_time {end}")]
    InvertedWindow {
        section: String,
        start: String,
        end: String,
    },
}

/// A directory could not be listed during one poll attempt.
#[derive(Debug, Error)]
#[error("cannot list directory '{}': {source}", path.display())]
pub struct ListingError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// The daily log file could not be set up.
#[derive(Debug, Error)]
pub enum LoggingSetupError {
    #[error("cannot create log directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open log file '{}': {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_section_and_key() {
        let err = ConfigError::InvalidNumber {
            section: "INBOX".into(),
            key: "max_checks",
            value: "three".into(),
        };
        assert_eq!(
            err.to_string(),
            "section 'INBOX': 'max_checks' must be an integer, got 'three'"
        );
    }

    #[test]
    fn listing_error_keeps_io_source() {
        let err = ListingError {
            path: PathBuf::from("/mnt/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/mnt/missing"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
