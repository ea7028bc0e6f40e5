/// Configuration — the INI-style document and the per-section loader.
///
/// A document is a list of named sections, each a set of `key = value`
/// pairs. Every section except `[DEFAULT]` describes one directory to poll;
/// keys in `[DEFAULT]` (or before the first header) are fallbacks shared by
/// all of them.
///
/// Reading the document and turning one section into a [`ScanSpec`] are two
/// separate steps so that a malformed section only costs that section, while
/// an unreadable file aborts the whole run.
pub mod env;

use crate::error::ConfigError;
use crate::model::ScanSpec;
use chrono::NaiveTime;
use configparser::ini::Ini;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the section whose keys apply to every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

pub const KEY_PATH: &str = "path";
pub const KEY_PATTERN: &str = "pattern";
pub const KEY_START_TIME: &str = "start_time";
pub const KEY_END_TIME: &str = "end_time";
pub const KEY_CHECK_INTERVAL: &str = "check_interval";
pub const KEY_MAX_CHECKS: &str = "max_checks";

const TIME_FORMAT: &str = "%H:%M";

type Entries = IndexMap<String, String>;

/// How the document bytes were decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// Not valid UTF-8; every byte was read as one Latin-1 character.
    Latin1,
}

/// A parsed configuration document. Sections keep their on-disk order.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    defaults: Entries,
    sections: IndexMap<String, Entries>,
    encoding: TextEncoding,
}

impl ConfigDocument {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::parse_bytes(&bytes)?;
        if doc.encoding == TextEncoding::Latin1 {
            warn!(
                "Configuration file '{}' is not UTF-8, reading it as Latin-1",
                path.display()
            );
        }
        Ok(doc)
    }

    /// Parse raw document bytes: UTF-8 when valid, Latin-1 otherwise.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::parse(text),
            Err(_) => {
                let text: String = bytes.iter().map(|&b| char::from(b)).collect();
                let mut doc = Self::parse(&text)?;
                doc.encoding = TextEncoding::Latin1;
                Ok(doc)
            }
        }
    }

    /// Parse document text.
    ///
    /// `[section]` headers, `key = value` / `key: value` pairs, `#` / `;`
    /// comments (also after a value or a header), and indented continuation
    /// lines. Section names are case-sensitive, keys are not. A repeated
    /// section merges into the first one and a repeated key keeps its last
    /// value. A key without a value is rejected.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut ini = Ini::new_cs();
        ini.set_default_section(DEFAULT_SECTION);
        ini.set_multiline(true);
        let parsed = ini.read(text.to_string()).map_err(ConfigError::Parse)?;

        let mut doc = Self::default();
        for (section, entries) in parsed {
            let mut normalised = Entries::new();
            for (key, value) in entries {
                let value = value.ok_or_else(|| {
                    ConfigError::Parse(format!("section '{section}': key '{key}' has no value"))
                })?;
                normalised.insert(key.to_lowercase(), value);
            }

            if section == DEFAULT_SECTION {
                doc.defaults = normalised;
            } else {
                doc.sections.insert(section, normalised);
            }
        }
        Ok(doc)
    }

    /// Scan section names in on-disk order, excluding `[DEFAULT]`.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Look up `key` in `section`, falling back to `[DEFAULT]`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }
}

/// Resolve `section` of `doc` into a validated [`ScanSpec`].
///
/// The `path` value has `$VAR` / `${VAR}` references expanded from the
/// process environment.
pub fn load_section(doc: &ConfigDocument, section: &str) -> Result<ScanSpec, ConfigError> {
    if !doc.has_section(section) {
        return Err(ConfigError::MissingSection(section.to_string()));
    }

    let require = |key: &'static str| {
        doc.get(section, key).ok_or_else(|| ConfigError::MissingKey {
            section: section.to_string(),
            key,
        })
    };

    let path = to_path(&env::expand_vars(require(KEY_PATH)?), doc.encoding());
    let pattern = require(KEY_PATTERN)?;
    let start = parse_time(section, KEY_START_TIME, require(KEY_START_TIME)?)?;
    let end = parse_time(section, KEY_END_TIME, require(KEY_END_TIME)?)?;
    let interval = parse_positive(section, KEY_CHECK_INTERVAL, require(KEY_CHECK_INTERVAL)?)?;
    let max_checks = parse_positive(section, KEY_MAX_CHECKS, require(KEY_MAX_CHECKS)?)?;
    let max_checks = u32::try_from(max_checks).map_err(|_| ConfigError::InvalidNumber {
        section: section.to_string(),
        key: KEY_MAX_CHECKS,
        value: max_checks.to_string(),
    })?;

    ScanSpec::new(section, path, pattern, start, end, interval, max_checks)
}

/// A Latin-1 document names its paths in Latin-1 bytes; on Unix those bytes
/// are the file name, so characters below U+0100 map back to single bytes.
#[cfg(unix)]
fn to_path(value: &str, encoding: TextEncoding) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    if encoding == TextEncoding::Utf8 {
        return PathBuf::from(value);
    }
    let mut bytes = Vec::with_capacity(value.len());
    for ch in value.chars() {
        match u8::try_from(u32::from(ch)) {
            Ok(byte) => bytes.push(byte),
            // From an expanded environment variable.
            Err(_) => bytes.extend_from_slice(ch.encode_utf8(&mut [0; 4]).as_bytes()),
        }
    }
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn to_path(value: &str, _encoding: TextEncoding) -> PathBuf {
    PathBuf::from(value)
}

fn parse_time(section: &str, key: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| ConfigError::InvalidTime {
        section: section.to_string(),
        key,
        value: value.to_string(),
    })
}

fn parse_positive(section: &str, key: &'static str, value: &str) -> Result<u64, ConfigError> {
    let parsed: i64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        section: section.to_string(),
        key,
        value: value.to_string(),
    })?;
    u64::try_from(parsed)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::NonPositive {
            section: section.to_string(),
            key,
        })
}
