/// Run settings — where the configuration lives, where logs go, and whether
/// sections are polled one after another or side by side.
///
/// The binary takes no arguments. Each setting has a fixed default that an
/// environment variable can override.
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/filecheck/filecheck.ini";
pub const DEFAULT_LOG_DIR: &str = "/var/log/filecheck";

pub const ENV_CONFIG_PATH: &str = "FILECHECK_CONFIG";
pub const ENV_LOG_DIR: &str = "FILECHECK_LOG_DIR";
pub const ENV_CONCURRENT: &str = "FILECHECK_CONCURRENT";

/// How the runner schedules sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Section N+1 starts only after section N's loop has ended.
    #[default]
    Sequential,
    /// One thread per section, each with its own independent loop.
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub config_path: PathBuf,
    pub log_dir: PathBuf,
    pub mode: RunMode,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            mode: RunMode::Sequential,
        }
    }
}

impl RunSettings {
    /// Defaults overridden by `FILECHECK_CONFIG`, `FILECHECK_LOG_DIR`, and
    /// `FILECHECK_CONCURRENT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunSettings::from_env`] with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            config_path: non_empty(ENV_CONFIG_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            log_dir: non_empty(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            mode: match non_empty(ENV_CONCURRENT) {
                Some(flag) if is_truthy(&flag) => RunMode::Concurrent,
                _ => RunMode::Sequential,
            },
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> RunSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(settings(&[]), RunSettings::default());
    }

    #[test]
    fn paths_are_overridable() {
        let s = settings(&[
            (ENV_CONFIG_PATH, "/opt/fc/config.ini"),
            (ENV_LOG_DIR, "/opt/fc/logs"),
        ]);
        assert_eq!(s.config_path, PathBuf::from("/opt/fc/config.ini"));
        assert_eq!(s.log_dir, PathBuf::from("/opt/fc/logs"));
        assert_eq!(s.mode, RunMode::Sequential);
    }

    #[test]
    fn empty_override_falls_back_to_default() {
        let s = settings(&[(ENV_LOG_DIR, "  ")]);
        assert_eq!(s.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
    }

    #[test]
    fn concurrent_flag_accepts_common_spellings() {
        for flag in ["1", "true", "YES", "on"] {
            assert_eq!(settings(&[(ENV_CONCURRENT, flag)]).mode, RunMode::Concurrent);
        }
        for flag in ["0", "false", "no", "maybe"] {
            assert_eq!(settings(&[(ENV_CONCURRENT, flag)]).mode, RunMode::Sequential);
        }
    }
}
