/// Logging — the daily append log and the explicit logger handle.
///
/// One file per local calendar day, `file_check_YYYYMMDD.log`, opened in
/// append mode so several runs on the same day share it. Lines look like
///
/// ```text
/// 01.03.2024 09:05:00  INFO section{name="INBOX"}: File 'ABC_1.txt' found. Modified at 09:06:00
/// ```
///
/// No global subscriber is installed. [`Logging`] owns a `Dispatch`; the
/// binary runs inside [`Logging::scope`] and the runner forwards the current
/// dispatcher to any worker thread it spawns.
use crate::error::LoggingSetupError;
use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

pub const LOG_FILE_PREFIX: &str = "file_check";
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
const DEFAULT_CONSOLE_FILTER: &str = "warn";

/// File name of the log for `date`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{LOG_FILE_PREFIX}_{}.log", date.format("%Y%m%d"))
}

/// Logger handle for one process run.
///
/// Dropping it flushes the file writer, so keep it alive until the run ends.
pub struct Logging {
    dispatch: Dispatch,
    log_file: Option<PathBuf>,
    _guard: Option<WorkerGuard>,
}

impl Logging {
    /// Open today's log file in `log_dir`, creating the directory on demand.
    pub fn init(log_dir: &Path) -> Result<Self, LoggingSetupError> {
        fs::create_dir_all(log_dir).map_err(|source| LoggingSetupError::CreateDir {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let log_file = log_dir.join(log_file_name(Local::now().date_naive()));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|source| LoggingSetupError::OpenFile {
                path: log_file.clone(),
                source,
            })?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_filter(LevelFilter::INFO);

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer());

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            log_file: Some(log_file),
            _guard: Some(guard),
        })
    }

    /// Stderr-only logging, used when the log file cannot be set up.
    pub fn console_only() -> Self {
        let subscriber = tracing_subscriber::registry().with(console_layer());
        Self {
            dispatch: Dispatch::new(subscriber),
            log_file: None,
            _guard: None,
        }
    }

    /// [`Logging::init`], degrading to [`Logging::console_only`] with the
    /// failure reported on stderr.
    pub fn init_or_console(log_dir: &Path) -> Self {
        match Self::init(log_dir) {
            Ok(logging) => logging,
            Err(err) => {
                eprintln!("Failed to set up logging: {err}");
                Self::console_only()
            }
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Path of today's log file, if file logging is active.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Run `f` with this logger as the current dispatcher.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

fn console_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter)
}
