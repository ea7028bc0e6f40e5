/// filecheck Core — configuration, time-window polling, and logging.
///
/// This crate contains all of the scanning logic with no process-level
/// concerns. The binary only wires settings, logging, and the runner together.
///
/// # Modules
///
/// - [`config`] — INI-style configuration document and the validating section loader.
/// - [`model`] — `ScanSpec`, the daily `Window`, and the `ScanResult` set.
/// - [`scanner`] — The bounded polling loop plus its clock and listing seams.
/// - [`runner`] — Iterates every configured section, sequentially or concurrently.
/// - [`logging`] — Daily append log sink behind an explicit logger handle.
/// - [`settings`] — Config path, log directory, and run mode for one process run.
/// - [`error`] — Error taxonomy shared by the modules above.
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod runner;
pub mod scanner;
pub mod settings;

pub use error::{ConfigError, ListingError, LoggingSetupError};
