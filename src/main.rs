//! filecheck — polls configured directories for files arriving within a
//! daily time window.
//!
//! Thin binary entry point. All logic lives in the `filecheck-core` crate.

use anyhow::Context;
use filecheck_core::logging::Logging;
use filecheck_core::runner::{run_from_file, RUN_STARTED};
use filecheck_core::scanner::{FsLister, SystemClock};
use filecheck_core::settings::RunSettings;

fn main() -> anyhow::Result<()> {
    let settings = RunSettings::from_env();

    // Falls back to stderr-only logging if the log directory is unusable.
    let logging = Logging::init_or_console(&settings.log_dir);

    logging.scope(|| {
        tracing::info!("{RUN_STARTED}");
        if let Some(log_file) = logging.log_file() {
            tracing::info!("Log file: '{}'", log_file.display());
        }

        // Exit status is non-zero only when the configuration file cannot be
        // read or parsed; failing sections never change it.
        run_from_file(&settings.config_path, settings.mode, &SystemClock, &FsLister)
            .context("configuration could not be read")?;
        Ok(())
    })
}
