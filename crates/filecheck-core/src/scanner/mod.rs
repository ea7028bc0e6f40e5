/// Scanner module — the bounded polling loop for one section.
///
/// A scan runs only if it *starts* inside the section's daily window. Once
/// running it makes up to `max_checks` attempts, each one listing the
/// directory and recording every pattern-matching file whose modification
/// time lies inside the window. It stops at whichever comes first: the
/// attempt budget is spent, or the clock passes the end of the window. A hit
/// does not end the scan early.
///
/// Time and the filesystem are reached only through [`Clock`] and
/// [`DirLister`], so the loop can be driven without real delays.
pub mod clock;
pub mod listing;

#[cfg(test)]
pub(crate) mod fakes;

pub use clock::{Clock, SystemClock};
pub use listing::{DirLister, FsLister, ListedEntry};

use crate::model::{ScanOutcome, ScanResult, ScanSpec, Window};
use tracing::{debug, error, info, warn};

/// Run the polling loop for `spec` and return every distinct file found.
pub fn scan<C, L>(spec: &ScanSpec, clock: &C, lister: &L) -> ScanResult
where
    C: Clock + ?Sized,
    L: DirLister + ?Sized,
{
    let started = clock.now();
    let window = Window::for_date(spec, started.date());
    let mut result = ScanResult::new(spec.section());

    if !window.contains(started) {
        info!(
            "Skipping '{}': current time {} is outside the window {}-{}",
            spec.section(),
            started.format("%H:%M:%S"),
            spec.start().format("%H:%M"),
            spec.end().format("%H:%M"),
        );
        result.outcome = ScanOutcome::OutsideWindow;
        return result;
    }

    result.outcome = loop {
        if result.attempts >= spec.max_checks() {
            break ScanOutcome::AttemptsExhausted;
        }
        if window.has_closed(clock.now()) {
            break ScanOutcome::WindowClosed;
        }

        result.attempts += 1;
        info!(
            "Check {} started for '{}'",
            result.attempts,
            spec.section()
        );
        poll_once(spec, &window, lister, &mut result);

        // No wait after the final attempt.
        if result.attempts < spec.max_checks() {
            clock.sleep(spec.interval());
        }
    };

    debug!(
        "Scan of '{}' ended after {} attempt(s): {:?}",
        spec.section(),
        result.attempts,
        result.outcome
    );

    if result.is_empty() {
        info!("RESULT - no matching files found for '{}'", spec.section());
    } else {
        info!(
            "RESULT - {} file(s) found: {}",
            result.len(),
            result.joined()
        );
    }

    result
}

/// One attempt: list, filter by pattern, record in-window files.
///
/// Returns how many entries matched the pattern. A listing failure is logged
/// and counts as zero matches.
fn poll_once<L>(spec: &ScanSpec, window: &Window, lister: &L, result: &mut ScanResult) -> usize
where
    L: DirLister + ?Sized,
{
    let entries = match lister.list(spec.path()) {
        Ok(entries) => entries,
        Err(err) => {
            error!("Failed to process files in '{}': {err}", spec.path().display());
            return 0;
        }
    };

    let mut matched = 0;
    for entry in entries.iter().filter(|entry| spec.matches(&entry.name)) {
        matched += 1;
        let name = &entry.name;

        let modified = match lister.modified(&entry.path) {
            Ok(modified) => modified,
            Err(err) => {
                warn!("Cannot read modification time of '{name}': {err}");
                continue;
            }
        };

        if window.contains(modified) && result.record(name) {
            info!(
                "File '{}' found. Modified at {}",
                name,
                modified.format("%H:%M:%S")
            );
        }
    }

    if matched == 0 {
        info!(
            "No files in '{}' match the pattern '{}'",
            spec.path().display(),
            spec.pattern()
        );
    }

    matched
}
