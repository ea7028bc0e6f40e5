/// Runner — polls every configured section.
///
/// Sections are visited in on-disk order. A section whose parameters do not
/// validate is logged and skipped; the others still run. Each section's log
/// lines are emitted inside a `section{name=..}` span so they stay
/// attributable when sections run concurrently.
use crate::config::{load_section, ConfigDocument};
use crate::error::ConfigError;
use crate::model::ScanResult;
use crate::scanner::{scan, Clock, DirLister};
use crate::settings::RunMode;
use serde_json::json;
use std::path::Path;
use std::thread;
use tracing::{debug, error, info, info_span, Dispatch};

pub const RUN_STARTED: &str = "====== filecheck run started ======";
pub const RUN_FINISHED: &str = "====== filecheck run finished ======";

/// What happened to one section.
#[derive(Debug)]
pub enum SectionOutcome {
    Scanned(ScanResult),
    /// The section's parameters were invalid; it was not scanned.
    Failed(ConfigError),
}

#[derive(Debug)]
pub struct SectionReport {
    pub section: String,
    pub outcome: SectionOutcome,
}

/// Per-section reports, in on-disk section order regardless of run mode.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub sections: Vec<SectionReport>,
}

impl RunSummary {
    /// Results of the sections that were scanned.
    pub fn scanned(&self) -> impl Iterator<Item = &ScanResult> {
        self.sections.iter().filter_map(|r| match &r.outcome {
            SectionOutcome::Scanned(result) => Some(result),
            SectionOutcome::Failed(_) => None,
        })
    }

    pub fn failed_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|r| matches!(r.outcome, SectionOutcome::Failed(_)))
            .count()
    }

    /// Total distinct files found across all sections.
    pub fn total_files(&self) -> usize {
        self.scanned().map(ScanResult::len).sum()
    }

    /// Machine-readable one-line summary of the run.
    pub fn to_json(&self) -> serde_json::Value {
        let sections: Vec<_> = self
            .sections
            .iter()
            .map(|report| match &report.outcome {
                SectionOutcome::Scanned(result) => json!(result),
                SectionOutcome::Failed(err) => json!({
                    "section": report.section,
                    "error": err.to_string(),
                }),
            })
            .collect();
        json!({
            "sections": sections,
            "failed": self.failed_count(),
            "total_files": self.total_files(),
        })
    }
}

/// Read the configuration file at `config_path` and poll every section.
///
/// An unreadable or malformed file is logged and returned before any section
/// runs, and the run-end marker is not written.
pub fn run_from_file<C, L>(
    config_path: &Path,
    mode: RunMode,
    clock: &C,
    lister: &L,
) -> Result<RunSummary, ConfigError>
where
    C: Clock + ?Sized,
    L: DirLister + ?Sized,
{
    let doc = ConfigDocument::load(config_path).map_err(|err| {
        error!("Failed to read the configuration file: {err}");
        err
    })?;
    info!("Configuration file read: '{}'", config_path.display());

    let summary = run_sections(&doc, mode, clock, lister);
    info!(
        "{} section(s) checked, {} skipped on bad parameters, {} file(s) found",
        summary.sections.len(),
        summary.failed_count(),
        summary.total_files()
    );
    debug!("Run summary: {}", summary.to_json());
    info!("{RUN_FINISHED}");

    Ok(summary)
}

/// Poll every section of `doc`.
pub fn run_sections<C, L>(doc: &ConfigDocument, mode: RunMode, clock: &C, lister: &L) -> RunSummary
where
    C: Clock + ?Sized,
    L: DirLister + ?Sized,
{
    let sections = match mode {
        RunMode::Sequential => doc
            .sections()
            .map(|section| run_section(doc, section, clock, lister))
            .collect(),
        RunMode::Concurrent => run_concurrent(doc, clock, lister),
    };
    RunSummary { sections }
}

/// One scoped thread per section. Workers inherit the caller's dispatcher
/// and report back over a channel; reports are reordered by section index.
fn run_concurrent<C, L>(doc: &ConfigDocument, clock: &C, lister: &L) -> Vec<SectionReport>
where
    C: Clock + ?Sized,
    L: DirLister + ?Sized,
{
    let dispatch = tracing::dispatcher::get_default(Dispatch::clone);
    let (report_tx, report_rx) = crossbeam_channel::unbounded::<(usize, SectionReport)>();

    thread::scope(|scope| {
        for (idx, section) in doc.sections().enumerate() {
            let tx = report_tx.clone();
            let worker_dispatch = dispatch.clone();
            let spawned = thread::Builder::new()
                .name(format!("filecheck-{section}"))
                .spawn_scoped(scope, move || {
                    let report = tracing::dispatcher::with_default(&worker_dispatch, || {
                        run_section(doc, section, clock, lister)
                    });
                    let _ = tx.send((idx, report));
                });

            if let Err(err) = spawned {
                error!("Cannot spawn a thread for '{section}', running it inline: {err}");
                let _ = report_tx.send((idx, run_section(doc, section, clock, lister)));
            }
        }
    });
    drop(report_tx);

    let mut reports: Vec<(usize, SectionReport)> = report_rx.iter().collect();
    reports.sort_by_key(|(idx, _)| *idx);
    reports.into_iter().map(|(_, report)| report).collect()
}

fn run_section<C, L>(doc: &ConfigDocument, section: &str, clock: &C, lister: &L) -> SectionReport
where
    C: Clock + ?Sized,
    L: DirLister + ?Sized,
{
    let span = info_span!("section", name = section);
    let _entered = span.enter();

    info!("START - checking directory '{section}'");
    let outcome = match load_section(doc, section) {
        Ok(spec) => SectionOutcome::Scanned(scan(&spec, clock, lister)),
        Err(err) => {
            error!("Failed to read the parameters of '{section}': {err}");
            SectionOutcome::Failed(err)
        }
    };
    info!("END - check of directory '{section}' finished");

    SectionReport {
        section: section.to_string(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScanOutcome;
    use crate::scanner::fakes::{at, FakeClock, ScriptedLister};

    const DOC: &str = "\
[DEFAULT]
check_interval = 5
max_checks = 2

[MORNING]
path = /srv/in
pattern = ABC
start_time = 09:00
end_time = 09:10

[BROKEN]
path = /srv/in
pattern = ABC
start_time = 09:00
end_time = 09:10
max_checks = many

[EVENING]
path = /srv/in
pattern = ABC
start_time = 18:00
end_time = 18:30
";

    fn section_names(summary: &RunSummary) -> Vec<&str> {
        summary.sections.iter().map(|r| r.section.as_str()).collect()
    }

    /// A broken section is reported and skipped; the others still run.
    #[test]
    fn broken_section_does_not_stop_the_run() {
        let doc = ConfigDocument::parse(DOC).unwrap();
        let clock = FakeClock::starting_at(at(9, 5, 0));
        let lister = ScriptedLister::fixed(vec![("ABC_1.txt", at(9, 6, 0))]);

        let summary = run_sections(&doc, RunMode::Sequential, &clock, &lister);

        assert_eq!(section_names(&summary), ["MORNING", "BROKEN", "EVENING"]);
        assert_eq!(summary.failed_count(), 1);
        assert!(matches!(
            summary.sections[1].outcome,
            SectionOutcome::Failed(ConfigError::InvalidNumber { .. })
        ));

        let scanned: Vec<_> = summary.scanned().collect();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].files().collect::<Vec<_>>(), ["ABC_1.txt"]);
        // EVENING is outside its window at 09:05.
        assert_eq!(scanned[1].outcome, ScanOutcome::OutsideWindow);
        assert_eq!(summary.total_files(), 1);
    }

    /// Sequential mode: the second section starts on the clock the first one
    /// left behind.
    #[test]
    fn sequential_sections_share_the_timeline() {
        let doc = ConfigDocument::parse(
            "[A]\npath=/a\npattern=x\nstart_time=09:00\nend_time=09:10\ncheck_interval=300\nmax_checks=2\n\
             [B]\npath=/b\npattern=x\nstart_time=09:00\nend_time=09:10\ncheck_interval=1\nmax_checks=1\n",
        )
        .unwrap();
        // A checks at 09:08, sleeps 5 min, and finds its window closed at
        // 09:13; B then starts past its own window.
        let clock = FakeClock::starting_at(at(9, 8, 0));
        let lister = ScriptedLister::fixed(vec![]);

        let summary = run_sections(&doc, RunMode::Sequential, &clock, &lister);

        let outcomes: Vec<_> = summary.scanned().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            [ScanOutcome::WindowClosed, ScanOutcome::OutsideWindow]
        );
    }

    /// Concurrent mode reports sections in on-disk order.
    #[test]
    fn concurrent_reports_keep_section_order() {
        let doc = ConfigDocument::parse(DOC).unwrap();
        let clock = FakeClock::starting_at(at(9, 5, 0));
        let lister = ScriptedLister::fixed(vec![("ABC_1.txt", at(9, 6, 0))]);

        let summary = run_sections(&doc, RunMode::Concurrent, &clock, &lister);

        assert_eq!(section_names(&summary), ["MORNING", "BROKEN", "EVENING"]);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.total_files(), 1);
    }

    #[test]
    fn empty_document_runs_nothing() {
        let doc = ConfigDocument::parse("# nothing configured\n").unwrap();
        let clock = FakeClock::starting_at(at(9, 5, 0));
        let lister = ScriptedLister::fixed(vec![]);

        let summary = run_sections(&doc, RunMode::Sequential, &clock, &lister);

        assert!(summary.sections.is_empty());
        assert_eq!(lister.calls(), 0);
    }

    #[test]
    fn json_summary_lists_errors_and_files() {
        let doc = ConfigDocument::parse(DOC).unwrap();
        let clock = FakeClock::starting_at(at(9, 5, 0));
        let lister = ScriptedLister::fixed(vec![("ABC_1.txt", at(9, 6, 0))]);

        let json = run_sections(&doc, RunMode::Sequential, &clock, &lister).to_json();

        assert_eq!(json["failed"], 1);
        assert_eq!(json["total_files"], 1);
        assert_eq!(json["sections"][0]["files"][0], "ABC_1.txt");
        assert_eq!(json["sections"][1]["section"], "BROKEN");
        assert!(json["sections"][1]["error"]
            .as_str()
            .unwrap()
            .contains("max_checks"));
    }
}
