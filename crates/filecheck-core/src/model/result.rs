/// Files discovered by one section scan.
///
/// Names are kept in first-seen order and never repeated: the identity of a
/// discovery is the file name alone, so a file touched again later in the
/// same window does not produce a second entry.
use indexmap::IndexSet;
use serde::Serialize;

/// Why a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The scan started outside the window; no attempt was made.
    OutsideWindow,
    /// Every allowed attempt ran.
    AttemptsExhausted,
    /// The window closed before the attempts ran out.
    WindowClosed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub section: String,
    files: IndexSet<String>,
    pub attempts: u32,
    pub outcome: ScanOutcome,
}

impl ScanResult {
    /// An empty result for `section`. The outcome is finalised by the scanner.
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            files: IndexSet::new(),
            attempts: 0,
            outcome: ScanOutcome::OutsideWindow,
        }
    }

    /// Record `name`. Returns `false` if it was already present.
    pub fn record(&mut self, name: &str) -> bool {
        if self.files.contains(name) {
            return false;
        }
        self.files.insert(name.to_owned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains(name)
    }

    /// Discovered names in first-seen order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Comma-separated names, as written to the summary log line.
    pub fn joined(&self) -> String {
        self.files().collect::<Vec<_>>().join(", ")
    }
}
