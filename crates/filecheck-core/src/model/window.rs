/// The daily time window a section's files must fall into.
///
/// Built once per scan by anchoring the `ScanSpec`'s time-of-day bounds to the
/// calendar date observed at scan entry.
use crate::model::ScanSpec;
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// Anchor `spec`'s start/end time-of-day to `date`.
    pub fn for_date(spec: &ScanSpec, date: NaiveDate) -> Self {
        Self {
            start: date.and_time(spec.start()),
            end: date.and_time(spec.end()),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// `true` once `instant` lies strictly after the end of the window.
    pub fn has_closed(&self, instant: NaiveDateTime) -> bool {
        instant > self.end
    }
}
