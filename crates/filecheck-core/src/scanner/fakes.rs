/// In-memory clock and lister used by the scanner and runner unit tests.
use super::{Clock, DirLister, ListedEntry};
use crate::error::ListingError;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// A clock that only moves when slept on.
pub struct FakeClock {
    now: Mutex<NaiveDateTime>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(duration).unwrap();
    }
}

/// What one `list` call returns.
pub enum Listing {
    Entries(Vec<(&'static str, NaiveDateTime)>),
    Denied,
}

/// Replays one scripted listing per attempt; the last script repeats.
pub struct ScriptedLister {
    script: Vec<Listing>,
    calls: Mutex<usize>,
    mtimes: Mutex<HashMap<PathBuf, NaiveDateTime>>,
}

impl ScriptedLister {
    pub fn new(script: Vec<Listing>) -> Self {
        Self {
            script,
            calls: Mutex::new(0),
            mtimes: Mutex::new(HashMap::new()),
        }
    }

    /// The same entries on every attempt.
    pub fn fixed(entries: Vec<(&'static str, NaiveDateTime)>) -> Self {
        Self::new(vec![Listing::Entries(entries)])
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl DirLister for ScriptedLister {
    fn list(&self, dir: &Path) -> Result<Vec<ListedEntry>, ListingError> {
        let mut calls = self.calls.lock().unwrap();
        let step = (*calls).min(self.script.len() - 1);
        *calls += 1;

        match &self.script[step] {
            Listing::Denied => Err(ListingError {
                path: dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
            }),
            Listing::Entries(entries) => {
                let mut mtimes = self.mtimes.lock().unwrap();
                mtimes.clear();
                let listed: Vec<_> = entries
                    .iter()
                    .map(|(name, _)| ListedEntry::new(*name, dir.join(name)))
                    .collect();
                for (entry, (_, mtime)) in listed.iter().zip(entries) {
                    mtimes.insert(entry.path.clone(), *mtime);
                }
                Ok(listed)
            }
        }
    }

    fn modified(&self, path: &Path) -> io::Result<NaiveDateTime> {
        self.mtimes
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "vanished"))
    }
}
