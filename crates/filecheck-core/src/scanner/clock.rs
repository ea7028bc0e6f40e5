/// Time source and sleep used by the polling loop.
///
/// The loop never touches the system clock directly, so tests can drive it
/// with a clock whose `sleep` just moves time forward.
use chrono::{Local, NaiveDateTime};
use std::time::Duration;

pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The real local clock with a blocking `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
