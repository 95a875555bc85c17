use chrono::{NaiveDate, Utc};

/// Source of the current calendar date.
///
/// All day arithmetic in the crate runs on calendar dates in UTC, so a clock
/// only ever has to answer "which day is it".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a single date. Used by tests and by `SYNC_FIT_TODAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
