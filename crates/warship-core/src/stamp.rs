use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime};

/// Format of the run stamp: `YYYY-MM-DD_HH-MM-SS`, zero-padded.
pub const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Local clock reading taken once per invocation.
///
/// Used both as the fallback image tag and as the name of the staging
/// directory, so the two agree within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(NaiveDateTime);

impl RunStamp {
    pub fn now() -> Self {
        Self::from(Local::now())
    }

    pub fn at(time: NaiveDateTime) -> Self {
        Self(time)
    }
}

impl From<DateTime<Local>> for RunStamp {
    fn from(time: DateTime<Local>) -> Self {
        Self(time.naive_local())
    }
}

impl fmt::Display for RunStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(STAMP_FORMAT))
    }
}
