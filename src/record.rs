//! Typed trip records and their timestamp-derived fields.

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::sources::Region;

/// One trip, with every optional cell already parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub region: Region,
    pub id: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Seconds. `None` when absent, unparseable, or negative.
    pub duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

/// Calendar fields computed from a record's start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    pub month: Month,
    pub weekday: Weekday,
    pub hour: u32,
}

impl DerivedFields {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        // month() is always 1..=12
        let month = Month::try_from(ts.month() as u8).unwrap_or(Month::January);
        Self {
            month,
            weekday: ts.weekday(),
            hour: ts.hour(),
        }
    }
}

/// A record paired with its derived fields.
///
/// The start timestamp is only writable through [`Trip::set_start_time`],
/// which keeps the derived fields in step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    #[serde(flatten)]
    record: TripRecord,
    #[serde(flatten)]
    derived: DerivedFields,
}

impl Trip {
    pub fn new(record: TripRecord) -> Self {
        let derived = DerivedFields::from_timestamp(&record.start_time);
        Self { record, derived }
    }

    pub fn record(&self) -> &TripRecord {
        &self.record
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.record.start_time
    }

    pub fn month(&self) -> Month {
        self.derived.month
    }

    pub fn weekday(&self) -> Weekday {
        self.derived.weekday
    }

    pub fn hour(&self) -> u32 {
        self.derived.hour
    }

    pub fn set_start_time(&mut self, start_time: NaiveDateTime) {
        self.record.start_time = start_time;
        self.derived = DerivedFields::from_timestamp(&start_time);
    }
}
