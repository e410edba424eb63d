//! Result types produced by the statistics.

use chrono::{Month, Weekday};
use serde::Serialize;

use crate::duration::DurationBreakdown;

/// Outcome of a single statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Stat<T> {
    Value(T),
    /// The filtered dataset is empty.
    NoData,
    /// An average or mode was requested over zero contributing records.
    Undefined,
    /// No record carries the field this statistic depends on.
    NotAvailable,
}

impl<T> Stat<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Stat::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Stat<U> {
        match self {
            Stat::Value(v) => Stat::Value(f(v)),
            Stat::NoData => Stat::NoData,
            Stat::Undefined => Stat::Undefined,
            Stat::NotAvailable => Stat::NotAvailable,
        }
    }
}

/// A most-frequent value together with how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Ranked<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Ranked<U> {
        Ranked {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// One entry of a categorical distribution. `None` is the unknown bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub value: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
    pub month: Stat<Ranked<Month>>,
    pub weekday: Stat<Ranked<Weekday>>,
    pub hour: Stat<Ranked<u32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub start: Stat<Ranked<String>>,
    pub end: Stat<Ranked<String>>,
    /// Labelled `start --> end`.
    pub trip: Stat<Ranked<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    /// Records that carried a valid duration.
    pub counted: usize,
    pub total: Stat<DurationBreakdown>,
    pub mean: Stat<DurationBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Stat<Vec<Bucket>>,
    pub genders: Stat<Vec<Bucket>>,
    pub birth_years: Stat<BirthYearStats>,
}

/// All four statistics for one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub trips: usize,
    pub temporal: TemporalStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}
