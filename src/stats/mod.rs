//! Descriptive statistics over a filtered trip dataset.
//!
//! Each computation is independent and read-only. An empty dataset yields
//! [`Stat::NoData`] rather than an error, and a missing field yields
//! [`Stat::NotAvailable`] without affecting the other statistics.

pub mod station;
pub mod temporal;
pub mod travel_time;
pub mod types;
pub mod user;
pub mod utility;

pub use station::{PAIR_SEPARATOR, pair_label, station_stats};
pub use temporal::temporal_stats;
pub use travel_time::duration_stats;
pub use types::{
    BirthYearStats, Bucket, DurationStats, Ranked, Stat, StationStats, StatsReport, TemporalStats,
    UserStats,
};
pub use user::user_stats;

use crate::filter::FilteredDataset;

/// Runs all four statistics.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn compute_all(dataset: &FilteredDataset) -> StatsReport {
    StatsReport {
        trips: dataset.len(),
        temporal: temporal_stats(dataset),
        stations: station_stats(dataset),
        durations: duration_stats(dataset),
        users: user_stats(dataset),
    }
}
