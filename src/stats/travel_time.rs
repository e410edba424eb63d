use tracing::debug;

use super::types::{DurationStats, Stat};
use super::utility::mean;
use crate::duration::DurationBreakdown;
use crate::filter::FilteredDataset;

/// Total and mean trip duration over records with a valid duration.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn duration_stats(dataset: &FilteredDataset) -> DurationStats {
    let durations: Vec<f64> = dataset
        .trips()
        .iter()
        .filter_map(|t| t.record().duration)
        .collect();

    let total = if dataset.is_empty() {
        Stat::NoData
    } else if durations.is_empty() {
        Stat::NotAvailable
    } else {
        Stat::Value(DurationBreakdown::from_seconds(durations.iter().sum()))
    };

    let mean = match mean(&durations) {
        Some(m) => Stat::Value(DurationBreakdown::from_seconds(m)),
        None => Stat::Undefined,
    };

    debug!(counted = durations.len(), "Duration stats");

    DurationStats {
        counted: durations.len(),
        total,
        mean,
    }
}
