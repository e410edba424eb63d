use tracing::debug;

use super::types::{Ranked, Stat, StationStats};
use super::utility::mode_first_seen;
use crate::filter::FilteredDataset;

/// Joins a start and end station into a trip label.
pub const PAIR_SEPARATOR: &str = " --> ";

pub fn pair_label(start: &str, end: &str) -> String {
    format!("{start}{PAIR_SEPARATOR}{end}")
}

/// Most popular start station, end station and start-to-end combination.
///
/// Records missing a station are skipped. Ties go to the first station seen.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn station_stats(dataset: &FilteredDataset) -> StationStats {
    if dataset.is_empty() {
        return StationStats {
            start: Stat::NoData,
            end: Stat::NoData,
            trip: Stat::NoData,
        };
    }

    let trips = dataset.trips();

    let start = mode_first_seen(
        trips
            .iter()
            .filter_map(|t| t.record().start_station.as_deref()),
    );
    let end = mode_first_seen(trips.iter().filter_map(|t| t.record().end_station.as_deref()));

    // Pair labels live only for the duration of this computation.
    let pairs: Vec<String> = trips
        .iter()
        .filter_map(|t| {
            let r = t.record();
            Some(pair_label(r.start_station.as_deref()?, r.end_station.as_deref()?))
        })
        .collect();
    let trip = mode_first_seen(pairs.iter().map(String::as_str));

    debug!(?start, ?end, ?trip, "Station stats");

    StationStats {
        start: ranked_or_unavailable(start),
        end: ranked_or_unavailable(end),
        trip: ranked_or_unavailable(trip),
    }
}

// Nothing to rank on a non-empty dataset means the column is absent or blank.
fn ranked_or_unavailable(ranked: Option<Ranked<&str>>) -> Stat<Ranked<String>> {
    match ranked {
        Some(r) => Stat::Value(r.map(|s| s.to_string())),
        None => Stat::NotAvailable,
    }
}
