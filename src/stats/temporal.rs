use tracing::debug;

use super::types::{Stat, TemporalStats};
use super::utility::mode_by_key;
use crate::filter::FilteredDataset;

/// Most frequent month, weekday and start hour.
///
/// Ties resolve in calendar order: lowest month, Sunday-first weekday,
/// lowest hour.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn temporal_stats(dataset: &FilteredDataset) -> TemporalStats {
    let trips = dataset.trips();
    if trips.is_empty() {
        return TemporalStats {
            month: Stat::NoData,
            weekday: Stat::NoData,
            hour: Stat::NoData,
        };
    }

    let month = mode_by_key(trips.iter().map(|t| t.month()), |m| m.number_from_month());
    let weekday = mode_by_key(trips.iter().map(|t| t.weekday()), |d| d.num_days_from_sunday());
    let hour = mode_by_key(trips.iter().map(|t| t.hour()), |h| *h);

    debug!(?month, ?weekday, ?hour, "Temporal stats");

    TemporalStats {
        month: month.map_or(Stat::NoData, Stat::Value),
        weekday: weekday.map_or(Stat::NoData, Stat::Value),
        hour: hour.map_or(Stat::NoData, Stat::Value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Trip;
    use crate::record::tests::{at, record_at};
    use crate::stats::types::Ranked;
    use chrono::{Month, Weekday};
    use std::collections::BTreeSet;

    fn dataset(times: &[(u32, u32, u32)]) -> FilteredDataset {
        let trips = times
            .iter()
            .map(|&(m, d, h)| Trip::new(record_at(at(2017, m, d, h))))
            .collect();
        FilteredDataset::new(trips, BTreeSet::new())
    }

    #[test]
    fn test_empty_dataset_reports_no_data() {
        let stats = temporal_stats(&FilteredDataset::default());
        assert_eq!(stats.month, Stat::NoData);
        assert_eq!(stats.weekday, Stat::NoData);
        assert_eq!(stats.hour, Stat::NoData);
    }

    #[test]
    fn test_most_frequent_hour() {
        let hours = [5, 5, 5, 9, 9, 14, 5];
        let times: Vec<_> = hours.iter().map(|&h| (3, 1, h)).collect();
        let stats = temporal_stats(&dataset(&times));

        assert_eq!(stats.hour, Stat::Value(Ranked { value: 5, count: 4 }));
    }

    #[test]
    fn test_ties_resolve_in_calendar_order() {
        // June first in data order, but March wins the tie.
        // 2017-06-03 Sat, 2017-03-04 Sat, 2017-06-05 Mon, 2017-03-06 Mon
        let stats = temporal_stats(&dataset(&[(6, 3, 14), (3, 4, 9), (6, 5, 14), (3, 6, 9)]));

        assert_eq!(stats.month, Stat::Value(Ranked { value: Month::March, count: 2 }));
        assert_eq!(stats.weekday, Stat::Value(Ranked { value: Weekday::Mon, count: 2 }));
        assert_eq!(stats.hour, Stat::Value(Ranked { value: 9, count: 2 }));
    }

    #[test]
    fn test_sunday_wins_weekday_tie() {
        // 2017-01-07 Sat, 2017-01-08 Sun
        let stats = temporal_stats(&dataset(&[(1, 7, 0), (1, 8, 0)]));
        assert_eq!(stats.weekday, Stat::Value(Ranked { value: Weekday::Sun, count: 1 }));
    }
}
