//! Month and weekday narrowing of a derived trip sequence.

use chrono::{Month, Weekday};
use std::collections::BTreeSet;
use tracing::debug;

use crate::record::Trip;
use crate::schema::Column;
use crate::selection::{MONTHS, Selection, WEEKDAYS};

/// The trips left after one analysis cycle's filtering.
///
/// Statistics only ever borrow it.
#[derive(Debug, Clone, Default)]
pub struct FilteredDataset {
    trips: Vec<Trip>,
    columns: BTreeSet<Column>,
}

impl FilteredDataset {
    pub fn new(trips: Vec<Trip>, columns: BTreeSet<Column>) -> Self {
        Self { trips, columns }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Whether any loaded source supplied `column`.
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }
}

/// Keeps trips whose month is any of `months`, then those whose weekday is
/// any of `weekdays`. Input order is preserved.
#[tracing::instrument(skip_all, fields(rows = trips.len()))]
pub fn filter(
    trips: Vec<Trip>,
    months: &Selection<Month>,
    weekdays: &Selection<Weekday>,
) -> Vec<Trip> {
    let months = months.expand(&MONTHS);
    let by_month: Vec<Trip> = trips
        .into_iter()
        .filter(|t| months.contains(&t.month()))
        .collect();
    debug!(remaining = by_month.len(), "Applied month filter");

    let weekdays = weekdays.expand(&WEEKDAYS);
    let by_weekday: Vec<Trip> = by_month
        .into_iter()
        .filter(|t| weekdays.contains(&t.weekday()))
        .collect();
    debug!(remaining = by_weekday.len(), "Applied weekday filter");

    by_weekday
}
