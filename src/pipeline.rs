//! One analysis cycle: load, derive, filter.

use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::error::{ColumnMismatch, LoadError, RecordError};
use crate::fields::derive_fields;
use crate::filter::{FilteredDataset, filter};
use crate::loader::{SourceSummary, load};
use crate::selection::SelectionSet;
use crate::sources::SourceRegistry;

/// Everything non-fatal that happened while building the dataset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub sources: Vec<SourceSummary>,
    pub rejected: Vec<RecordError>,
    /// Trips with a valid start time, before filtering.
    pub derived: usize,
    pub filtered: usize,
}

impl LoadReport {
    pub fn mismatches(&self) -> Vec<ColumnMismatch> {
        self.sources.iter().filter_map(SourceSummary::mismatch).collect()
    }
}

#[derive(Debug)]
pub struct Analysis {
    pub dataset: FilteredDataset,
    pub report: LoadReport,
}

/// Builds the filtered dataset for `selection`.
///
/// Only an unreadable source fails the cycle; dropped records and column
/// gaps end up in the returned [`LoadReport`].
#[tracing::instrument(skip_all, fields(regions = ?selection.regions))]
pub fn run(registry: &SourceRegistry, selection: &SelectionSet) -> Result<Analysis, LoadError> {
    let started = Instant::now();

    let loaded = load(registry, &selection.regions)?;
    let columns = loaded.columns();
    info!(
        rows = loaded.trips.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Loaded sources"
    );

    let derived = derive_fields(loaded.trips);
    let derived_count = derived.trips.len();

    let trips = filter(derived.trips, &selection.months, &selection.weekdays);
    let dataset = FilteredDataset::new(trips, columns);

    let rejected: Vec<RecordError> = loaded
        .rejected
        .into_iter()
        .chain(derived.rejected)
        .collect();

    info!(
        derived = derived_count,
        filtered = dataset.len(),
        rejected = rejected.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dataset ready"
    );

    Ok(Analysis {
        report: LoadReport {
            sources: loaded.sources,
            rejected,
            derived: derived_count,
            filtered: dataset.len(),
        },
        dataset,
    })
}
