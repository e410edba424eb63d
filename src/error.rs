//! Error taxonomy for the analysis pipeline.
//!
//! Only [`LoadError`] aborts a cycle. Record-level problems ([`RecordError`])
//! and schema gaps ([`ColumnMismatch`]) are collected into the load report
//! and logged, never propagated.

use serde::Serialize;
use thiserror::Error;

use crate::pager::{PagerSignal, PagerState};
use crate::schema::Column;
use crate::sources::Region;

/// Reasons a single source could not be read.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Fatal for the current analysis cycle.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source for {region} is unavailable at {location}: {source}")]
    SourceUnavailable {
        region: Region,
        location: String,
        #[source]
        source: SourceError,
    },
}

/// A record excluded from the dataset. The load continues without it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error("{region} row {row}: unparseable start timestamp {value:?}")]
    UnparseableTimestamp {
        region: Region,
        row: usize,
        value: String,
    },

    #[error("{region} row {row}: malformed record: {reason}")]
    Malformed {
        region: Region,
        row: usize,
        reason: String,
    },
}

/// A source lacks one or more canonical columns.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{region} source lacks columns: {}", column_list(.missing))]
pub struct ColumnMismatch {
    pub region: Region,
    pub missing: Vec<Column>,
}

fn column_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.header())
        .collect::<Vec<_>>()
        .join(", ")
}

/// User selection input outside its domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown region {0:?}")]
    UnknownRegion(String),

    #[error("unknown month {0:?} (expected january through june, or \"all\")")]
    UnknownMonth(String),

    #[error("unknown weekday {0:?} (expected sunday through saturday, or \"all\")")]
    UnknownWeekday(String),

    #[error("at least one region must be selected")]
    NoRegions,

    #[error("at least one {0} must be selected")]
    Empty(&'static str),
}

/// A pager signal that is not valid in the pager's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {signal:?} a pager that is {state:?}")]
pub struct PagerError {
    pub state: PagerState,
    pub signal: PagerSignal,
}
