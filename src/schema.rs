//! Canonical column layout and per-source reconciliation.

use serde::Serialize;
use std::collections::BTreeSet;

/// Columns of the trip schema, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Column {
    Id,
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
    UserType,
    Gender,
    BirthYear,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Id,
        Column::StartTime,
        Column::EndTime,
        Column::TripDuration,
        Column::StartStation,
        Column::EndStation,
        Column::UserType,
        Column::Gender,
        Column::BirthYear,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "Id",
            Column::StartTime => "Start Time",
            Column::EndTime => "End Time",
            Column::TripDuration => "Trip Duration",
            Column::StartStation => "Start Station",
            Column::EndStation => "End Station",
            Column::UserType => "User Type",
            Column::Gender => "Gender",
            Column::BirthYear => "Birth Year",
        }
    }

    /// Maps a raw CSV header onto a canonical column.
    ///
    /// Exported index columns are commonly unnamed, so an empty header or
    /// `Unnamed: 0` counts as the identifier.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        if header.is_empty() || header.eq_ignore_ascii_case("unnamed: 0") {
            return Some(Column::Id);
        }
        Column::ALL
            .into_iter()
            .find(|c| c.header().eq_ignore_ascii_case(header))
    }
}

/// Result of matching one source's headers against the canonical schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    pub present: BTreeSet<Column>,
    pub missing: Vec<Column>,
    pub unrecognized: Vec<String>,
}

impl SchemaReport {
    /// Only the first header mapping onto a column claims it. Later
    /// duplicates are treated as unrecognized.
    pub fn reconcile<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut present = BTreeSet::new();
        let mut unrecognized = Vec::new();

        for header in headers {
            match Column::from_header(header) {
                Some(column) if present.insert(column) => {}
                _ => unrecognized.push(header.to_string()),
            }
        }

        let missing = Column::ALL
            .into_iter()
            .filter(|c| !present.contains(c))
            .collect();

        Self {
            present,
            missing,
            unrecognized,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Renames headers onto canonical column names for deserialization.
///
/// A column claimed earlier in the row keeps its first header; later headers
/// for the same column get a positional name so they never collide with it.
pub fn canonical_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut claimed = BTreeSet::new();

    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| match Column::from_header(header) {
            Some(column) if claimed.insert(column) => column.header().to_string(),
            Some(_) => format!("{header}#{idx}"),
            None => header.to_string(),
        })
        .collect()
}
