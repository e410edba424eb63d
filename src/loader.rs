//! Reads region sources and concatenates them into one raw record sequence.

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use tracing::{debug, info, warn};

use crate::error::{ColumnMismatch, LoadError, RecordError, SourceError};
use crate::schema::{Column, SchemaReport, canonical_headers};
use crate::sources::{Region, SourceRegistry};

/// One CSV row after header reconciliation, with every cell still textual.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawFields {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "Start Time")]
    pub start_time: Option<String>,
    #[serde(rename = "End Time")]
    pub end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    pub trip_duration: Option<String>,
    #[serde(rename = "Start Station")]
    pub start_station: Option<String>,
    #[serde(rename = "End Station")]
    pub end_station: Option<String>,
    #[serde(rename = "User Type")]
    pub user_type: Option<String>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year")]
    pub birth_year: Option<String>,
}

/// A raw row tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrip {
    pub region: Region,
    /// 1-based data row number within its source.
    pub row: usize,
    pub fields: RawFields,
}

/// Per-source outcome of a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub region: Region,
    pub location: String,
    pub rows: usize,
    pub schema: SchemaReport,
}

impl SourceSummary {
    pub fn mismatch(&self) -> Option<ColumnMismatch> {
        if self.schema.is_complete() {
            None
        } else {
            Some(ColumnMismatch {
                region: self.region,
                missing: self.schema.missing.clone(),
            })
        }
    }
}

/// All requested regions, concatenated in selection order.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub trips: Vec<RawTrip>,
    pub sources: Vec<SourceSummary>,
    pub rejected: Vec<RecordError>,
}

impl LoadedData {
    /// Columns supplied by at least one source.
    pub fn columns(&self) -> BTreeSet<Column> {
        self.sources
            .iter()
            .flat_map(|s| s.schema.present.iter().copied())
            .collect()
    }
}

/// Rows read from a single source.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub schema: SchemaReport,
    pub trips: Vec<RawTrip>,
    pub rejected: Vec<RecordError>,
}

/// Loads every region in order. Any unreadable source aborts the whole load.
#[tracing::instrument(skip(registry))]
pub fn load(registry: &SourceRegistry, regions: &[Region]) -> Result<LoadedData, LoadError> {
    let mut loaded = LoadedData::default();

    for &region in regions {
        let handle = registry.resolve(region);
        let location = handle.location.to_string();
        debug!(%region, %location, "Opening source");

        let batch = handle
            .open()
            .and_then(|reader| read_source(region, reader))
            .map_err(|source| LoadError::SourceUnavailable {
                region,
                location: location.clone(),
                source,
            })?;

        let summary = SourceSummary {
            region,
            location,
            rows: batch.trips.len(),
            schema: batch.schema,
        };

        if let Some(mismatch) = summary.mismatch() {
            warn!(%mismatch, "Column mismatch, continuing with available columns");
        }
        if !summary.schema.unrecognized.is_empty() {
            debug!(%region, unrecognized = ?summary.schema.unrecognized, "Ignoring unrecognized columns");
        }
        info!(%region, rows = summary.rows, rejected = batch.rejected.len(), "Source loaded");

        loaded.trips.extend(batch.trips);
        loaded.rejected.extend(batch.rejected);
        loaded.sources.push(summary);
    }

    Ok(loaded)
}

/// Reads one CSV source, renaming its headers onto the canonical schema.
///
/// Rows that fail to deserialize are rejected individually; I/O failures
/// while reading fail the whole source.
pub fn read_source<R: Read>(region: Region, reader: R) -> Result<SourceBatch, SourceError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let schema = SchemaReport::reconcile(headers.iter());

    rdr.set_headers(StringRecord::from(canonical_headers(headers.iter())));

    let mut trips = Vec::new();
    let mut rejected = Vec::new();

    for (idx, result) in rdr.deserialize::<RawFields>().enumerate() {
        let row = idx + 1;
        match result {
            Ok(fields) => trips.push(RawTrip {
                region,
                row,
                fields,
            }),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(%region, row, error = %e, "Skipping malformed record");
                rejected.push(RecordError::Malformed {
                    region,
                    row,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(SourceBatch {
        schema,
        trips,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_read_source_full_schema() {
        let batch = read_source(Region::Chicago, CHICAGO.as_bytes()).unwrap();

        assert!(batch.schema.is_complete());
        assert_eq!(batch.trips.len(), 2);
        assert!(batch.rejected.is_empty());

        let first = &batch.trips[0];
        assert_eq!(first.row, 1);
        assert_eq!(first.fields.id.as_deref(), Some("1423854"));
        assert_eq!(first.fields.start_time.as_deref(), Some("2017-06-23 15:09:32"));
        assert_eq!(first.fields.gender.as_deref(), Some("Male"));
        assert_eq!(first.fields.birth_year.as_deref(), Some("1992.0"));
    }

    #[test]
    fn test_read_source_empty_cells_are_none() {
        let batch = read_source(Region::Chicago, CHICAGO.as_bytes()).unwrap();
        let second = &batch.trips[1];

        assert_eq!(second.fields.gender, None);
        assert_eq!(second.fields.birth_year, None);
    }

    #[test]
    fn test_read_source_missing_columns_tolerated() {
        let batch = read_source(Region::Washington, WASHINGTON.as_bytes()).unwrap();

        assert_eq!(batch.schema.missing, vec![Column::Gender, Column::BirthYear]);
        assert_eq!(batch.trips.len(), 1);
        assert_eq!(batch.trips[0].fields.gender, None);
        assert_eq!(batch.trips[0].fields.trip_duration.as_deref(), Some("489.066"));
    }

    #[test]
    fn test_read_source_header_only() {
        let batch = read_source(Region::Chicago, "Start Time,End Time\n".as_bytes()).unwrap();
        assert!(batch.trips.is_empty());
    }

    #[test]
    fn test_read_source_duplicate_headers_keep_first() {
        let data = "\
Unnamed: 0,,Start Time,Trip Duration,Gender,Gender
1,a,2017-01-01 00:00:00,5,Female,Male
";
        let batch = read_source(Region::Chicago, data.as_bytes()).unwrap();

        assert!(batch.rejected.is_empty());
        assert_eq!(batch.trips.len(), 1);
        let fields = &batch.trips[0].fields;
        assert_eq!(fields.id.as_deref(), Some("1"));
        assert_eq!(fields.start_time.as_deref(), Some("2017-01-01 00:00:00"));
        assert_eq!(fields.gender.as_deref(), Some("Female"));
        assert_eq!(batch.schema.unrecognized, vec!["".to_string(), "Gender".to_string()]);
    }

    #[test]
    fn test_load_concatenates_in_selection_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chicago.csv"), CHICAGO).unwrap();
        std::fs::write(dir.path().join("washington.csv"), WASHINGTON).unwrap();

        let registry = SourceRegistry::new(dir.path());
        let loaded = load(&registry, &[Region::Washington, Region::Chicago]).unwrap();

        assert_eq!(loaded.trips.len(), 3);
        assert_eq!(loaded.trips[0].region, Region::Washington);
        assert_eq!(loaded.trips[1].region, Region::Chicago);
        assert_eq!(loaded.sources.len(), 2);
        assert!(loaded.sources[0].mismatch().is_some());
        assert!(loaded.sources[1].mismatch().is_none());
        assert!(loaded.columns().contains(&Column::Gender));
    }

    #[test]
    fn test_load_missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chicago.csv"), CHICAGO).unwrap();

        let registry = SourceRegistry::new(dir.path());
        let err = load(&registry, &[Region::Chicago, Region::NewYorkCity]).unwrap_err();

        let LoadError::SourceUnavailable { region, .. } = err;
        assert_eq!(region, Region::NewYorkCity);
    }
}
