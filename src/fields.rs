//! Turns raw textual rows into typed [`Trip`]s with derived calendar fields.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::RecordError;
use crate::loader::RawTrip;
use crate::record::{Trip, TripRecord};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Derived trips plus every row that had to be dropped.
#[derive(Debug, Clone, Default)]
pub struct DerivedBatch {
    pub trips: Vec<Trip>,
    pub rejected: Vec<RecordError>,
}

/// Parses each row's start timestamp and attaches month, weekday and hour.
///
/// Rows whose start timestamp is missing or malformed are excluded and
/// reported as [`RecordError::UnparseableTimestamp`].
#[tracing::instrument(skip_all, fields(rows = raw.len()))]
pub fn derive_fields(raw: Vec<RawTrip>) -> DerivedBatch {
    let mut batch = DerivedBatch {
        trips: Vec::with_capacity(raw.len()),
        rejected: Vec::new(),
    };

    for row in raw {
        match to_record(row) {
            Ok(record) => batch.trips.push(Trip::new(record)),
            Err(e) => {
                warn!(error = %e, "Dropping record");
                batch.rejected.push(e);
            }
        }
    }

    debug!(
        kept = batch.trips.len(),
        dropped = batch.rejected.len(),
        "Derived fields"
    );
    batch
}

fn to_record(raw: RawTrip) -> Result<TripRecord, RecordError> {
    let RawTrip { region, row, fields } = raw;

    let start_time = fields
        .start_time
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or_else(|| RecordError::UnparseableTimestamp {
            region,
            row,
            value: fields.start_time.clone().unwrap_or_default(),
        })?;

    Ok(TripRecord {
        region,
        id: non_blank(fields.id),
        start_time,
        end_time: fields.end_time.as_deref().and_then(parse_timestamp),
        duration: fields.trip_duration.as_deref().and_then(parse_duration),
        start_station: non_blank(fields.start_station),
        end_station: non_blank(fields.end_station),
        user_type: non_blank(fields.user_type),
        gender: non_blank(fields.gender),
        birth_year: fields.birth_year.as_deref().and_then(parse_year),
    })
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn parse_duration(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

// Years are often exported as floats ("1992.0").
fn parse_year(value: &str) -> Option<i32> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|y| y.is_finite())
        .map(|y| y.round() as i32)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RawFields;
    use crate::sources::Region;
    use chrono::{Month, Weekday};

    fn raw(row: usize, start: Option<&str>) -> RawTrip {
        RawTrip {
            region: Region::NewYorkCity,
            row,
            fields: RawFields {
                start_time: start.map(str::to_string),
                trip_duration: Some("321".to_string()),
                birth_year: Some("1992.0".to_string()),
                gender: Some("  ".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2017-06-23 15:09:32").is_some());
        assert!(parse_timestamp("2017-06-23 15:09:32.123").is_some());
        assert!(parse_timestamp("2017-06-23T15:09:32").is_some());
        assert!(parse_timestamp("23/06/2017").is_none());
    }

    #[test]
    fn test_parse_duration_rejects_negative() {
        assert_eq!(parse_duration("489.066"), Some(489.066));
        assert_eq!(parse_duration("-5"), None);
        assert_eq!(parse_duration("abc"), None);
    }

    #[test]
    fn test_derive_fields_attaches_calendar_fields() {
        let batch = derive_fields(vec![raw(1, Some("2017-03-05 08:15:00"))]);

        assert!(batch.rejected.is_empty());
        let trip = &batch.trips[0];
        assert_eq!(trip.month(), Month::March);
        assert_eq!(trip.weekday(), Weekday::Sun);
        assert_eq!(trip.hour(), 8);
        assert_eq!(trip.record().duration, Some(321.0));
        assert_eq!(trip.record().birth_year, Some(1992));
        assert_eq!(trip.record().gender, None);
    }

    #[test]
    fn test_derive_fields_drops_unparseable() {
        let batch = derive_fields(vec![
            raw(1, Some("not a date")),
            raw(2, Some("2017-01-02 00:00:00")),
            raw(3, None),
        ]);

        assert_eq!(batch.trips.len(), 1);
        assert_eq!(
            batch.rejected,
            vec![
                RecordError::UnparseableTimestamp {
                    region: Region::NewYorkCity,
                    row: 1,
                    value: "not a date".to_string(),
                },
                RecordError::UnparseableTimestamp {
                    region: Region::NewYorkCity,
                    row: 3,
                    value: String::new(),
                },
            ]
        );
    }
}
