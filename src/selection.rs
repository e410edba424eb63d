//! Selection domains and the user's chosen regions, months and weekdays.

use chrono::{Month, Weekday};
use serde::Serialize;

use crate::error::SelectionError;
use crate::sources::Region;

/// Months the datasets cover, in calendar order.
pub const MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

/// Weekdays in calendar order, Sunday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Either the whole domain or an explicit subset of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    All,
    Only(Vec<T>),
}

impl<T: Copy + PartialEq> Selection<T> {
    /// Replaces `All` with the full domain.
    pub fn expand(&self, domain: &[T]) -> Vec<T> {
        match self {
            Selection::All => domain.to_vec(),
            Selection::Only(values) => values.clone(),
        }
    }
}

/// Regions, months and weekdays chosen for one analysis cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    pub regions: Vec<Region>,
    pub months: Selection<Month>,
    pub weekdays: Selection<Weekday>,
}

impl SelectionSet {
    pub fn new(
        regions: Vec<Region>,
        months: Selection<Month>,
        weekdays: Selection<Weekday>,
    ) -> Result<Self, SelectionError> {
        let regions = dedup(regions);
        if regions.is_empty() {
            return Err(SelectionError::NoRegions);
        }

        let months = match months {
            Selection::All => Selection::All,
            Selection::Only(values) => {
                if let Some(bad) = values.iter().find(|m| !MONTHS.contains(*m)) {
                    return Err(SelectionError::UnknownMonth(bad.name().to_lowercase()));
                }
                Selection::Only(non_empty(dedup(values), "month")?)
            }
        };

        let weekdays = match weekdays {
            Selection::All => Selection::All,
            Selection::Only(values) => Selection::Only(non_empty(dedup(values), "weekday")?),
        };

        Ok(Self {
            regions,
            months,
            weekdays,
        })
    }

    /// Parses the comma-separated text forms accepted at the prompt.
    pub fn parse(regions: &str, months: &str, weekdays: &str) -> Result<Self, SelectionError> {
        Self::new(
            parse_regions(regions)?,
            parse_months(months)?,
            parse_weekdays(weekdays)?,
        )
    }
}

pub fn parse_regions(input: &str) -> Result<Vec<Region>, SelectionError> {
    tokens(input).map(|t| t.parse()).collect()
}

pub fn parse_months(input: &str) -> Result<Selection<Month>, SelectionError> {
    parse_selection(input, |t| {
        MONTHS
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(t) || m.name()[..3].eq_ignore_ascii_case(t))
            .ok_or_else(|| SelectionError::UnknownMonth(t.to_string()))
    })
}

pub fn parse_weekdays(input: &str) -> Result<Selection<Weekday>, SelectionError> {
    parse_selection(input, |t| {
        WEEKDAYS
            .into_iter()
            .find(|d| {
                let name = weekday_name(*d);
                name.eq_ignore_ascii_case(t) || name[..3].eq_ignore_ascii_case(t)
            })
            .ok_or_else(|| SelectionError::UnknownWeekday(t.to_string()))
    })
}

/// "all" anywhere in the list selects the whole domain.
fn parse_selection<T>(
    input: &str,
    parse: impl Fn(&str) -> Result<T, SelectionError>,
) -> Result<Selection<T>, SelectionError> {
    let tokens: Vec<&str> = tokens(input).collect();
    if tokens.iter().any(|t| t.eq_ignore_ascii_case("all")) {
        return Ok(Selection::All);
    }
    tokens
        .into_iter()
        .map(parse)
        .collect::<Result<Vec<_>, _>>()
        .map(Selection::Only)
}

fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn dedup<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

fn non_empty<T>(values: Vec<T>, what: &'static str) -> Result<Vec<T>, SelectionError> {
    if values.is_empty() {
        Err(SelectionError::Empty(what))
    } else {
        Ok(values)
    }
}
