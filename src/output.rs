//! Output formatting and persistence for analysis results.
//!
//! Supports a human-readable text report, pretty-printing, JSON
//! serialization, and CSV append of a one-row cycle summary.

use anyhow::Result;
use chrono::{DateTime, Month, Utc, Weekday};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::pager::Window;
use crate::pipeline::LoadReport;
use crate::selection::{Selection, SelectionSet, weekday_name};
use crate::stats::{Bucket, Stat, StatsReport};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Full structured result of one cycle, as emitted with `--json`.
#[derive(Debug, Serialize)]
pub struct AnalysisOutput<'a> {
    pub selection: &'a SelectionSet,
    pub load: &'a LoadReport,
    pub stats: &'a StatsReport,
}

/// Flat summary of a cycle, one CSV row per run.
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub timestamp: DateTime<Utc>,
    pub regions: String,
    pub months: String,
    pub weekdays: String,
    pub trips: usize,
    pub popular_month: Option<String>,
    pub popular_weekday: Option<String>,
    pub popular_hour: Option<u32>,
    pub popular_start_station: Option<String>,
    pub popular_end_station: Option<String>,
    pub popular_trip: Option<String>,
    pub total_duration_seconds: Option<f64>,
    pub mean_duration_seconds: Option<f64>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,
}

impl SummaryRow {
    pub fn new(selection: &SelectionSet, stats: &StatsReport) -> Self {
        let years = stats.users.birth_years.value();
        SummaryRow {
            timestamp: Utc::now(),
            regions: selection
                .regions
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(";"),
            months: selection_label(&selection.months, |m| m.name()),
            weekdays: selection_label(&selection.weekdays, |d| weekday_name(*d)),
            trips: stats.trips,
            popular_month: stats.temporal.month.value().map(|r| r.value.name().to_string()),
            popular_weekday: stats
                .temporal
                .weekday
                .value()
                .map(|r| weekday_name(r.value).to_string()),
            popular_hour: stats.temporal.hour.value().map(|r| r.value),
            popular_start_station: stats.stations.start.value().map(|r| r.value.clone()),
            popular_end_station: stats.stations.end.value().map(|r| r.value.clone()),
            popular_trip: stats.stations.trip.value().map(|r| r.value.clone()),
            total_duration_seconds: stats.durations.total.value().map(|d| d.total_seconds),
            mean_duration_seconds: stats.durations.mean.value().map(|d| d.total_seconds),
            earliest_birth_year: years.map(|y| y.earliest),
            most_recent_birth_year: years.map(|y| y.most_recent),
            most_common_birth_year: years.map(|y| y.most_common),
        }
    }
}

fn selection_label<T>(selection: &Selection<T>, name: impl Fn(&T) -> &'static str) -> String {
    match selection {
        Selection::All => "all".to_string(),
        Selection::Only(values) => values.iter().map(name).collect::<Vec<_>>().join(";"),
    }
}

/// Logs a stats report using Rust's debug pretty-print format.
pub fn print_pretty(stats: &StatsReport) {
    debug!("{:#?}", stats);
}

/// Serializes the full cycle result as pretty-printed JSON.
pub fn to_json(output: &AnalysisOutput<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Appends a [`SummaryRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, row: &SummaryRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

fn describe<T>(stat: &Stat<T>, show: impl Fn(&T) -> String) -> String {
    match stat {
        Stat::Value(v) => show(v),
        Stat::NoData => "no data for the selected criteria".to_string(),
        Stat::Undefined => "undefined, no trips with a valid duration".to_string(),
        Stat::NotAvailable => "not available for the selected criteria".to_string(),
    }
}

fn month_name(month: &Month) -> String {
    month.name().to_string()
}

fn day_name(day: &Weekday) -> String {
    weekday_name(*day).to_string()
}

fn write_distribution(f: &mut fmt::Formatter<'_>, title: &str, stat: &Stat<Vec<Bucket>>) -> fmt::Result {
    writeln!(f, "\n{title}:")?;
    match stat {
        Stat::Value(buckets) => {
            let width = buckets
                .iter()
                .map(|b| b.value.as_deref().map_or(7, str::len))
                .max()
                .unwrap_or(0);
            for b in buckets {
                let label = b.value.as_deref().unwrap_or("Unknown");
                writeln!(f, "  {label:<width$}  {}", b.count)?;
            }
            Ok(())
        }
        other => writeln!(f, "  {}", describe(other, |_| String::new())),
    }
}

/// Text form of the four statistic blocks.
pub struct ReportText<'a>(pub &'a StatsReport);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        let t = &stats.temporal;
        let s = &stats.stations;
        let d = &stats.durations;
        let u = &stats.users;

        writeln!(f, "Trips matching selection: {}", stats.trips)?;

        writeln!(f, "\nThe Most Frequent Times of Travel")?;
        writeln!(
            f,
            "Most popular travel month is: {}",
            describe(&t.month, |r| month_name(&r.value))
        )?;
        writeln!(
            f,
            "Most popular day of the week is: {}",
            describe(&t.weekday, |r| day_name(&r.value))
        )?;
        writeln!(
            f,
            "Most popular start hour is: {}",
            describe(&t.hour, |r| r.value.to_string())
        )?;

        writeln!(f, "\nThe Most Popular Stations and Trip")?;
        writeln!(
            f,
            "Most popular start station is: {}",
            describe(&s.start, |r| r.value.clone())
        )?;
        writeln!(
            f,
            "Most popular end station is: {}",
            describe(&s.end, |r| r.value.clone())
        )?;
        writeln!(
            f,
            "Most popular start-end stations combination is: {}",
            describe(&s.trip, |r| r.value.clone())
        )?;

        writeln!(f, "\nTrip Duration")?;
        writeln!(
            f,
            "The total travel time is: {}",
            describe(&d.total, ToString::to_string)
        )?;
        writeln!(
            f,
            "The mean travel time is: {}",
            describe(&d.mean, ToString::to_string)
        )?;

        writeln!(f, "\nUser Stats")?;
        write_distribution(f, "User Types Distribution", &u.user_types)?;
        write_distribution(f, "Gender Type Distribution", &u.genders)?;

        writeln!(f, "\nEarliest, Most Recent, and Most Common Year of birth:")?;
        match &u.birth_years {
            Stat::Value(y) => {
                writeln!(f, "Earliest Year of Birth (ie oldest person): {}", y.earliest)?;
                writeln!(
                    f,
                    "Most Recent Year of Birth (ie youngest person): {}",
                    y.most_recent
                )?;
                writeln!(f, "Most Common Year of Birth: {}", y.most_common)
            }
            other => writeln!(f, "  {}", describe(other, |_| String::new())),
        }
    }
}

/// Renders the four statistic blocks as text.
pub fn render_report(stats: &StatsReport) -> String {
    ReportText(stats).to_string()
}

/// Text form of one pager window, one aligned row per trip.
pub struct WindowText<'w, 'a>(pub &'w Window<'a>);

impl fmt::Display for WindowText<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn cell(value: Option<String>) -> String {
            value.unwrap_or_else(|| "-".to_string())
        }

        let window = self.0;
        for (i, trip) in window.trips.iter().enumerate() {
            let r = trip.record();
            writeln!(
                f,
                "{:>6}  {:<13}  {:>8}  {}  {}  {:>9}  {} --> {}  {}  {}  {}",
                window.offset + i,
                r.region.name(),
                cell(r.id.clone()),
                r.start_time.format("%Y-%m-%d %H:%M:%S"),
                cell(r.end_time.map(|e| e.format("%Y-%m-%d %H:%M:%S").to_string())),
                cell(r.duration.map(|d| format!("{d:.1}"))),
                cell(r.start_station.clone()),
                cell(r.end_station.clone()),
                cell(r.user_type.clone()),
                cell(r.gender.clone()),
                cell(r.birth_year.map(|y| y.to_string())),
            )?;
        }
        Ok(())
    }
}

/// Renders one pager window as aligned rows.
pub fn render_window(window: &Window<'_>) -> String {
    WindowText(window).to_string()
}
