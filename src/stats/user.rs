use tracing::debug;

use super::types::{BirthYearStats, Stat, UserStats};
use super::utility::{distribution, mode_first_seen};
use crate::filter::FilteredDataset;
use crate::schema::Column;

/// User type, gender and birth year statistics.
///
/// Distributions include an unknown bucket for missing values. A statistic
/// whose column no source supplies is reported as not available, as are
/// gender and birth year when no record carries them.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn user_stats(dataset: &FilteredDataset) -> UserStats {
    if dataset.is_empty() {
        return UserStats {
            user_types: Stat::NoData,
            genders: Stat::NoData,
            birth_years: Stat::NoData,
        };
    }

    let trips = dataset.trips();

    let user_types = if dataset.has_column(Column::UserType) {
        Stat::Value(distribution(
            trips.iter().map(|t| t.record().user_type.as_deref()),
        ))
    } else {
        debug!("No user type column for selection");
        Stat::NotAvailable
    };

    let has_gender = dataset.has_column(Column::Gender)
        && trips.iter().any(|t| t.record().gender.is_some());
    let genders = if has_gender {
        Stat::Value(distribution(
            trips.iter().map(|t| t.record().gender.as_deref()),
        ))
    } else {
        debug!("No gender data for selection");
        Stat::NotAvailable
    };

    let years: Vec<i32> = trips.iter().filter_map(|t| t.record().birth_year).collect();
    let birth_years = match birth_year_stats(&years) {
        Some(stats) => Stat::Value(stats),
        None => {
            debug!("No birth year data for selection");
            Stat::NotAvailable
        }
    };

    UserStats {
        user_types,
        genders,
        birth_years,
    }
}

fn birth_year_stats(years: &[i32]) -> Option<BirthYearStats> {
    let earliest = *years.iter().min()?;
    let most_recent = *years.iter().max()?;
    let most_common = mode_first_seen(years.iter().copied())?.value;

    Some(BirthYearStats {
        earliest,
        most_recent,
        most_common,
    })
}
