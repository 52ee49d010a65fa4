use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{DayRecord, Season, WeatherSituation};

// ---------------------------------------------------------------------------
// Filter predicate: the user's current selection
// ---------------------------------------------------------------------------

/// Conjunction of date-range, season-set, and weather-set conditions.
///
/// A record passes when its date lies within the inclusive range AND its
/// season is selected AND its weather situation is selected. Empty sets
/// select nothing (mirroring a multiselect with everything unticked).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub seasons: BTreeSet<Season>,
    pub weather: BTreeSet<WeatherSituation>,
}

impl FilterPredicate {
    /// A predicate matching every given record: the date range spans the
    /// data's own bounds and all categories are selected. Falls back to a
    /// degenerate empty range when there are no records.
    pub fn all(records: &[DayRecord]) -> Self {
        let start_date = records.iter().map(|r| r.date).min();
        let end_date = records.iter().map(|r| r.date).max();
        FilterPredicate {
            start_date: start_date.unwrap_or(NaiveDate::MIN),
            end_date: end_date.unwrap_or(NaiveDate::MIN),
            seasons: Season::ALL.into_iter().collect(),
            weather: WeatherSituation::ALL.into_iter().collect(),
        }
    }

    pub fn matches(&self, record: &DayRecord) -> bool {
        record.date >= self.start_date
            && record.date <= self.end_date
            && self.seasons.contains(&record.season)
            && self.weather.contains(&record.weather_situation)
    }
}

/// Select the records passing all three conditions, preserving source order.
///
/// Works over borrowed records so an already-filtered subset can be filtered
/// again; re-applying the same predicate is a no-op.
pub fn filter_days<'a, I>(records: I, predicate: &FilterPredicate) -> Vec<&'a DayRecord>
where
    I: IntoIterator<Item = &'a DayRecord>,
{
    records
        .into_iter()
        .filter(|rec| predicate.matches(rec))
        .collect()
}
