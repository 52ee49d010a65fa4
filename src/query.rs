use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::model::{
    DayRecord, DemandCluster, HourlyProfile, Season, WeatherSituation,
};

// ---------------------------------------------------------------------------
// Aggregate operations over a filtered subset
// ---------------------------------------------------------------------------
//
// Every operation takes the borrowed subset produced by the filter layer and
// is a pure function of it: nothing is cached across predicates. An empty
// subset yields `None` from every operation — the explicit empty marker the
// visualization layer must check instead of plotting fabricated zeros.

/// Day-type of a record, from its working-day flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayType {
    Weekend,
    Workday,
}

impl DayType {
    pub fn from_flag(is_workingday: bool) -> Self {
        if is_workingday {
            DayType::Workday
        } else {
            DayType::Weekend
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayType::Weekend => "Weekend",
            DayType::Workday => "Workday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean of `total_count` for one group, with the group's day count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub group: K,
    pub mean_total: f64,
    pub days: usize,
}

/// Grouped mean of an arbitrary per-record value, keyed by any ordered key.
/// Output follows the key's natural order.
fn grouped_mean<K, G, V>(subset: &[&DayRecord], group: G, value: V) -> Vec<GroupMean<K>>
where
    K: Ord + Copy,
    G: Fn(&DayRecord) -> K,
    V: Fn(&DayRecord) -> f64,
{
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for rec in subset {
        let entry = acc.entry(group(rec)).or_insert((0.0, 0));
        entry.0 += value(rec);
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(group, (sum, days))| GroupMean {
            group,
            mean_total: sum / days as f64,
            days,
        })
        .collect()
}

pub fn mean_total_by_season(subset: &[&DayRecord]) -> Option<Vec<GroupMean<Season>>> {
    if subset.is_empty() {
        return None;
    }
    Some(grouped_mean(subset, |r| r.season, |r| f64::from(r.total_count)))
}

pub fn mean_total_by_weather(subset: &[&DayRecord]) -> Option<Vec<GroupMean<WeatherSituation>>> {
    if subset.is_empty() {
        return None;
    }
    Some(grouped_mean(
        subset,
        |r| r.weather_situation,
        |r| f64::from(r.total_count),
    ))
}

pub fn mean_total_by_demand_cluster(
    subset: &[&DayRecord],
) -> Option<Vec<GroupMean<DemandCluster>>> {
    if subset.is_empty() {
        return None;
    }
    Some(grouped_mean(
        subset,
        |r| r.demand_cluster,
        |r| f64::from(r.total_count),
    ))
}

pub fn mean_total_by_day_type(subset: &[&DayRecord]) -> Option<Vec<GroupMean<DayType>>> {
    if subset.is_empty() {
        return None;
    }
    Some(grouped_mean(
        subset,
        |r| DayType::from_flag(r.is_workingday),
        |r| f64::from(r.total_count),
    ))
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// The dashboard's top-line figures for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub avg_daily_rentals: f64,
    pub total_days: usize,
    pub peak_day_rentals: u32,
    /// Average as a percentage of the peak day.
    pub utilization_rate: f64,
}

pub fn headline_metrics(subset: &[&DayRecord]) -> Option<HeadlineMetrics> {
    if subset.is_empty() {
        return None;
    }
    let total: u64 = subset.iter().map(|r| u64::from(r.total_count)).sum();
    let avg = total as f64 / subset.len() as f64;
    let peak = subset.iter().map(|r| r.total_count).max().unwrap_or(0);
    let utilization = if peak > 0 {
        avg / f64::from(peak) * 100.0
    } else {
        0.0
    };
    Some(HeadlineMetrics {
        avg_daily_rentals: avg,
        total_days: subset.len(),
        peak_day_rentals: peak,
        utilization_rate: utilization,
    })
}

// ---------------------------------------------------------------------------
// Season × weather cross-tabulation
// ---------------------------------------------------------------------------

/// One crosstab row: how a season's days distribute over weather conditions,
/// as row percentages (summing to ≈100).
#[derive(Debug, Clone, Serialize)]
pub struct CrossTabRow {
    pub season: Season,
    pub shares: Vec<(WeatherSituation, f64)>,
}

pub fn season_weather_crosstab(subset: &[&DayRecord]) -> Option<Vec<CrossTabRow>> {
    if subset.is_empty() {
        return None;
    }

    let mut counts: BTreeMap<Season, BTreeMap<WeatherSituation, usize>> = BTreeMap::new();
    for rec in subset {
        *counts
            .entry(rec.season)
            .or_default()
            .entry(rec.weather_situation)
            .or_default() += 1;
    }

    let rows = counts
        .into_iter()
        .map(|(season, by_weather)| {
            let row_total: usize = by_weather.values().sum();
            let shares = WeatherSituation::ALL
                .iter()
                .map(|&weather| {
                    let count = by_weather.get(&weather).copied().unwrap_or(0);
                    (weather, count as f64 / row_total as f64 * 100.0)
                })
                .collect();
            CrossTabRow { season, shares }
        })
        .collect();

    Some(rows)
}

// ---------------------------------------------------------------------------
// Pearson correlation matrix
// ---------------------------------------------------------------------------

/// Fields entering the weather correlation matrix, in matrix order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationField {
    Temperature,
    Humidity,
    WindSpeed,
    TotalCount,
}

impl CorrelationField {
    pub const ALL: [CorrelationField; 4] = [
        CorrelationField::Temperature,
        CorrelationField::Humidity,
        CorrelationField::WindSpeed,
        CorrelationField::TotalCount,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationField::Temperature => "temperature",
            CorrelationField::Humidity => "humidity",
            CorrelationField::WindSpeed => "wind_speed",
            CorrelationField::TotalCount => "total_count",
        }
    }

    fn extract(&self, rec: &DayRecord) -> f64 {
        match self {
            CorrelationField::Temperature => rec.temperature,
            CorrelationField::Humidity => rec.humidity,
            CorrelationField::WindSpeed => rec.wind_speed,
            CorrelationField::TotalCount => f64::from(rec.total_count),
        }
    }
}

/// Symmetric 4×4 Pearson matrix. A cell is `None` when either series has
/// zero variance (the coefficient is undefined there, not zero).
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub fields: [CorrelationField; 4],
    pub cells: [[Option<f64>; 4]; 4],
}

impl CorrelationMatrix {
    pub fn cell(&self, a: CorrelationField, b: CorrelationField) -> Option<f64> {
        let idx = |f| CorrelationField::ALL.iter().position(|&g| g == f);
        match (idx(a), idx(b)) {
            (Some(i), Some(j)) => self.cells[i][j],
            _ => None,
        }
    }
}

pub fn correlation_matrix(subset: &[&DayRecord]) -> Option<CorrelationMatrix> {
    if subset.is_empty() {
        return None;
    }

    let series: Vec<Vec<f64>> = CorrelationField::ALL
        .iter()
        .map(|field| subset.iter().map(|rec| field.extract(rec)).collect())
        .collect();

    let mut cells = [[None; 4]; 4];
    for i in 0..4 {
        cells[i][i] = Some(1.0);
        for j in (i + 1)..4 {
            let r = pearson(&series[i], &series[j]);
            cells[i][j] = r;
            cells[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        fields: CorrelationField::ALL,
        cells,
    })
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

// ---------------------------------------------------------------------------
// Monthly (time-bucketed) trends
// ---------------------------------------------------------------------------

/// Mean rentals per calendar month (`YYYY-MM`) within one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeasonMean {
    pub month: String,
    pub season: Season,
    pub mean_total: f64,
    pub days: usize,
}

fn month_bucket(rec: &DayRecord) -> String {
    rec.date.format("%Y-%m").to_string()
}

pub fn monthly_mean_by_season(subset: &[&DayRecord]) -> Option<Vec<MonthlySeasonMean>> {
    if subset.is_empty() {
        return None;
    }

    let mut acc: BTreeMap<(String, Season), (f64, usize)> = BTreeMap::new();
    for rec in subset {
        let entry = acc.entry((month_bucket(rec), rec.season)).or_insert((0.0, 0));
        entry.0 += f64::from(rec.total_count);
        entry.1 += 1;
    }

    Some(
        acc.into_iter()
            .map(|((month, season), (sum, days))| MonthlySeasonMean {
                month,
                season,
                mean_total: sum / days as f64,
                days,
            })
            .collect(),
    )
}

/// Mean casual and registered users per calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyUserMeans {
    pub month: String,
    pub casual_avg: f64,
    pub registered_avg: f64,
    pub days: usize,
}

pub fn monthly_user_type_means(subset: &[&DayRecord]) -> Option<Vec<MonthlyUserMeans>> {
    if subset.is_empty() {
        return None;
    }

    let mut acc: BTreeMap<String, (f64, f64, usize)> = BTreeMap::new();
    for rec in subset {
        let entry = acc.entry(month_bucket(rec)).or_insert((0.0, 0.0, 0));
        entry.0 += f64::from(rec.casual_users);
        entry.1 += f64::from(rec.registered_users);
        entry.2 += 1;
    }

    Some(
        acc.into_iter()
            .map(|(month, (casual, registered, days))| MonthlyUserMeans {
                month,
                casual_avg: casual / days as f64,
                registered_avg: registered / days as f64,
                days,
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// User behavior views
// ---------------------------------------------------------------------------

/// Average casual and registered users per season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonUserMeans {
    pub season: Season,
    pub casual_avg: f64,
    pub registered_avg: f64,
}

pub fn mean_users_by_season(subset: &[&DayRecord]) -> Option<Vec<SeasonUserMeans>> {
    if subset.is_empty() {
        return None;
    }

    let mut acc: BTreeMap<Season, (f64, f64, usize)> = BTreeMap::new();
    for rec in subset {
        let entry = acc.entry(rec.season).or_insert((0.0, 0.0, 0));
        entry.0 += f64::from(rec.casual_users);
        entry.1 += f64::from(rec.registered_users);
        entry.2 += 1;
    }

    Some(
        acc.into_iter()
            .map(|(season, (casual, registered, days))| SeasonUserMeans {
                season,
                casual_avg: casual / days as f64,
                registered_avg: registered / days as f64,
            })
            .collect(),
    )
}

/// Average user-share percentages split by day-type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayTypeRatios {
    pub day_type: DayType,
    pub casual_ratio_avg: f64,
    pub registered_ratio_avg: f64,
}

pub fn mean_ratios_by_day_type(subset: &[&DayRecord]) -> Option<Vec<DayTypeRatios>> {
    if subset.is_empty() {
        return None;
    }

    let mut acc: BTreeMap<DayType, (f64, f64, usize)> = BTreeMap::new();
    for rec in subset {
        let entry = acc
            .entry(DayType::from_flag(rec.is_workingday))
            .or_insert((0.0, 0.0, 0));
        entry.0 += rec.casual_ratio;
        entry.1 += rec.registered_ratio;
        entry.2 += 1;
    }

    Some(
        acc.into_iter()
            .map(|(day_type, (casual, registered, days))| DayTypeRatios {
                day_type,
                casual_ratio_avg: casual / days as f64,
                registered_ratio_avg: registered / days as f64,
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Cluster and weather characteristic tables
// ---------------------------------------------------------------------------

/// Per-cluster characteristics for the "demand cluster" table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClusterStats {
    pub cluster: DemandCluster,
    pub mean_total: f64,
    pub days: usize,
    pub mean_temperature: f64,
    pub mean_casual_ratio: f64,
}

pub fn demand_cluster_stats(subset: &[&DayRecord]) -> Option<Vec<ClusterStats>> {
    if subset.is_empty() {
        return None;
    }

    let mut acc: BTreeMap<DemandCluster, (f64, f64, f64, usize)> = BTreeMap::new();
    for rec in subset {
        let entry = acc.entry(rec.demand_cluster).or_insert((0.0, 0.0, 0.0, 0));
        entry.0 += f64::from(rec.total_count);
        entry.1 += rec.temperature;
        entry.2 += rec.casual_ratio;
        entry.3 += 1;
    }

    Some(
        acc.into_iter()
            .map(|(cluster, (total, temp, ratio, days))| ClusterStats {
                cluster,
                mean_total: total / days as f64,
                days,
                mean_temperature: temp / days as f64,
                mean_casual_ratio: ratio / days as f64,
            })
            .collect(),
    )
}

/// Per-weather characteristics for the "weather impact" table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherStats {
    pub weather: WeatherSituation,
    pub mean_total: f64,
    pub days: usize,
    pub mean_temperature: f64,
    pub mean_humidity: f64,
}

pub fn weather_impact_stats(subset: &[&DayRecord]) -> Option<Vec<WeatherStats>> {
    if subset.is_empty() {
        return None;
    }

    let mut acc: BTreeMap<WeatherSituation, (f64, f64, f64, usize)> = BTreeMap::new();
    for rec in subset {
        let entry = acc.entry(rec.weather_situation).or_insert((0.0, 0.0, 0.0, 0));
        entry.0 += f64::from(rec.total_count);
        entry.1 += rec.temperature;
        entry.2 += rec.humidity;
        entry.3 += 1;
    }

    Some(
        acc.into_iter()
            .map(|(weather, (total, temp, hum, days))| WeatherStats {
                weather,
                mean_total: total / days as f64,
                days,
                mean_temperature: temp / days as f64,
                mean_humidity: hum / days as f64,
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Temperature bands
// ---------------------------------------------------------------------------

/// Five equal-width bands over the subset's normalized temperature range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TemperatureBand {
    VeryCold,
    Cold,
    Moderate,
    Warm,
    Hot,
}

impl TemperatureBand {
    const ALL: [TemperatureBand; 5] = [
        TemperatureBand::VeryCold,
        TemperatureBand::Cold,
        TemperatureBand::Moderate,
        TemperatureBand::Warm,
        TemperatureBand::Hot,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TemperatureBand::VeryCold => "Very Cold",
            TemperatureBand::Cold => "Cold",
            TemperatureBand::Moderate => "Moderate",
            TemperatureBand::Warm => "Warm",
            TemperatureBand::Hot => "Hot",
        }
    }
}

impl fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureBandMean {
    pub band: TemperatureBand,
    pub mean_total: f64,
    pub days: usize,
}

/// Cut the subset into five equal-width temperature bands and average
/// rentals per band. Bands with no days are omitted. A subset with a single
/// temperature value has no width to cut, so everything lands in Moderate.
pub fn temperature_band_means(subset: &[&DayRecord]) -> Option<Vec<TemperatureBandMean>> {
    if subset.is_empty() {
        return None;
    }

    let min = subset.iter().map(|r| r.temperature).fold(f64::INFINITY, f64::min);
    let max = subset.iter().map(|r| r.temperature).fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / 5.0;

    let band_of = |temp: f64| -> TemperatureBand {
        if width == 0.0 {
            return TemperatureBand::Moderate;
        }
        let idx = (((temp - min) / width) as usize).min(4);
        TemperatureBand::ALL[idx]
    };

    Some(grouped_mean(subset, |r| band_of(r.temperature), |r| {
        f64::from(r.total_count)
    })
    .into_iter()
    .map(|gm| TemperatureBandMean {
        band: gm.group,
        mean_total: gm.mean_total,
        days: gm.days,
    })
    .collect())
}

// ---------------------------------------------------------------------------
// Peak hours from the hourly profile
// ---------------------------------------------------------------------------

/// Top hours by average rentals, one list per day-type, descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakHours {
    pub workday: Vec<(u8, f64)>,
    pub weekend: Vec<(u8, f64)>,
}

/// The n busiest hours on each side of the profile. Hours without data on a
/// side simply do not rank there.
pub fn peak_hours(profile: &HourlyProfile, n: usize) -> PeakHours {
    let top = |side: fn(&crate::data::model::HourlyProfileRow) -> Option<f64>| {
        let mut hours: Vec<(u8, f64)> = profile
            .rows()
            .iter()
            .filter_map(|row| side(row).map(|avg| (row.hour, avg)))
            .collect();
        hours.sort_by(|a, b| b.1.total_cmp(&a.1));
        hours.truncate(n);
        hours
    };

    PeakHours {
        workday: top(|row| row.workday_avg),
        weekend: top(|row| row.weekend_avg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{HourRecord, Month, Weekday, Year};
    use chrono::NaiveDate;

    fn day(
        date: (i32, u32, u32),
        season: Season,
        weather: WeatherSituation,
        is_workingday: bool,
        temperature: f64,
        casual: u32,
        registered: u32,
    ) -> DayRecord {
        let total = casual + registered;
        let casual_ratio = (f64::from(casual) / f64::from(total) * 1000.0).round() / 10.0;
        DayRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            season,
            year: Year::Y2011,
            month: Month::Jan,
            weekday: Weekday::Monday,
            weather_situation: weather,
            is_holiday: false,
            is_workingday,
            temperature,
            feels_temperature: temperature,
            humidity: 0.5,
            wind_speed: 0.2,
            casual_users: casual,
            registered_users: registered,
            total_count: total,
            casual_ratio,
            registered_ratio: 100.0 - casual_ratio,
            demand_cluster: DemandCluster::from_total_count(total),
        }
    }

    fn refs(days: &[DayRecord]) -> Vec<&DayRecord> {
        days.iter().collect()
    }

    #[test]
    fn single_season_subset_groups_to_one_mean() {
        let days = vec![
            day((2011, 9, 1), Season::Fall, WeatherSituation::Clear, true, 0.6, 500, 3500),
            day((2011, 9, 2), Season::Fall, WeatherSituation::Clear, true, 0.6, 700, 4300),
            day((2011, 9, 3), Season::Fall, WeatherSituation::Mist, false, 0.5, 900, 2100),
        ];
        let subset = refs(&days);

        let groups = mean_total_by_season(&subset).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group, Season::Fall);
        let expected = (4000.0 + 5000.0 + 3000.0) / 3.0;
        assert!((groups[0].mean_total - expected).abs() < 1e-9);
        assert_eq!(groups[0].days, 3);
    }

    #[test]
    fn day_type_groups_split_on_workingday_flag() {
        let days = vec![
            day((2011, 1, 3), Season::Spring, WeatherSituation::Clear, true, 0.3, 100, 900),
            day((2011, 1, 4), Season::Spring, WeatherSituation::Clear, true, 0.3, 100, 1900),
            day((2011, 1, 8), Season::Spring, WeatherSituation::Clear, false, 0.3, 600, 400),
        ];
        let subset = refs(&days);

        let groups = mean_total_by_day_type(&subset).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, DayType::Weekend);
        assert_eq!(groups[0].mean_total, 1000.0);
        assert_eq!(groups[1].group, DayType::Workday);
        assert_eq!(groups[1].mean_total, 1500.0);
    }

    #[test]
    fn headline_metrics_match_hand_computation() {
        let days = vec![
            day((2011, 5, 1), Season::Summer, WeatherSituation::Clear, true, 0.5, 1000, 3000),
            day((2011, 5, 2), Season::Summer, WeatherSituation::Clear, true, 0.5, 2000, 6000),
        ];
        let subset = refs(&days);

        let m = headline_metrics(&subset).unwrap();
        assert_eq!(m.total_days, 2);
        assert_eq!(m.avg_daily_rentals, 6000.0);
        assert_eq!(m.peak_day_rentals, 8000);
        assert!((m.utilization_rate - 75.0).abs() < 1e-9);
    }

    #[test]
    fn crosstab_rows_are_percentages_summing_to_hundred() {
        let days = vec![
            day((2011, 4, 1), Season::Spring, WeatherSituation::Clear, true, 0.4, 100, 900),
            day((2011, 4, 2), Season::Spring, WeatherSituation::Clear, true, 0.4, 100, 900),
            day((2011, 4, 3), Season::Spring, WeatherSituation::Mist, true, 0.4, 100, 900),
            day((2011, 7, 1), Season::Summer, WeatherSituation::Clear, true, 0.7, 100, 900),
        ];
        let subset = refs(&days);

        let rows = season_weather_crosstab(&subset).unwrap();
        assert_eq!(rows.len(), 2);

        let spring = &rows[0];
        assert_eq!(spring.season, Season::Spring);
        let sum: f64 = spring.shares.iter().map(|(_, pct)| pct).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        let clear_share = spring
            .shares
            .iter()
            .find(|(w, _)| *w == WeatherSituation::Clear)
            .map(|(_, pct)| *pct)
            .unwrap();
        assert!((clear_share - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_detects_a_perfect_linear_relation() {
        // total_count rises exactly with temperature
        let days = vec![
            day((2011, 3, 1), Season::Spring, WeatherSituation::Clear, true, 0.1, 0, 1000),
            day((2011, 3, 2), Season::Spring, WeatherSituation::Clear, true, 0.2, 0, 2000),
            day((2011, 3, 3), Season::Spring, WeatherSituation::Clear, true, 0.3, 0, 3000),
        ];
        let subset = refs(&days);

        let matrix = correlation_matrix(&subset).unwrap();
        let r = matrix
            .cell(CorrelationField::Temperature, CorrelationField::TotalCount)
            .unwrap();
        assert!((r - 1.0).abs() < 1e-9);

        // diagonal and symmetry
        assert_eq!(matrix.cell(CorrelationField::Humidity, CorrelationField::Humidity), Some(1.0));
        assert_eq!(
            matrix.cell(CorrelationField::WindSpeed, CorrelationField::TotalCount),
            matrix.cell(CorrelationField::TotalCount, CorrelationField::WindSpeed)
        );
    }

    #[test]
    fn zero_variance_series_yields_missing_cell() {
        // humidity is constant in the fixture
        let days = vec![
            day((2011, 3, 1), Season::Spring, WeatherSituation::Clear, true, 0.1, 0, 1000),
            day((2011, 3, 2), Season::Spring, WeatherSituation::Clear, true, 0.2, 0, 2000),
        ];
        let subset = refs(&days);

        let matrix = correlation_matrix(&subset).unwrap();
        assert_eq!(
            matrix.cell(CorrelationField::Humidity, CorrelationField::TotalCount),
            None
        );
    }

    #[test]
    fn monthly_buckets_group_by_calendar_month() {
        let days = vec![
            day((2011, 1, 5), Season::Spring, WeatherSituation::Clear, true, 0.2, 100, 900),
            day((2011, 1, 25), Season::Spring, WeatherSituation::Clear, true, 0.2, 100, 1900),
            day((2011, 2, 5), Season::Spring, WeatherSituation::Clear, true, 0.2, 100, 2900),
        ];
        let subset = refs(&days);

        let trend = monthly_mean_by_season(&subset).unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].month, "2011-01");
        assert_eq!(trend[0].mean_total, 1500.0);
        assert_eq!(trend[1].month, "2011-02");
        assert_eq!(trend[1].mean_total, 3000.0);

        let users = monthly_user_type_means(&subset).unwrap();
        assert_eq!(users[0].casual_avg, 100.0);
        assert_eq!(users[0].registered_avg, 1400.0);
    }

    #[test]
    fn ratio_means_split_by_day_type() {
        let days = vec![
            day((2011, 1, 3), Season::Spring, WeatherSituation::Clear, true, 0.3, 250, 750),
            day((2011, 1, 8), Season::Spring, WeatherSituation::Clear, false, 0.3, 500, 500),
        ];
        let subset = refs(&days);

        let ratios = mean_ratios_by_day_type(&subset).unwrap();
        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0].day_type, DayType::Weekend);
        assert_eq!(ratios[0].casual_ratio_avg, 50.0);
        assert_eq!(ratios[1].day_type, DayType::Workday);
        assert_eq!(ratios[1].casual_ratio_avg, 25.0);
    }

    #[test]
    fn temperature_bands_cut_the_observed_range() {
        let days = vec![
            day((2011, 1, 1), Season::Spring, WeatherSituation::Clear, true, 0.0, 0, 500),
            day((2011, 1, 2), Season::Spring, WeatherSituation::Clear, true, 0.5, 0, 2500),
            day((2011, 1, 3), Season::Spring, WeatherSituation::Clear, true, 1.0, 0, 5000),
        ];
        let subset = refs(&days);

        let bands = temperature_band_means(&subset).unwrap();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].band, TemperatureBand::VeryCold);
        assert_eq!(bands[0].mean_total, 500.0);
        assert_eq!(bands[1].band, TemperatureBand::Moderate);
        assert_eq!(bands[2].band, TemperatureBand::Hot);
        assert_eq!(bands[2].mean_total, 5000.0);
    }

    #[test]
    fn constant_temperature_lands_in_moderate() {
        let days = vec![
            day((2011, 1, 1), Season::Spring, WeatherSituation::Clear, true, 0.4, 0, 500),
            day((2011, 1, 2), Season::Spring, WeatherSituation::Clear, true, 0.4, 0, 700),
        ];
        let subset = refs(&days);

        let bands = temperature_band_means(&subset).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].band, TemperatureBand::Moderate);
        assert_eq!(bands[0].days, 2);
    }

    fn hour(hour: u8, is_workingday: bool, total_count: u32) -> HourRecord {
        HourRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, 3).unwrap(),
            hour,
            season: Season::Spring,
            year: Year::Y2011,
            month: Month::Jan,
            weekday: Weekday::Monday,
            weather_situation: WeatherSituation::Clear,
            is_holiday: false,
            is_workingday,
            temperature: 0.3,
            feels_temperature: 0.3,
            humidity: 0.5,
            wind_speed: 0.1,
            total_count,
        }
    }

    #[test]
    fn peak_hours_rank_each_side_independently() {
        let records = vec![
            hour(8, true, 400),
            hour(17, true, 500),
            hour(12, true, 300),
            hour(14, false, 250),
            hour(15, false, 200),
        ];
        let profile = HourlyProfile::from_hour_records(&records);

        let peaks = peak_hours(&profile, 2);
        assert_eq!(peaks.workday, vec![(17, 500.0), (8, 400.0)]);
        assert_eq!(peaks.weekend, vec![(14, 250.0), (15, 200.0)]);
    }

    #[test]
    fn every_aggregate_returns_none_for_an_empty_subset() {
        let subset: Vec<&DayRecord> = Vec::new();
        assert!(mean_total_by_season(&subset).is_none());
        assert!(mean_total_by_weather(&subset).is_none());
        assert!(mean_total_by_demand_cluster(&subset).is_none());
        assert!(mean_total_by_day_type(&subset).is_none());
        assert!(headline_metrics(&subset).is_none());
        assert!(season_weather_crosstab(&subset).is_none());
        assert!(correlation_matrix(&subset).is_none());
        assert!(monthly_mean_by_season(&subset).is_none());
        assert!(monthly_user_type_means(&subset).is_none());
        assert!(mean_users_by_season(&subset).is_none());
        assert!(mean_ratios_by_day_type(&subset).is_none());
        assert!(demand_cluster_stats(&subset).is_none());
        assert!(weather_impact_stats(&subset).is_none());
        assert!(temperature_band_means(&subset).is_none());
    }
}
