use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Closed category enums
// ---------------------------------------------------------------------------
//
// The source tables encode every categorical field as a small integer. Each
// domain is closed and exhaustive, so decoding is an explicit match: a code
// outside the table is an `UnknownCategoryCode` error, never a silent default.

/// Season as encoded in the source tables (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn from_code(code: i64) -> Result<Self, PipelineError> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            _ => Err(PipelineError::UnknownCategoryCode {
                field: "season",
                code,
            }),
        }
    }

    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observation year (the source spans exactly 2011 and 2012, coded 0/1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Year {
    Y2011,
    Y2012,
}

impl Year {
    pub fn from_code(code: i64) -> Result<Self, PipelineError> {
        match code {
            0 => Ok(Year::Y2011),
            1 => Ok(Year::Y2012),
            _ => Err(PipelineError::UnknownCategoryCode { field: "year", code }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Year::Y2011 => "2011",
            Year::Y2012 => "2012",
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar month, coded 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub fn from_code(code: i64) -> Result<Self, PipelineError> {
        match code {
            1 => Ok(Month::Jan),
            2 => Ok(Month::Feb),
            3 => Ok(Month::Mar),
            4 => Ok(Month::Apr),
            5 => Ok(Month::May),
            6 => Ok(Month::Jun),
            7 => Ok(Month::Jul),
            8 => Ok(Month::Aug),
            9 => Ok(Month::Sep),
            10 => Ok(Month::Oct),
            11 => Ok(Month::Nov),
            12 => Ok(Month::Dec),
            _ => Err(PipelineError::UnknownCategoryCode {
                field: "month",
                code,
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day of week, coded 0..=6 starting at Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub fn from_code(code: i64) -> Result<Self, PipelineError> {
        match code {
            0 => Ok(Weekday::Sunday),
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            _ => Err(PipelineError::UnknownCategoryCode {
                field: "weekday",
                code,
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weather condition bucket, coded 1..=4 from clearest to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WeatherSituation {
    Clear,
    Mist,
    LightPrecipitation,
    Severe,
}

impl WeatherSituation {
    pub fn from_code(code: i64) -> Result<Self, PipelineError> {
        match code {
            1 => Ok(WeatherSituation::Clear),
            2 => Ok(WeatherSituation::Mist),
            3 => Ok(WeatherSituation::LightPrecipitation),
            4 => Ok(WeatherSituation::Severe),
            _ => Err(PipelineError::UnknownCategoryCode {
                field: "weather_situation",
                code,
            }),
        }
    }

    pub const ALL: [WeatherSituation; 4] = [
        WeatherSituation::Clear,
        WeatherSituation::Mist,
        WeatherSituation::LightPrecipitation,
        WeatherSituation::Severe,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeatherSituation::Clear => "Clear/Partly Cloudy",
            WeatherSituation::Mist => "Mist/Cloudy",
            WeatherSituation::LightPrecipitation => "Light Snow/Light Rain",
            WeatherSituation::Severe => "Severe Weather",
        }
    }
}

impl fmt::Display for WeatherSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode a 0/1 flag column (holiday, workingday).
pub fn decode_flag(field: &'static str, code: i64) -> Result<bool, PipelineError> {
    match code {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(PipelineError::UnknownCategoryCode { field, code }),
    }
}

// ---------------------------------------------------------------------------
// Demand cluster
// ---------------------------------------------------------------------------

/// Coarse bucket of a day's total rental volume.
///
/// Thresholds are half-open: `[0, 3000)` → Low, `[3000, 6000)` → Medium,
/// `[6000, ∞)` → High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DemandCluster {
    Low,
    Medium,
    High,
}

impl DemandCluster {
    pub fn from_total_count(total_count: u32) -> Self {
        if total_count >= 6000 {
            DemandCluster::High
        } else if total_count >= 3000 {
            DemandCluster::Medium
        } else {
            DemandCluster::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DemandCluster::Low => "Low Demand",
            DemandCluster::Medium => "Medium Demand",
            DemandCluster::High => "High Demand",
        }
    }
}

impl fmt::Display for DemandCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// DayRecord – one calendar day of the day-level table
// ---------------------------------------------------------------------------

/// A fully decoded day-level observation with derived metrics attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub year: Year,
    pub month: Month,
    pub weekday: Weekday,
    pub weather_situation: WeatherSituation,
    pub is_holiday: bool,
    pub is_workingday: bool,
    /// Normalized to [0, 1] in the source data.
    pub temperature: f64,
    pub feels_temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub casual_users: u32,
    pub registered_users: u32,
    /// Always equals `casual_users + registered_users` (checked at load).
    pub total_count: u32,
    /// Percentage of casual rentals, rounded to one decimal.
    pub casual_ratio: f64,
    /// Percentage of registered rentals, rounded to one decimal.
    pub registered_ratio: f64,
    pub demand_cluster: DemandCluster,
}

// ---------------------------------------------------------------------------
// HourRecord – one (date, hour) observation of the hour-level table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRecord {
    pub date: NaiveDate,
    /// Hour of day, 0..=23.
    pub hour: u8,
    pub season: Season,
    pub year: Year,
    pub month: Month,
    pub weekday: Weekday,
    pub weather_situation: WeatherSituation,
    pub is_holiday: bool,
    pub is_workingday: bool,
    pub temperature: f64,
    pub feels_temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub total_count: u32,
}

// ---------------------------------------------------------------------------
// HourlyProfile – 24-row pivot of average rentals per hour, by day-type
// ---------------------------------------------------------------------------

/// Average rentals for one hour-of-day, split by day-type.
///
/// `None` means no hour record of that day-type exists at this hour; it is
/// deliberately distinct from an average of zero.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HourlyProfileRow {
    pub hour: u8,
    pub workday_avg: Option<f64>,
    pub weekend_avg: Option<f64>,
}

/// The 24-row hourly shape of demand, computed once over the full
/// hour-level table.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyProfile {
    rows: Vec<HourlyProfileRow>,
}

impl HourlyProfile {
    /// Two-key grouped mean over (hour, day-type), pivoted to one row per
    /// hour. Always yields exactly 24 rows, hour 0 through 23.
    pub fn from_hour_records(records: &[HourRecord]) -> Self {
        let mut sums = [[0u64; 2]; 24];
        let mut counts = [[0u64; 2]; 24];

        for rec in records {
            let h = usize::from(rec.hour.min(23));
            let side = usize::from(rec.is_workingday);
            sums[h][side] += u64::from(rec.total_count);
            counts[h][side] += 1;
        }

        let mean = |sum: u64, count: u64| -> Option<f64> {
            (count > 0).then(|| sum as f64 / count as f64)
        };

        let rows = (0..24)
            .map(|h| HourlyProfileRow {
                hour: h as u8,
                workday_avg: mean(sums[h][1], counts[h][1]),
                weekend_avg: mean(sums[h][0], counts[h][0]),
            })
            .collect();

        HourlyProfile { rows }
    }

    /// All 24 rows in hour order.
    pub fn rows(&self) -> &[HourlyProfileRow] {
        &self.rows
    }

    pub fn row(&self, hour: u8) -> Option<&HourlyProfileRow> {
        self.rows.get(usize::from(hour))
    }
}
