use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info};
use serde::Deserialize;

use super::model::{
    decode_flag, DayRecord, DemandCluster, HourRecord, Month, Season, Weekday, WeatherSituation,
    Year,
};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Raw rows – wire format of the source tables
// ---------------------------------------------------------------------------
//
// Field names mirror the source headers exactly (`dteday`, `yr`, `mnth`, …);
// decoding renames them to the self-describing fields on the typed records.

#[derive(Debug, Deserialize)]
struct RawDayRow {
    dteday: NaiveDate,
    season: i64,
    yr: i64,
    mnth: i64,
    holiday: i64,
    weekday: i64,
    workingday: i64,
    weathersit: i64,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u32,
    registered: u32,
    cnt: u32,
}

#[derive(Debug, Deserialize)]
struct RawHourRow {
    dteday: NaiveDate,
    season: i64,
    yr: i64,
    mnth: i64,
    hr: u8,
    holiday: i64,
    weekday: i64,
    workingday: i64,
    weathersit: i64,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    cnt: u32,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and decode the day-level table from a CSV file.
///
/// An unreadable path is a [`PipelineError::MissingSource`]; header or value
/// problems are [`PipelineError::MalformedSource`]; out-of-domain category
/// codes are [`PipelineError::UnknownCategoryCode`].
pub fn load_day_records(path: &Path) -> Result<Vec<DayRecord>, PipelineError> {
    let file = open_source(path)?;
    let records = read_day_records(file)?;
    info!("loaded {} day records from {}", records.len(), path.display());
    Ok(records)
}

/// Load and decode the hour-level table from a CSV file.
pub fn load_hour_records(path: &Path) -> Result<Vec<HourRecord>, PipelineError> {
    let file = open_source(path)?;
    let records = read_hour_records(file)?;
    info!("loaded {} hour records from {}", records.len(), path.display());
    Ok(records)
}

fn open_source(path: &Path) -> Result<std::fs::File, PipelineError> {
    std::fs::File::open(path).map_err(|source| PipelineError::MissingSource {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Reader-based parsing (also the seam the tests drive)
// ---------------------------------------------------------------------------

/// Parse day-level CSV from any reader.
pub fn read_day_records<R: Read>(reader: R) -> Result<Vec<DayRecord>, PipelineError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row_no, result) in csv_reader.deserialize::<RawDayRow>().enumerate() {
        let raw = result.map_err(|e| malformed_row(row_no, e))?;
        records.push(decode_day_row(row_no, raw)?);
    }

    debug!("decoded {} day rows", records.len());
    Ok(records)
}

/// Parse hour-level CSV from any reader.
pub fn read_hour_records<R: Read>(reader: R) -> Result<Vec<HourRecord>, PipelineError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row_no, result) in csv_reader.deserialize::<RawHourRow>().enumerate() {
        let raw = result.map_err(|e| malformed_row(row_no, e))?;
        records.push(decode_hour_row(row_no, raw)?);
    }

    debug!("decoded {} hour rows", records.len());
    Ok(records)
}

fn malformed_row(row_no: usize, err: csv::Error) -> PipelineError {
    PipelineError::MalformedSource {
        detail: format!("row {row_no}: {err}"),
    }
}

// ---------------------------------------------------------------------------
// Decoding + derived metrics
// ---------------------------------------------------------------------------

fn decode_day_row(row_no: usize, raw: RawDayRow) -> Result<DayRecord, PipelineError> {
    // checked_add keeps absurd counts from wrapping into a sum that happens
    // to match cnt
    let user_sum = raw.casual.checked_add(raw.registered);
    if user_sum != Some(raw.cnt) {
        return Err(PipelineError::MalformedSource {
            detail: format!(
                "row {row_no}: cnt {} != casual {} + registered {}",
                raw.cnt, raw.casual, raw.registered
            ),
        });
    }

    let (casual_ratio, registered_ratio) = user_ratios(raw.casual, raw.registered, raw.cnt);

    Ok(DayRecord {
        date: raw.dteday,
        season: Season::from_code(raw.season)?,
        year: Year::from_code(raw.yr)?,
        month: Month::from_code(raw.mnth)?,
        weekday: Weekday::from_code(raw.weekday)?,
        weather_situation: WeatherSituation::from_code(raw.weathersit)?,
        is_holiday: decode_flag("is_holiday", raw.holiday)?,
        is_workingday: decode_flag("is_workingday", raw.workingday)?,
        temperature: raw.temp,
        feels_temperature: raw.atemp,
        humidity: raw.hum,
        wind_speed: raw.windspeed,
        casual_users: raw.casual,
        registered_users: raw.registered,
        total_count: raw.cnt,
        casual_ratio,
        registered_ratio,
        demand_cluster: DemandCluster::from_total_count(raw.cnt),
    })
}

fn decode_hour_row(row_no: usize, raw: RawHourRow) -> Result<HourRecord, PipelineError> {
    if raw.hr > 23 {
        return Err(PipelineError::MalformedSource {
            detail: format!("row {row_no}: hour {} out of range", raw.hr),
        });
    }

    Ok(HourRecord {
        date: raw.dteday,
        hour: raw.hr,
        season: Season::from_code(raw.season)?,
        year: Year::from_code(raw.yr)?,
        month: Month::from_code(raw.mnth)?,
        weekday: Weekday::from_code(raw.weekday)?,
        weather_situation: WeatherSituation::from_code(raw.weathersit)?,
        is_holiday: decode_flag("is_holiday", raw.holiday)?,
        is_workingday: decode_flag("is_workingday", raw.workingday)?,
        temperature: raw.temp,
        feels_temperature: raw.atemp,
        humidity: raw.hum,
        wind_speed: raw.windspeed,
        total_count: raw.cnt,
    })
}

/// Casual/registered share of the day's rentals as percentages rounded to
/// one decimal. A zero `total_count` yields 0.0 for both sides: the zero-fill
/// policy keeps the computation total and deterministic (the source data has
/// no zero-count day).
fn user_ratios(casual: u32, registered: u32, total: u32) -> (f64, f64) {
    if total == 0 {
        return (0.0, 0.0);
    }
    let total = f64::from(total);
    (
        round1(f64::from(casual) / total * 100.0),
        round1(f64::from(registered) / total * 100.0),
    )
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
