use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use bikeshare_analytics::context::DataContext;
use bikeshare_analytics::data::filter::{filter_days, FilterPredicate};
use bikeshare_analytics::query;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[derive(Serialize)]
struct DayRow {
    instant: usize,
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

#[derive(Serialize)]
struct HourRow {
    instant: usize,
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
    casual: u32,
    registered: u32,
    cnt: u32,
}

fn season_code(month: u32) -> i64 {
    match month {
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => 4,
    }
}

/// Relative hourly demand: bimodal commuter shape on workdays, a midday
/// hump on weekends. Weights sum to roughly 1.
fn hour_weight(hour: u8, workday: bool) -> f64 {
    let h = f64::from(hour);
    if workday {
        let morning = (-(h - 8.0).powi(2) / 3.0).exp();
        let evening = (-(h - 17.5).powi(2) / 4.0).exp();
        0.02 + 0.14 * morning + 0.16 * evening
    } else {
        let midday = (-(h - 14.0).powi(2) / 18.0).exp();
        0.015 + 0.11 * midday
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2011, 1, 1).context("bad start date")?;
    let n_days = 731; // 2011-01-01 through 2012-12-31

    let mut day_writer = csv::Writer::from_path("day.csv").context("creating day.csv")?;
    let mut hour_writer = csv::Writer::from_path("hour.csv").context("creating hour.csv")?;
    let mut hour_instant = 0usize;

    for i in 0..n_days {
        let date = start + Duration::days(i as i64);
        let month = date.month();
        let season = season_code(month);
        let weekday = i64::from(date.weekday().num_days_from_sunday());
        let holiday = i64::from(date.month() == 1 && date.day() == 1);
        let workingday = i64::from((1..=5).contains(&weekday) && holiday == 0);

        // Mostly clear, sometimes misty, occasionally wet.
        let weathersit = match rng.next_f64() {
            r if r < 0.63 => 1,
            r if r < 0.93 => 2,
            _ => 3,
        };

        // Seasonal temperature curve peaking in July, normalized to [0, 1].
        let phase = (f64::from(date.ordinal()) - 15.0) / 365.0 * std::f64::consts::TAU;
        let temp = (0.5 - 0.3 * phase.cos() + 0.08 * (rng.next_f64() - 0.5)).clamp(0.02, 0.98);
        let atemp = (temp + 0.04 * (rng.next_f64() - 0.5)).clamp(0.02, 0.98);
        let hum = (0.55 + 0.25 * (rng.next_f64() - 0.5)).clamp(0.0, 1.0);
        let windspeed = (0.2 + 0.2 * (rng.next_f64() - 0.5)).clamp(0.0, 1.0);

        // Demand: warm and clear days rent more; 2012 grew on 2011.
        let weather_factor = match weathersit {
            1 => 1.0,
            2 => 0.82,
            _ => 0.45,
        };
        let year_factor = if date.year() == 2012 { 1.35 } else { 1.0 };
        let base = (1200.0 + 6000.0 * temp) * weather_factor * year_factor;
        let total = (base * (0.85 + 0.3 * rng.next_f64())).round().max(50.0) as u32;

        let base_share = if workingday == 1 { 0.13 } else { 0.34 };
        let casual_share = base_share + 0.04 * (rng.next_f64() - 0.5);
        let casual = (f64::from(total) * casual_share).round() as u32;
        let registered = total - casual;

        day_writer
            .serialize(DayRow {
                instant: i + 1,
                dteday: date,
                season,
                yr: i64::from(date.year() - 2011),
                mnth: i64::from(month),
                holiday,
                weekday,
                workingday,
                weathersit,
                temp,
                atemp,
                hum,
                windspeed,
                casual,
                registered,
                cnt: total,
            })
            .context("writing day row")?;

        for hr in 0u8..24 {
            let weight = hour_weight(hr, workingday == 1);
            let hourly_total =
                (f64::from(total) * weight * (0.8 + 0.4 * rng.next_f64())).round() as u32;
            let hourly_casual = (f64::from(hourly_total) * casual_share).round() as u32;

            hour_instant += 1;
            hour_writer
                .serialize(HourRow {
                    instant: hour_instant,
                    dteday: date,
                    season,
                    yr: i64::from(date.year() - 2011),
                    mnth: i64::from(month),
                    hr,
                    holiday,
                    weekday,
                    workingday,
                    weathersit,
                    temp,
                    atemp,
                    hum,
                    windspeed,
                    casual: hourly_casual,
                    registered: hourly_total - hourly_casual,
                    cnt: hourly_total,
                })
                .context("writing hour row")?;
        }
    }

    day_writer.flush().context("flushing day.csv")?;
    hour_writer.flush().context("flushing hour.csv")?;
    println!("Wrote {n_days} days to day.csv and {hour_instant} rows to hour.csv");

    // Run the generated files through the pipeline as a smoke check.
    let ctx = DataContext::load(Path::new("day.csv"), Path::new("hour.csv"))?;
    let predicate = FilterPredicate::all(&ctx.days);
    let subset = filter_days(&ctx.days, &predicate);

    if let Some(metrics) = query::headline_metrics(&subset) {
        println!(
            "Avg {:.0} rentals/day over {} days (peak {}, utilization {:.1}%)",
            metrics.avg_daily_rentals,
            metrics.total_days,
            metrics.peak_day_rentals,
            metrics.utilization_rate
        );
    }

    if let Some(groups) = query::mean_total_by_season(&subset) {
        for g in groups {
            println!("  {}: {:.0} rentals/day ({} days)", g.group, g.mean_total, g.days);
        }
    }

    let peaks = query::peak_hours(&ctx.hourly_profile, 3);
    println!("Workday peak hours: {:?}", peaks.workday);
    println!("Weekend peak hours: {:?}", peaks.weekend);

    Ok(())
}
