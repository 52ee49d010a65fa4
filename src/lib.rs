//! Data transformation and aggregation pipeline for bike-sharing usage
//! tables.
//!
//! Two CSV sources (per-day and per-hour rentals) are parsed into typed
//! records, integer category codes are decoded into closed enums, business
//! metrics (user-share ratios, demand clusters) are derived, and a filter +
//! query layer recomputes aggregates over the user's current selection. A
//! visualization layer is expected to sit on top of [`query`]; it is not
//! part of this crate.
//!
//! ```no_run
//! use std::path::Path;
//! use bikeshare_analytics::context::DataContext;
//! use bikeshare_analytics::data::filter::{filter_days, FilterPredicate};
//! use bikeshare_analytics::query;
//!
//! # fn main() -> Result<(), bikeshare_analytics::error::PipelineError> {
//! let ctx = DataContext::load(Path::new("day.csv"), Path::new("hour.csv"))?;
//! let predicate = FilterPredicate::all(&ctx.days);
//! let subset = filter_days(&ctx.days, &predicate);
//!
//! if let Some(groups) = query::mean_total_by_season(&subset) {
//!     for g in groups {
//!         println!("{}: {:.0} rentals/day over {} days", g.group, g.mean_total, g.days);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod data;
pub mod error;
pub mod query;

pub use context::DataContext;
pub use data::filter::{filter_days, FilterPredicate};
pub use data::model::{
    DayRecord, DemandCluster, HourRecord, HourlyProfile, HourlyProfileRow, Month, Season,
    Weekday, WeatherSituation, Year,
};
pub use error::PipelineError;
