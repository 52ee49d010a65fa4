use std::path::Path;
use std::sync::{Mutex, OnceLock};

use log::info;

use crate::data::loader::{load_day_records, load_hour_records};
use crate::data::model::{DayRecord, HourRecord, HourlyProfile};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// DataContext – everything the query layer reads
// ---------------------------------------------------------------------------

/// The loaded, decoded, derived dataset. Built once from the two source
/// tables and immutable afterwards; the query layer borrows it.
///
/// The hourly profile is computed here over the FULL hour-level table and is
/// never re-filtered by a user selection: the hourly shape is treated as a
/// stable structural pattern, while the day-level aggregates follow the
/// current filter.
#[derive(Debug)]
pub struct DataContext {
    pub days: Vec<DayRecord>,
    pub hours: Vec<HourRecord>,
    pub hourly_profile: HourlyProfile,
}

impl DataContext {
    /// Load both tables and derive the hourly profile. The file paths are
    /// caller-supplied configuration. Any load error aborts construction;
    /// no partial context is ever produced.
    pub fn load(day_path: &Path, hour_path: &Path) -> Result<Self, PipelineError> {
        let days = load_day_records(day_path)?;
        let hours = load_hour_records(hour_path)?;
        let hourly_profile = HourlyProfile::from_hour_records(&hours);
        info!(
            "data context ready: {} days, {} hour records",
            days.len(),
            hours.len()
        );
        Ok(DataContext {
            days,
            hours,
            hourly_profile,
        })
    }
}

// ---------------------------------------------------------------------------
// Process-wide memoized context
// ---------------------------------------------------------------------------

static SHARED: OnceLock<DataContext> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// The process-wide context, loaded on first call and reused afterwards.
///
/// Input files are assumed static for the process lifetime, so later calls
/// return the cached context and ignore the paths. The init mutex is the
/// run-once barrier: concurrent first callers load the data exactly once.
/// A failed load leaves the cache unset, so a later call may retry.
pub fn shared(day_path: &Path, hour_path: &Path) -> Result<&'static DataContext, PipelineError> {
    if let Some(ctx) = SHARED.get() {
        return Ok(ctx);
    }

    let _guard = INIT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(ctx) = SHARED.get() {
        return Ok(ctx);
    }

    let ctx = DataContext::load(day_path, hour_path)?;
    Ok(SHARED.get_or_init(|| ctx))
}
