/// Data layer: typed records, loading/decoding, and filtering.
///
/// Flow:
/// ```text
///  day.csv / hour.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + decode codes + derive metrics → records
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────────┐
///   │ DayRecord / HourRecord │  immutable collections
///   └───────────────────────┘
///        │                │
///        ▼                ▼
///   ┌──────────┐   ┌───────────────┐
///   │  filter   │   │ HourlyProfile  │  24-row (hour × day-type) pivot
///   └──────────┘   └───────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
