use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Serialize, Serializer};
use surfsup_core::ValidationError;

/// The only date layout the observation database uses.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the trailing window used by the listing queries.
pub const WINDOW_DAYS: u64 = 365;

/// A calendar date as stored in `measurement.date`.
///
/// Stored dates are `YYYY-MM-DD` text, and SQLite compares them as strings.
/// That order matches chronological order only for the canonical layout, so
/// every date handed to SQL goes through [`ObservationDate::as_sql`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationDate(NaiveDate);

impl ObservationDate {
    /// Parse a caller-supplied date.
    ///
    /// `field` names the parameter in the resulting error. The year must be
    /// exactly four unsigned digits; chrono's `%Y` alone also takes signed
    /// and short years, which would not compare correctly as text.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::invalid_date(field, value);

        match value.split_once('-') {
            Some((year, _)) if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) => {}
            _ => return Err(invalid()),
        }

        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Canonical `YYYY-MM-DD` text, safe for lexicographic comparison.
    pub fn as_sql(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// The date `days` calendar days earlier, if representable.
    pub fn days_before(&self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }

    /// First day of the trailing window ending on this date (inclusive).
    pub fn window_start(&self) -> Option<Self> {
        self.days_before(WINDOW_DAYS)
    }
}

impl fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for ObservationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One day's precipitation at one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

/// One day's observed temperature at one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureObservation {
    pub date: String,
    pub temperature_observed: Option<f64>,
}

/// Number of measurements a station contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationActivity {
    pub station_id: String,
    pub count: i64,
}

/// Aggregate over observed temperatures.
///
/// Every field is `None` when no rows matched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }
}
