//! JSON bodies returned by the API.
//!
//! Field names follow the published v1.0 contract (`Date`, `Tmin`, ...).

use serde::Serialize;
use surfsup_store::{PrecipitationReading, StationActivity, TemperatureObservation, TemperatureStats};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrecipitationEntry {
    pub date: String,
    pub precipitation: Option<f64>,
}

impl From<PrecipitationReading> for PrecipitationEntry {
    fn from(r: PrecipitationReading) -> Self {
        Self {
            date: r.date,
            precipitation: r.precipitation,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationEntry {
    pub station: String,
    pub count: i64,
}

impl From<StationActivity> for StationEntry {
    fn from(s: StationActivity) -> Self {
        Self {
            station: s.station_id,
            count: s.count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TobsEntry {
    pub date: String,
    pub tobs: Option<f64>,
}

impl From<TemperatureObservation> for TobsEntry {
    fn from(o: TemperatureObservation) -> Self {
        Self {
            date: o.date,
            tobs: o.temperature_observed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureSummary {
    pub tmin: Option<f64>,
    pub tavg: Option<f64>,
    pub tmax: Option<f64>,
}

impl From<TemperatureStats> for TemperatureSummary {
    fn from(s: TemperatureStats) -> Self {
        Self {
            tmin: s.min,
            tavg: s.avg,
            tmax: s.max,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
