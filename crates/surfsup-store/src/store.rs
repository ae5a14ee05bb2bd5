//! Read-only access to the observation database.
//!
//! `ClimateStore` is a connection factory, not a connection. Every query
//! opens its own read-only connection and drops it before returning, so
//! concurrent requests never share SQLite state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use surfsup_core::{DatabaseConfig, DatabaseError};

use crate::error::{StoreError, StoreResult};
use crate::schema;
use crate::types::{
    ObservationDate, PrecipitationReading, StationActivity, TemperatureObservation,
    TemperatureStats,
};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Query service over the `measurement` and `station` tables.
#[derive(Debug, Clone)]
pub struct ClimateStore {
    path: Arc<PathBuf>,
    busy_timeout: Duration,
}

impl ClimateStore {
    /// Create a store reading the database at `path`.
    ///
    /// Nothing is opened until the first query.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Arc::new(path.as_ref().to_path_buf()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(&config.path).with_busy_timeout(Duration::from_millis(config.busy_timeout_ms))
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh read-only connection.
    ///
    /// The file is never created; a missing database is reported as
    /// unavailable rather than silently replaced by an empty one.
    fn connect(&self) -> StoreResult<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;

        let conn = Connection::open_with_flags(self.path.as_path(), flags).map_err(|e| {
            tracing::warn!("Failed to open {}: {}", self.path.display(), e);
            StoreError::from(e)
        })?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Run a blocking store operation on the blocking thread pool.
    ///
    /// The store is cloned into the task, so the caller's handle stays usable.
    pub async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&ClimateStore) -> StoreResult<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store)).await?
    }

    /// Check that the database has the tables and columns the queries need.
    pub fn verify_schema(&self) -> StoreResult<()> {
        let conn = self.connect()?;
        schema::verify(&conn)?;
        tracing::debug!("Schema verified for {}", self.path.display());
        Ok(())
    }

    /// Latest measurement date in the dataset, `None` when it is empty.
    pub fn latest_date(&self) -> StoreResult<Option<ObservationDate>> {
        let conn = self.connect()?;
        latest_date(&conn)
    }

    /// Precipitation for every measurement in the trailing 365-day window,
    /// ordered by date.
    pub fn list_precipitation(&self) -> StoreResult<Vec<PrecipitationReading>> {
        let conn = self.connect()?;
        let Some(start) = window_start(&conn)? else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            "SELECT date, prcp FROM measurement
             WHERE date >= ?1
             ORDER BY date ASC, station ASC",
        )?;
        let readings = stmt
            .query_map(params![start.as_sql()], |row| {
                Ok(PrecipitationReading {
                    date: row.get(0)?,
                    precipitation: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Precipitation since {}: {} rows", start, readings.len());
        Ok(readings)
    }

    /// Observed temperature for every measurement in the trailing 365-day
    /// window, ordered by date.
    pub fn list_temperature_observations(&self) -> StoreResult<Vec<TemperatureObservation>> {
        let conn = self.connect()?;
        let Some(start) = window_start(&conn)? else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            "SELECT date, tobs FROM measurement
             WHERE date >= ?1
             ORDER BY date ASC, station ASC",
        )?;
        let observations = stmt
            .query_map(params![start.as_sql()], |row| {
                Ok(TemperatureObservation {
                    date: row.get(0)?,
                    temperature_observed: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Temperature observations since {}: {} rows", start, observations.len());
        Ok(observations)
    }

    /// Measurement count per station, busiest first.
    pub fn list_stations(&self) -> StoreResult<Vec<StationActivity>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT station, COUNT(*) AS qty FROM measurement
             WHERE station IS NOT NULL
             GROUP BY station
             ORDER BY qty DESC, station ASC",
        )?;
        let stations = stmt
            .query_map([], |row| {
                Ok(StationActivity {
                    station_id: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Listed {} stations", stations.len());
        Ok(stations)
    }

    /// Min, average and max observed temperature between `start` and `end`,
    /// both inclusive.
    ///
    /// Without `end` the range runs to the latest date in the dataset. A
    /// range matching nothing (including `start > end`) yields empty stats.
    pub fn temperature_stats(
        &self,
        start: ObservationDate,
        end: Option<ObservationDate>,
    ) -> StoreResult<TemperatureStats> {
        let conn = self.connect()?;

        let end = match end {
            Some(end) => end,
            None => match latest_date(&conn)? {
                Some(latest) => latest,
                None => return Ok(TemperatureStats::default()),
            },
        };

        if start > end {
            return Ok(TemperatureStats::default());
        }

        let stats = conn.query_row(
            "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement
             WHERE date >= ?1 AND date <= ?2",
            params![start.as_sql(), end.as_sql()],
            |row| {
                Ok(TemperatureStats {
                    min: row.get(0)?,
                    avg: row.get(1)?,
                    max: row.get(2)?,
                })
            },
        )?;

        tracing::debug!("Temperature stats {}..={}: {:?}", start, end, stats);
        Ok(stats)
    }
}

fn latest_date(conn: &Connection) -> StoreResult<Option<ObservationDate>> {
    let latest: Option<String> = conn
        .query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))
        .optional()?
        .flatten();

    latest
        .map(|raw| {
            ObservationDate::parse("measurement.date", &raw).map_err(|_| {
                StoreError::Database(DatabaseError::Corruption(format!(
                    "latest measurement date '{}' is not YYYY-MM-DD",
                    raw
                )))
            })
        })
        .transpose()
}

fn window_start(conn: &Connection) -> StoreResult<Option<ObservationDate>> {
    let Some(latest) = latest_date(conn)? else {
        return Ok(None);
    };
    latest
        .window_start()
        .map(Some)
        .ok_or_else(|| {
            StoreError::Database(DatabaseError::Corruption(format!(
                "latest measurement date {} has no window start",
                latest
            )))
        })
}

#[cfg(test)]
mod tests;
