//! Seeded observation databases for tests.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rusqlite::{params, Connection};
use tempfile::TempDir;

use crate::store::ClimateStore;

/// Same layout as the published Hawaii climate database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS station (
    id INTEGER PRIMARY KEY,
    station TEXT,
    name TEXT,
    latitude FLOAT,
    longitude FLOAT,
    elevation FLOAT
);

CREATE TABLE IF NOT EXISTS measurement (
    id INTEGER PRIMARY KEY,
    station TEXT,
    date TEXT,
    prcp FLOAT,
    tobs FLOAT
);
"#;

pub const WAIKIKI: &str = "USC00519397";
pub const KANEOHE: &str = "USC00513117";
pub const WAIHEE: &str = "USC00519281";

const STATIONS: [(&str, &str, f64, f64, f64); 3] = [
    (WAIKIKI, "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
    (KANEOHE, "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
    (WAIHEE, "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
];

/// A throwaway database file with the station table populated.
///
/// The file lives as long as the fixture.
pub struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

impl Fixture {
    /// Create a database with stations but no measurements.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("hawaii.sqlite");

        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        for (station, name, latitude, longitude, elevation) in STATIONS {
            conn.execute(
                "INSERT INTO station (station, name, latitude, longitude, elevation) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![station, name, latitude, longitude, elevation],
            )?;
        }

        Ok(Self { _dir: dir, path })
    }

    /// Create a database seeded with `(station, date, prcp, tobs)` rows.
    pub fn with_measurements(rows: &[(&str, &str, Option<f64>, Option<f64>)]) -> Result<Self> {
        let fixture = Self::new()?;
        fixture.insert_measurements(rows)?;
        Ok(fixture)
    }

    pub fn insert_measurements(&self, rows: &[(&str, &str, Option<f64>, Option<f64>)]) -> Result<()> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (station, date, prcp, tobs) in rows {
                stmt.execute(params![station, date, prcp, tobs])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A store reading this fixture's file.
    pub fn store(&self) -> ClimateStore {
        ClimateStore::new(&self.path)
    }
}

/// Rows spanning the end of the dataset window and a fully known January.
///
/// Latest date is 2017-08-23, so the trailing window is
/// `[2016-08-23, 2017-08-23]`. `2016-08-22` sits one day outside it.
pub fn sample_rows() -> Vec<(&'static str, &'static str, Option<f64>, Option<f64>)> {
    vec![
        (WAIKIKI, "2010-01-01", Some(0.08), Some(65.0)),
        (WAIKIKI, "2016-08-22", Some(0.40), Some(79.0)),
        (WAIKIKI, "2016-08-23", Some(0.00), Some(81.0)),
        (KANEOHE, "2016-08-23", Some(0.15), Some(76.0)),
        (WAIHEE, "2016-08-23", None, Some(77.0)),
        (WAIKIKI, "2017-01-01", Some(0.00), Some(62.0)),
        (KANEOHE, "2017-01-15", Some(0.29), Some(70.0)),
        (WAIHEE, "2017-01-31", Some(0.03), Some(74.0)),
        (WAIKIKI, "2017-02-01", Some(0.00), Some(80.0)),
        (KANEOHE, "2017-08-22", None, None),
        (WAIKIKI, "2017-08-23", Some(0.00), Some(81.0)),
        (WAIHEE, "2017-08-23", Some(0.08), Some(82.0)),
    ]
}

/// Fixture seeded with [`sample_rows`].
pub fn sample_fixture() -> Result<Fixture> {
    Fixture::with_measurements(&sample_rows())
}
