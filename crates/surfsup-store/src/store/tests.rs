#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::testing::{sample_fixture, sample_rows, Fixture, KANEOHE, WAIHEE, WAIKIKI};

fn date(value: &str) -> ObservationDate {
    ObservationDate::parse("date", value).unwrap()
}

#[test]
fn test_latest_date() {
    let fixture = sample_fixture().unwrap();
    assert_eq!(fixture.store().latest_date().unwrap(), Some(date("2017-08-23")));
}

#[test]
fn test_latest_date_empty_dataset() {
    let fixture = Fixture::new().unwrap();
    assert_eq!(fixture.store().latest_date().unwrap(), None);
}

#[test]
fn test_precipitation_window_is_inclusive() {
    let fixture = sample_fixture().unwrap();
    let readings = fixture.store().list_precipitation().unwrap();

    let first = readings.first().unwrap();
    let last = readings.last().unwrap();
    assert_eq!(first.date, "2016-08-23");
    assert_eq!(last.date, "2017-08-23");
    assert!(readings.iter().all(|r| r.date.as_str() >= "2016-08-23"));
    assert!(!readings.iter().any(|r| r.date == "2016-08-22"));
}

#[test]
fn test_precipitation_sorted_and_keeps_nulls() {
    let fixture = sample_fixture().unwrap();
    let readings = fixture.store().list_precipitation().unwrap();

    assert_eq!(readings.len(), 10);
    assert!(readings.windows(2).all(|w| w[0].date <= w[1].date));
    assert_eq!(readings.iter().filter(|r| r.precipitation.is_none()).count(), 2);
}

#[test]
fn test_precipitation_insertion_order_does_not_matter() {
    let fixture = Fixture::with_measurements(&[
        (WAIKIKI, "2017-03-01", Some(0.5), Some(70.0)),
        (WAIKIKI, "2016-12-01", Some(0.1), Some(68.0)),
        (KANEOHE, "2017-01-01", Some(0.2), Some(66.0)),
    ])
    .unwrap();

    let dates: Vec<String> = fixture
        .store()
        .list_precipitation()
        .unwrap()
        .into_iter()
        .map(|r| r.date)
        .collect();
    assert_eq!(dates, vec!["2016-12-01", "2017-01-01", "2017-03-01"]);
}

#[test]
fn test_listings_on_empty_dataset() {
    let fixture = Fixture::new().unwrap();
    let store = fixture.store();
    assert!(store.list_precipitation().unwrap().is_empty());
    assert!(store.list_temperature_observations().unwrap().is_empty());
    assert!(store.list_stations().unwrap().is_empty());
}

#[test]
fn test_temperature_observations_window() {
    let fixture = sample_fixture().unwrap();
    let observations = fixture.store().list_temperature_observations().unwrap();

    assert_eq!(observations.len(), 10);
    assert!(observations.iter().all(|o| o.date.as_str() >= "2016-08-23"));
    assert!(observations.windows(2).all(|w| w[0].date <= w[1].date));
    assert_eq!(observations.last().unwrap().date, "2017-08-23");
    assert!(observations.iter().any(|o| o.temperature_observed.is_none()));
}

#[test]
fn test_stations_ordered_by_count() {
    let fixture = sample_fixture().unwrap();
    let stations = fixture.store().list_stations().unwrap();

    let ids: Vec<&str> = stations.iter().map(|s| s.station_id.as_str()).collect();
    assert_eq!(ids, vec![WAIKIKI, KANEOHE, WAIHEE]);
    assert_eq!(stations[0].count, 6);
    assert!(stations.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn test_station_counts_sum_to_row_count() {
    let fixture = sample_fixture().unwrap();
    let total: i64 = fixture.store().list_stations().unwrap().iter().map(|s| s.count).sum();
    assert_eq!(total, sample_rows().len() as i64);
}

#[test]
fn test_station_ties_break_by_id() {
    let fixture = Fixture::with_measurements(&[
        (WAIHEE, "2017-01-01", None, Some(70.0)),
        (KANEOHE, "2017-01-01", None, Some(70.0)),
    ])
    .unwrap();

    let ids: Vec<String> = fixture
        .store()
        .list_stations()
        .unwrap()
        .into_iter()
        .map(|s| s.station_id)
        .collect();
    assert_eq!(ids, vec![KANEOHE.to_string(), WAIHEE.to_string()]);
}

#[test]
fn test_temperature_stats_january() {
    let fixture = sample_fixture().unwrap();
    let stats = fixture
        .store()
        .temperature_stats(date("2017-01-01"), Some(date("2017-01-31")))
        .unwrap();

    assert_eq!(stats.min, Some(62.0));
    assert_eq!(stats.max, Some(74.0));
    let avg = stats.avg.unwrap();
    assert!((avg - 68.666_666).abs() < 1e-4, "avg was {avg}");
}

#[test]
fn test_temperature_stats_open_ended() {
    let fixture = sample_fixture().unwrap();
    let stats = fixture.store().temperature_stats(date("2017-02-01"), None).unwrap();

    // 2017-02-01: 80, 2017-08-22: NULL, 2017-08-23: 81 and 82
    assert_eq!(stats.min, Some(80.0));
    assert_eq!(stats.max, Some(82.0));
    assert_eq!(stats.avg, Some(81.0));
}

#[test]
fn test_temperature_stats_reversed_range_is_empty() {
    let fixture = sample_fixture().unwrap();
    let stats = fixture
        .store()
        .temperature_stats(date("2017-01-31"), Some(date("2017-01-01")))
        .unwrap();
    assert!(stats.is_empty());
}

#[test]
fn test_temperature_stats_no_matching_rows() {
    let fixture = sample_fixture().unwrap();
    let stats = fixture
        .store()
        .temperature_stats(date("2012-01-01"), Some(date("2012-12-31")))
        .unwrap();
    assert!(stats.is_empty());
}

#[test]
fn test_temperature_stats_empty_dataset() {
    let fixture = Fixture::new().unwrap();
    let stats = fixture.store().temperature_stats(date("2017-01-01"), None).unwrap();
    assert!(stats.is_empty());
}

#[test]
fn test_temperature_stats_far_end_date_covers_dataset() {
    let fixture = sample_fixture().unwrap();
    let store = fixture.store();

    // Signed years never become a bound; the widest accepted end date sorts
    // after every stored date
    assert!(ObservationDate::parse("end_date", "+10000-01-01").is_err());

    let far = store
        .temperature_stats(date("2010-01-01"), Some(date("9999-12-31")))
        .unwrap();
    let open = store.temperature_stats(date("2010-01-01"), None).unwrap();
    assert!(!far.is_empty());
    assert_eq!(far, open);
}

#[test]
fn test_temperature_stats_full_range_matches_scan() {
    let fixture = sample_fixture().unwrap();
    let stats = fixture
        .store()
        .temperature_stats(date("2010-01-01"), Some(date("2017-08-23")))
        .unwrap();

    let temps: Vec<f64> = sample_rows().iter().filter_map(|r| r.3).collect();
    let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(stats.min, Some(min));
    assert_eq!(stats.max, Some(max));
}

#[test]
fn test_integer_temperatures_are_read_as_floats() {
    let fixture = Fixture::new().unwrap();
    let conn = Connection::open(fixture.path()).unwrap();
    conn.execute(
        "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, '2017-05-01', 0, 71)",
        params![WAIKIKI],
    )
    .unwrap();

    let stats = fixture.store().temperature_stats(date("2017-05-01"), None).unwrap();
    assert_eq!(stats.min, Some(71.0));
    assert_eq!(fixture.store().list_precipitation().unwrap()[0].precipitation, Some(0.0));
}

#[test]
fn test_missing_database_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let store = ClimateStore::new(dir.path().join("absent.sqlite"));

    let err = store.list_stations().unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {err:?}");
    // Opening read-only must not create the file
    assert!(!store.path().exists());
}

#[test]
fn test_verify_schema() {
    let fixture = Fixture::new().unwrap();
    fixture.store().verify_schema().unwrap();
}

#[test]
fn test_verify_schema_on_foreign_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.sqlite");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, content TEXT);")
        .unwrap();

    let err = ClimateStore::new(&path).verify_schema().unwrap_err();
    assert!(matches!(err, StoreError::Database(DatabaseError::SchemaMismatch(_))));
}

#[test]
fn test_malformed_latest_date_is_corruption() {
    let fixture = Fixture::with_measurements(&[(WAIKIKI, "23/08/2017", None, Some(70.0))]).unwrap();
    let err = fixture.store().list_precipitation().unwrap_err();
    assert!(matches!(err, StoreError::Database(DatabaseError::Corruption(_))));
}

#[test]
fn test_from_config_uses_timeout_and_path() {
    let config = DatabaseConfig {
        path: PathBuf::from("/tmp/hawaii.sqlite"),
        busy_timeout_ms: 250,
    };
    let store = ClimateStore::from_config(&config);
    assert_eq!(store.path(), Path::new("/tmp/hawaii.sqlite"));
    assert_eq!(store.busy_timeout, Duration::from_millis(250));
}

#[tokio::test]
async fn test_run_on_blocking_pool() {
    let fixture = sample_fixture().unwrap();
    let store = fixture.store();

    let (stations, stats) = tokio::join!(
        store.run(|s| s.list_stations()),
        store.run(|s| s.temperature_stats(date("2017-01-01"), Some(date("2017-01-31")))),
    );
    assert_eq!(stations.unwrap().len(), 3);
    assert_eq!(stats.unwrap().max, Some(74.0));
}
