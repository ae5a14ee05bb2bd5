//! Request handlers.
//!
//! Handlers never reject: store and validation failures are turned into
//! JSON error replies here so a failing fixed route cannot fall through to
//! the `<start_date>` route.

use std::convert::Infallible;

use serde::Serialize;
use surfsup_core::AppError;
use surfsup_store::{ClimateStore, ObservationDate, StoreError};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use crate::responses::{
    ErrorBody, PrecipitationEntry, StationEntry, TemperatureSummary, TobsEntry,
};

const USAGE_HTML: &str = r#"<h1>Surfs Up API</h1>
<h2>Version 1.0</h2>
<hr>
<h4>Available routes:</h4>
<ul>
    <li>/api/v1.0/precipitation</li>
    <ul>
        <li>Returns last 12 months of precipitation data</li>
    </ul>
    <br>
    <li>/api/v1.0/stations</li>
    <ul>
        <li>Returns all available stations, and how many data points they contributed</li>
    </ul>
    <br>
    <li>/api/v1.0/tobs</li>
    <ul>
        <li>Returns last 12 months of temperature data</li>
    </ul>
    <br>
    <li>/api/v1.0/start_date</li>
    <ul>
        <li>Returns minimum, average, and the max temperature for all dates greater than and equal to the start date</li>
    </ul>
    <br>
    <li>/api/v1.0/start_date/end_date</li>
    <ul>
        <li>Returns minimum, average, and the max temperature for all dates between the start and end date</li>
    </ul>
</ul>
<hr>
<h3>Please note that dates have to be written in the format YYYY-MM-DD.</h3>"#;

pub async fn home() -> Result<Response, Infallible> {
    Ok(warp::reply::html(USAGE_HTML).into_response())
}

pub async fn precipitation(store: ClimateStore) -> Result<Response, Infallible> {
    let result = store.run(|s| s.list_precipitation()).await.map(|readings| {
        readings.into_iter().map(PrecipitationEntry::from).collect::<Vec<_>>()
    });
    Ok(respond(result))
}

pub async fn stations(store: ClimateStore) -> Result<Response, Infallible> {
    let result = store
        .run(|s| s.list_stations())
        .await
        .map(|stations| stations.into_iter().map(StationEntry::from).collect::<Vec<_>>());
    Ok(respond(result))
}

pub async fn tobs(store: ClimateStore) -> Result<Response, Infallible> {
    let result = store
        .run(|s| s.list_temperature_observations())
        .await
        .map(|observations| observations.into_iter().map(TobsEntry::from).collect::<Vec<_>>());
    Ok(respond(result))
}

/// Temperature summary from `start` through `end`, or through the latest
/// recorded date when `end` is absent.
///
/// Both dates are validated before the store is touched, with the same
/// policy for the one- and two-date routes.
pub async fn temperature_stats(
    start: String,
    end: Option<String>,
    store: ClimateStore,
) -> Result<Response, Infallible> {
    let dates = parse_range(&start, end.as_deref());
    let result = match dates {
        Ok((start, end)) => store
            .run(move |s| s.temperature_stats(start, end))
            .await
            .map(TemperatureSummary::from),
        Err(e) => Err(e),
    };
    Ok(respond(result))
}

fn parse_range(
    start: &str,
    end: Option<&str>,
) -> Result<(ObservationDate, Option<ObservationDate>), StoreError> {
    let start = ObservationDate::parse("start_date", start)?;
    let end = end.map(|e| ObservationDate::parse("end_date", e)).transpose()?;
    Ok((start, end))
}

fn respond<T: Serialize>(result: Result<T, StoreError>) -> Response {
    match result {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(e) => error_reply(e.into()),
    }
}

/// HTTP status for an application error.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::Database(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_reply(err: AppError) -> Response {
    let status = status_for(&err);

    if err.is_client_error() {
        tracing::debug!("Rejected request: {}", err);
    } else {
        tracing::error!("Request failed: {}", err);
    }

    json_error(status, err.user_message())
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}
