use std::convert::Infallible;

use surfsup_store::ClimateStore;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::handlers;

/// All v1.0 routes plus the landing page.
///
/// The fixed `precipitation`, `stations` and `tobs` routes are tried before
/// the `<start_date>` route so they are never read as dates.
pub fn routes(
    store: ClimateStore,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let home = warp::path::end().and(warp::get()).and_then(handlers::home);

    let precipitation = warp::path!("api" / "v1.0" / "precipitation")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::precipitation);

    let stations = warp::path!("api" / "v1.0" / "stations")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::stations);

    let tobs = warp::path!("api" / "v1.0" / "tobs")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::tobs);

    let start_end = warp::path!("api" / "v1.0" / String / String)
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(|start: String, end: String, store: ClimateStore| {
            handlers::temperature_stats(start, Some(end), store)
        });

    let start_only = warp::path!("api" / "v1.0" / String)
        .and(warp::get())
        .and(with_store(store))
        .and_then(|start: String, store: ClimateStore| {
            handlers::temperature_stats(start, None, store)
        });

    home.or(precipitation)
        .or(stations)
        .or(tobs)
        .or(start_end)
        .or(start_only)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_store(
    store: ClimateStore,
) -> impl Filter<Extract = (ClimateStore,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

/// Only routing failures reach here; handlers answer their own errors.
async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let reply = if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        handlers::json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.is_not_found() {
        handlers::json_error(StatusCode::NOT_FOUND, "Not found")
    } else {
        tracing::warn!("Unhandled rejection: {:?}", err);
        handlers::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };
    Ok(reply)
}
