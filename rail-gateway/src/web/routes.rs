//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    middleware,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::domain::StationCode;
use crate::rtt::{ServiceDetail, StationSearch};

use super::cors::cors;
use super::error::AppError;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/services/:station", get(services_at_station))
        .route("/services/:station/to/:to_station", get(services_between))
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Services calling at a station, with the station's location metadata.
async fn services_at_station(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> Result<Json<StationSearch>, AppError> {
    let station = StationCode::parse_normalized(&station)?;

    let search = state.aggregator.lookup_by_station(&station).await?;

    Ok(Json(search))
}

/// Full itineraries of today's services between two stations.
async fn services_between(
    State(state): State<AppState>,
    Path((station, to_station)): Path<(String, String)>,
) -> Result<Json<Vec<ServiceDetail>>, AppError> {
    let origin = StationCode::parse_normalized(&station)?;
    let destination = StationCode::parse_normalized(&to_station)?;

    let details = state
        .aggregator
        .lookup_by_route(&origin, &destination)
        .await?;

    Ok(Json(details))
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "no such endpoint".to_string(),
    }
}
