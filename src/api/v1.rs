use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{error::ApiError, response, response::ApiResponse, AppState},
    domain::{EstimationConfig, EstimationResult, LatLng, Location, RoofGeometry},
    estimator::compute_estimate,
    geo::polygon_area_m2,
    report::{build_report, QuoteReport},
    wizard::{step_metadata, StepMetadata},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/estimate", post(estimate))
        .route("/report", post(report))
        .route("/roof/area", post(roof_area))
        .route("/geocode", post(geocode))
        .route("/wizard/steps", get(wizard_steps))
        .with_state(state)
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

/// Roof plus optional assumption overrides. When `config` is omitted the
/// service defaults from `[assumptions]` apply.
#[derive(Debug, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(nested)]
    pub roof: RoofGeometry,
    #[validate(nested)]
    pub config: Option<EstimationConfig>,
}

impl EstimateRequest {
    fn resolved_config(&self, st: &AppState) -> EstimationConfig {
        self.config.unwrap_or(st.cfg.assumptions)
    }
}

pub async fn estimate(
    State(st): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<ApiResponse<EstimationResult>>, ApiError> {
    req.validate()?;
    let config = req.resolved_config(&st);
    let result = compute_estimate(&req.roof, &config);
    Ok(Json(response::success(result)))
}

pub async fn report(
    State(st): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<ApiResponse<QuoteReport>>, ApiError> {
    req.validate()?;
    let config = req.resolved_config(&st);

    tracing::info!(area_m2 = req.roof.area_m2, "Generating quote report");
    let report = build_report(&req.roof, &config, st.narrative.as_ref()).await;
    Ok(Json(response::success(report)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoofAreaRequest {
    #[validate(nested)]
    pub polygon: Vec<LatLng>,
}

#[derive(Debug, Serialize)]
pub struct RoofAreaResponse {
    pub area_m2: f64,
}

/// Geodesic area of a drawn perimeter. Degenerate paths (< 3 points) are
/// answered with zero, mirroring an undrawn roof.
pub async fn roof_area(
    Json(req): Json<RoofAreaRequest>,
) -> Result<Json<ApiResponse<RoofAreaResponse>>, ApiError> {
    req.validate()?;
    let area_m2 = polygon_area_m2(&req.polygon);
    Ok(Json(response::success(RoofAreaResponse { area_m2 })))
}

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

/// Address lookup through the geocoding collaborator. A blank address is a
/// client error; provider failures surface as 502.
pub async fn geocode(
    State(st): State<AppState>,
    Json(req): Json<GeocodeRequest>,
) -> Result<Json<ApiResponse<Location>>, ApiError> {
    if req.address.trim().is_empty() {
        return Err(ApiError::BadRequest("address must not be empty".to_string()));
    }
    let location = st
        .geocoder
        .geocode(&req.address)
        .await
        .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;
    Ok(Json(response::success(location)))
}

pub async fn wizard_steps() -> Json<ApiResponse<Vec<StepMetadata>>> {
    Json(response::success(step_metadata()))
}
