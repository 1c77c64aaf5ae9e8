pub mod error;
pub mod response;
pub mod v1;

use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::geo::{FixedGeocoder, Geocoder};
use crate::narrative::{GeminiNarrativeGenerator, NarrativeGenerator};

/// Shared per-request context: configuration plus the two collaborators.
/// Everything is immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub narrative: Arc<dyn NarrativeGenerator>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    /// Wire up the production collaborators from configuration.
    pub fn new(cfg: Config) -> Result<Self> {
        let narrative: Arc<dyn NarrativeGenerator> =
            Arc::new(GeminiNarrativeGenerator::new(cfg.narrative.clone())?);
        let geocoder: Arc<dyn Geocoder> = Arc::new(FixedGeocoder);
        Ok(Self {
            cfg,
            narrative,
            geocoder,
        })
    }

    /// Inject custom collaborators, mainly for tests.
    pub fn with_collaborators(
        cfg: Config,
        narrative: Arc<dyn NarrativeGenerator>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            cfg,
            narrative,
            geocoder,
        }
    }
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(v1::healthz))
        .nest("/api/v1", v1::router(state));

    if cfg.server.enable_cors {
        use tower_http::cors::AllowOrigin;
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::exact("http://localhost:5173".parse().unwrap()))
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}
