//! Integration tests for the HTTP API, driven through the router without a
//! live listener.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use mockall::mock;
use tower::util::ServiceExt;

use solar_quote_engine::api::{router, AppState};
use solar_quote_engine::config::Config;
use solar_quote_engine::domain::{EstimationConfig, EstimationResult, RoofGeometry};
use solar_quote_engine::geo::FixedGeocoder;
use solar_quote_engine::narrative::{NarrativeGenerator, ANALYSIS_FALLBACK};

mock! {
    Narrative {}

    #[async_trait::async_trait]
    impl NarrativeGenerator for Narrative {
        async fn analysis(
            &self,
            roof: &RoofGeometry,
            config: &EstimationConfig,
            result: &EstimationResult,
        ) -> anyhow::Result<String>;
    }
}

fn test_app(narrative: MockNarrative) -> axum::Router {
    let cfg = Config::default();
    let state = AppState::with_collaborators(cfg.clone(), Arc::new(narrative), Arc::new(FixedGeocoder));
    router(state, &cfg)
}

fn app_without_narrative() -> axum::Router {
    // Endpoints that never consult the generator; calling it fails the test.
    test_app(MockNarrative::new())
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_responds_ok() {
    let app = app_without_narrative();
    let resp = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn estimate_with_default_assumptions() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/estimate",
        serde_json::json!({ "roof": { "area_m2": 100.0, "orientation": "South" } }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert!(json.get("timestamp").is_some());

    let data = &json["data"];
    assert_eq!(data["panel_count"], 48);
    assert!((data["system_size_kw"].as_f64().unwrap() - 19.2).abs() < 1e-9);
    assert!((data["annual_production_kwh"].as_f64().unwrap() - 26_805.6).abs() < 1e-6);
    assert_eq!(data["roi_years"], 8.6);
}

#[tokio::test]
async fn estimate_zero_area_returns_all_zero() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/estimate",
        serde_json::json!({ "roof": { "area_m2": 0.0 } }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["panel_count"], 0);
    assert_eq!(data["total_cost"].as_f64().unwrap(), 0.0);
    assert_eq!(data["roi_years"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn estimate_rejects_negative_area() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/estimate",
        serde_json::json!({ "roof": { "area_m2": -10.0 } }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["error"], "ValidationError");
}

#[tokio::test]
async fn estimate_rejects_out_of_range_config() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/estimate",
        serde_json::json!({
            "roof": { "area_m2": 50.0 },
            "config": { "panel_efficiency": 1.5 }
        }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn estimate_honors_config_override() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/estimate",
        serde_json::json!({
            "roof": { "area_m2": 100.0, "orientation": "South" },
            "config": { "electricity_rate": 0.50 }
        }),
    );
    let resp = app.oneshot(req).await.unwrap();
    let data = body_json(resp).await["data"].clone();
    // Double the rate halves the payback period.
    assert_eq!(data["roi_years"], 4.3);
}

#[tokio::test]
async fn estimate_falls_back_to_service_assumptions() {
    let mut cfg = Config::default();
    cfg.assumptions.electricity_rate = 0.50;
    let state = AppState::with_collaborators(
        cfg.clone(),
        Arc::new(MockNarrative::new()),
        Arc::new(FixedGeocoder),
    );
    let app = router(state, &cfg);

    let req = post_json(
        "/api/v1/estimate",
        serde_json::json!({ "roof": { "area_m2": 100.0 } }),
    );
    let resp = app.oneshot(req).await.unwrap();
    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["roi_years"], 4.3);
}

#[tokio::test]
async fn report_includes_narrative_and_derivations() {
    let mut narrative = MockNarrative::new();
    narrative
        .expect_analysis()
        .times(1)
        .returning(|_, _, _| Ok("A very sunny outlook.".to_string()));
    let app = test_app(narrative);

    let req = post_json(
        "/api/v1/report",
        serde_json::json!({ "roof": { "area_m2": 100.0, "orientation": "South" } }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["analysis"], "A very sunny outlook.");
    assert_eq!(data["estimate"]["panel_count"], 48);
    assert!(data["quote_id"].as_str().is_some());
    assert!(data["generated_at"].as_str().is_some());

    let projections = data["projections"].as_array().unwrap();
    assert_eq!(projections.len(), 4);
    assert_eq!(projections[3]["year"], 20);

    assert!((data["breakdown"]["gross_cost"].as_f64().unwrap() - 57_600.0).abs() < 1e-9);
    assert!((data["breakdown"]["tax_credit"].as_f64().unwrap() - 17_280.0).abs() < 1e-6);
    assert_eq!(data["impact"]["tree_equivalent"], 670);
}

#[tokio::test]
async fn report_degrades_to_fallback_analysis() {
    let mut narrative = MockNarrative::new();
    narrative
        .expect_analysis()
        .times(1)
        .returning(|_, _, _| Err(anyhow::anyhow!("model endpoint down")));
    let app = test_app(narrative);

    let req = post_json(
        "/api/v1/report",
        serde_json::json!({ "roof": { "area_m2": 100.0 } }),
    );
    let resp = app.oneshot(req).await.unwrap();
    // The report still succeeds; only the prose is replaced.
    assert_eq!(resp.status(), StatusCode::OK);

    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["analysis"], ANALYSIS_FALLBACK);
    assert_eq!(data["estimate"]["panel_count"], 48);
}

#[tokio::test]
async fn roof_area_measures_drawn_polygon() {
    let app = app_without_narrative();
    // ~10 m × 10 m square near San Francisco.
    let req = post_json(
        "/api/v1/roof/area",
        serde_json::json!({
            "polygon": [
                { "lat": 37.7749, "lng": -122.4194 },
                { "lat": 37.7749, "lng": -122.41928632 },
                { "lat": 37.77498983, "lng": -122.41928632 },
                { "lat": 37.77498983, "lng": -122.4194 }
            ]
        }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let area = body_json(resp).await["data"]["area_m2"].as_f64().unwrap();
    assert!(area > 90.0 && area < 110.0, "got {area}");
}

#[tokio::test]
async fn roof_area_degenerate_polygon_is_zero() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/roof/area",
        serde_json::json!({
            "polygon": [
                { "lat": 37.7749, "lng": -122.4194 },
                { "lat": 37.775, "lng": -122.4194 }
            ]
        }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["area_m2"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn roof_area_rejects_invalid_coordinates() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/roof/area",
        serde_json::json!({
            "polygon": [
                { "lat": 95.0, "lng": 0.0 },
                { "lat": 0.0, "lng": 0.0 },
                { "lat": 0.0, "lng": 1.0 }
            ]
        }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn geocode_returns_stub_location() {
    let app = app_without_narrative();
    let req = post_json(
        "/api/v1/geocode",
        serde_json::json!({ "address": "1 Main St, Springfield" }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["lat"], 37.7749);
    assert_eq!(data["lng"], -122.4194);
    assert_eq!(data["address"], "1 Main St, Springfield");
}

#[tokio::test]
async fn geocode_rejects_blank_address() {
    let app = app_without_narrative();
    let req = post_json("/api/v1/geocode", serde_json::json!({ "address": "" }));
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "BadRequest");

    // Whitespace-only addresses are blank too.
    let app = app_without_narrative();
    let req = post_json("/api/v1/geocode", serde_json::json!({ "address": "   " }));
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wizard_steps_lists_the_flow() {
    let app = app_without_narrative();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/wizard/steps")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let steps = body_json(resp).await["data"].as_array().unwrap().clone();
    assert_eq!(steps.len(), 5);
    assert_eq!(steps[0]["id"], "welcome");
    assert_eq!(steps[0]["label"], "Start");
    assert_eq!(steps[2]["label"], "Roof Area");
    assert_eq!(steps[4]["id"], "results");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app_without_narrative();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/inverter")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
