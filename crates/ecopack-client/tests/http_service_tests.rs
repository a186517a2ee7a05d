//! HTTP prediction client against an in-process fixture server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use ecopack_client::config::check_endpoint;
use ecopack_client::{
    ClientConfig, HttpPredictionService, PredictRequest, PredictionController, PredictionError,
    PredictionService, PredictionStatus, Rating, RequirementInputs,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

type Captured = Arc<Mutex<Option<Value>>>;

async fn spawn_fixture(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture addr");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::warn!(target = "tests", ?err, "fixture server stopped");
        }
    });
    format!("http://{addr}")
}

fn scenario_body() -> Value {
    json!([
        {"material": "Recycled Cardboard", "predicted_cost": 2.1, "predicted_co2": 40, "suitability_score": 4.8},
        {"material": "Bioplastic", "predicted_cost": 3.9, "predicted_co2": 65, "suitability_score": 4.2}
    ])
}

async fn recording_predict(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    *captured.lock().unwrap() = Some(body);
    Json(scenario_body())
}

fn service_for(base_url: &str) -> HttpPredictionService {
    HttpPredictionService::from_config(&ClientConfig::default().with_base_url(base_url))
        .expect("valid config")
}

fn request() -> PredictRequest {
    PredictRequest::from(&RequirementInputs::new(7.0, 4.0, 9.0, 2.0))
}

#[tokio::test]
async fn test_predict_posts_integer_fields() {
    let captured: Captured = Arc::default();
    let router = Router::new()
        .route("/predict", post(recording_predict))
        .with_state(captured.clone());
    let base = spawn_fixture(router).await;

    let recs = service_for(&base).predict(&request()).await.unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].material, "Recycled Cardboard");
    assert_eq!(recs[1].predicted_co2, 65.0);

    let body = captured.lock().unwrap().clone().expect("request body captured");
    assert_eq!(body["weight_capacity_score"], json!(7));
    assert_eq!(body["product_strength_req"], json!(4));
    assert_eq!(body["barrier_score"], json!(9));
    assert_eq!(body["reuse_potential_score"], json!(2));
    assert!(body["weight_capacity_score"].is_u64());
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let router = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
    );
    let base = spawn_fixture(router).await;

    let err = service_for(&base).predict(&request()).await.unwrap_err();
    match err {
        PredictionError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_array_is_empty_result() {
    let router = Router::new().route("/predict", post(|| async { Json(json!([])) }));
    let base = spawn_fixture(router).await;

    let err = service_for(&base).predict(&request()).await.unwrap_err();
    assert!(matches!(err, PredictionError::EmptyResult));
}

#[tokio::test]
async fn test_non_list_body_is_decode_error() {
    let router = Router::new().route(
        "/predict",
        post(|| async { Json(json!({"error": "bad input"})) }),
    );
    let base = spawn_fixture(router).await;

    let err = service_for(&base).predict(&request()).await.unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let router = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(scenario_body())
        }),
    );
    let base = spawn_fixture(router).await;

    let mut config = ClientConfig::default().with_base_url(&base);
    config.request_timeout = Duration::from_millis(200);
    let service = HttpPredictionService::from_config(&config).unwrap();

    let err = service.predict(&request()).await.unwrap_err();
    assert!(
        matches!(err, PredictionError::Timeout(d) if d == Duration::from_millis(200)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service_for(&format!("http://{addr}"))
        .predict(&request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "network");
    assert!(err.is_request_failure());
}

#[tokio::test]
async fn test_health_check_reads_root_banner() {
    let router = Router::new().route(
        "/",
        get(|| async { "EcoPackAI AI Recommendation Backend Running!" }),
    );
    let base = spawn_fixture(router).await;

    assert!(check_endpoint(&base).await);
    assert!(check_endpoint(&format!("{base}/")).await);
}

#[tokio::test]
async fn test_controller_end_to_end() {
    let captured: Captured = Arc::default();
    let router = Router::new()
        .route("/predict", post(recording_predict))
        .with_state(captured);
    let base = spawn_fixture(router).await;

    let config = ClientConfig::default().with_base_url(&base);
    let service = HttpPredictionService::from_config(&config).unwrap();
    let mut controller = PredictionController::new(Arc::new(service), &config);
    controller.set_inputs(RequirementInputs::new(7.0, 4.0, 9.0, 2.0));

    assert_eq!(controller.submit().await, PredictionStatus::Success);
    assert_eq!(controller.selected().unwrap().material, "Recycled Cardboard");
    assert_eq!(controller.co2(), 40.0);
    assert_eq!(controller.cost(), 2.1);
    assert_eq!(controller.co2_rating(), Rating::Good);
    assert_eq!(controller.cost_rating(), Rating::Good);
}
