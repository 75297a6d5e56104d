use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use kantei::{
    api::{create_router, AppState},
    predictor::PredictionService,
};
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:8080";

fn bundled_models() -> PredictionService {
    let service = PredictionService::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("models"));
    assert!(service.is_ready(), "bundled model artifacts should load");
    service
}

fn app(service: PredictionService) -> Router {
    create_router(AppState::new(service, 100), &[ORIGIN.to_string()])
}

fn setagaya() -> Value {
    json!({
        "building_area": 80.0,
        "land_area": 120.0,
        "building_age": 10,
        "ward_name": "世田谷区",
        "year": 2024,
        "quarter": 1
    })
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn root_reports_running() {
    let (status, body) = send(app(bundled_models()), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["message"], "Real Estate Appraisal API");
}

#[tokio::test]
async fn health_reports_loaded_model() {
    let (status, body) = send(app(bundled_models()), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model_info"]["feature_count"], 30);
    assert_eq!(body["model_info"]["model_type"], "LinearRegression");
    assert_eq!(body["model_info"]["scaler_type"], "StandardScaler");
    assert_eq!(body["model_info"]["features"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn unready_service_returns_503_everywhere() {
    let unready = || app(PredictionService::unready("Missing model files: models/model.json"));

    let (status, body) = send(unready(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Model not loaded");

    let (status, _) = send(unready(), Method::POST, "/predict", Some(setagaya())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(
        unready(),
        Method::POST,
        "/predict/batch",
        Some(json!([setagaya()])),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn predict_setagaya_example() {
    let (status, body) = send(
        app(bundled_models()),
        Method::POST,
        "/predict",
        Some(setagaya()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let price = body["predicted_price"].as_f64().unwrap();
    assert!(price >= 0.0);
    assert!(((price * 10.0).round() - price * 10.0).abs() < 1e-6);

    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.70..=0.95).contains(&confidence));

    let used = body["features_used"].as_object().unwrap();
    assert_eq!(used["ward_世田谷区"], 1.0);
    assert_eq!(used["building_area"], 80.0);
    assert_eq!(used["land_area"], 120.0);
    let wards: Vec<&String> = used.keys().filter(|k| k.starts_with("ward_")).collect();
    assert_eq!(wards, vec!["ward_世田谷区"]);
    assert!(used.values().all(|v| v.as_f64() != Some(0.0)));
}

#[tokio::test]
async fn predict_is_idempotent() {
    let service = bundled_models();
    let router = app(service);
    let (_, first) = send(router.clone(), Method::POST, "/predict", Some(setagaya())).await;
    let (_, second) = send(router, Method::POST, "/predict", Some(setagaya())).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn unseen_district_is_absorbed() {
    let mut unseen = setagaya();
    unseen["district"] = json!("世田谷区_99丁目");
    let (status, body) = send(app(bundled_models()), Method::POST, "/predict", Some(unseen)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["features_used"].get("district_encoded").is_none());
}

#[tokio::test]
async fn invalid_input_is_rejected_with_400() {
    let mut bad_ward = setagaya();
    bad_ward["ward_name"] = json!("無効区名");
    let (status, body) = send(app(bundled_models()), Method::POST, "/predict", Some(bad_ward)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
    assert!(body["detail"].as_str().unwrap().contains("Invalid ward name"));

    let mut bad_quarter = setagaya();
    bad_quarter["quarter"] = json!(7);
    let (status, _) = send(app(bundled_models()), Method::POST, "/predict", Some(bad_quarter)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_rejected_with_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(bundled_models()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_isolates_failures_by_index() {
    let mut bad = setagaya();
    bad["ward_name"] = json!("無効区名");
    let mut minato = setagaya();
    minato["ward_name"] = json!("港区");

    let (status, body) = send(
        app(bundled_models()),
        Method::POST,
        "/predict/batch",
        Some(json!([setagaya(), bad.clone(), minato])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_processed"], 3);
    assert_eq!(body["successful"], 2);
    assert_eq!(body["failed"], 1);

    let results = body["results"].as_array().unwrap();
    assert!(results[0].is_object());
    assert!(results[1].is_null());
    assert!(results[2].is_object());

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["index"], 1);
    assert_eq!(errors[0]["input"], bad);
}

#[tokio::test]
async fn batch_requires_an_array_within_the_limit() {
    let (status, _) = send(
        app(bundled_models()),
        Method::POST,
        "/predict/batch",
        Some(setagaya()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_many = Value::Array(vec![setagaya(); 101]);
    let (status, body) = send(
        app(bundled_models()),
        Method::POST,
        "/predict/batch",
        Some(too_many),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Maximum 100"));
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app(bundled_models()).oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        ORIGIN
    );
}
