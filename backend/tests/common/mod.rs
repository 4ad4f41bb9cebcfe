//! Shared helpers for backend integration tests

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use axum::{body::Body, http::Request, routing::get, Json, Router};
use serde_json::{json, Value};
use shared::{GpsCoordinates, TreeAsset};
use tower::ServiceExt;
use tree_risk_backend::{
    create_app,
    external::WeatherClient,
    services::{AssetService, WeatherService},
    AppState, Config,
};

/// Start a server on an ephemeral loopback port and return its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A typical Open-Meteo `current` payload
pub fn open_meteo_body(wind_speed_mph: f64, direction: f64, code: i32) -> Value {
    json!({
        "latitude": 53.18,
        "longitude": -2.9,
        "current_units": {"wind_speed_10m": "mp/h"},
        "current": {
            "time": "2026-01-13T09:00",
            "interval": 900,
            "temperature_2m": 6.5,
            "wind_speed_10m": wind_speed_mph,
            "wind_direction_10m": direction,
            "weathercode": code
        }
    })
}

/// Fake provider that answers every forecast request with `body` and counts calls
pub async fn spawn_provider(body: Value) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let app = Router::new().route(
        "/forecast",
        get(move || {
            let body = body.clone();
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(body)
            }
        }),
    );
    (spawn_server(app).await, calls)
}

/// Weather service pointed at `base_url`
pub fn weather_service(base_url: &str, timeout: Duration) -> WeatherService {
    let client = WeatherClient::new(base_url, timeout).unwrap();
    WeatherService::new(client, GpsCoordinates::new(53.19, -2.89))
}

pub fn app_state(weather: WeatherService, trees: Vec<TreeAsset>) -> AppState {
    AppState {
        config: Arc::new(Config::default()),
        weather,
        assets: AssetService::with_trees(trees),
    }
}

/// Send one request through the full router and decode the JSON reply
pub async fn send(state: &AppState, request: Request<Body>) -> (axum::http::StatusCode, Value) {
    let response = create_app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
