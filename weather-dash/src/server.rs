//! HTTP surface: the dashboard page and the per-cycle update endpoint.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use weather_dash_core::{
    Config, Controls, Error, Metric, ReadingsSource, RenderOutput, Trigger, dashboard,
    window::DEFAULT_HOURS,
};

use crate::page;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ReadingsSource>,
    pub config: Arc<Config>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/dashboard", get(update_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(state.config.dashboard.refresh_ms))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Raw query parameters. Numbers arrive as strings so a malformed value is
/// rejected as an invalid control with the usual JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    metric: Option<String>,
    hours: Option<String>,
    trigger: Option<String>,
    n: Option<String>,
}

impl DashboardQuery {
    fn controls(&self) -> Result<Controls, Error> {
        let metric = match self.metric.as_deref() {
            Some(raw) => Metric::try_from(raw)?,
            None => Metric::default(),
        };
        let hours = match self.hours.as_deref() {
            Some(raw) => parse_hours(raw)?,
            None => DEFAULT_HOURS,
        };
        Controls::new(metric, hours)
    }

    /// A missing or unknown trigger counts as a timer tick; the first load is `Tick(0)`.
    fn trigger(&self) -> Trigger {
        match self.trigger.as_deref() {
            Some("metric") => Trigger::MetricChanged,
            Some("hours") => Trigger::HoursChanged,
            _ => Trigger::Tick(self.tick_count()),
        }
    }

    /// Only used for logging, so a malformed count falls back to zero.
    fn tick_count(&self) -> u64 {
        self.n.as_deref().and_then(|n| n.trim().parse().ok()).unwrap_or(0)
    }
}

fn parse_hours(raw: &str) -> Result<u32, Error> {
    raw.trim().parse().map_err(|_| {
        Error::InvalidControl(format!("Hour count '{raw}' is not a whole number"))
    })
}

async fn update_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<RenderOutput>, ApiError> {
    let controls = query.controls()?;
    let trigger = query.trigger();

    let output = dashboard::run_cycle(state.source.as_ref(), trigger, controls).await?;
    Ok(Json(output))
}

/// Maps a failed cycle to an HTTP error response.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Network(_) | Error::Schema(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidControl(_) => StatusCode::BAD_REQUEST,
            Error::Computation(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Dashboard cycle failed: {}", self.0);
        } else {
            tracing::warn!("Rejected dashboard request: {}", self.0);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.0.code(),
                message: self.0.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use chrono::{Duration, NaiveDate};
    use serde_json::Value;
    use tower::ServiceExt;
    use weather_dash_core::{Reading, ReadingsTable, StaticSource};

    #[derive(Debug)]
    struct FailingSource;

    #[async_trait]
    impl ReadingsSource for FailingSource {
        async fn fetch(&self) -> weather_dash_core::Result<ReadingsTable> {
            Err(Error::Schema("missing field `hourly`".to_string()))
        }
    }

    fn state_with(source: Arc<dyn ReadingsSource>) -> AppState {
        AppState {
            source,
            config: Arc::new(Config::default()),
        }
    }

    fn sample_state() -> AppState {
        let start = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let table = ReadingsTable::new(
            (0..48)
                .map(|i| Reading {
                    time: start + Duration::hours(i),
                    temperature_c: 25.0 + i as f64 / 4.0,
                    humidity_pct: 80.0 - i as f64,
                    wind_speed_mps: 1.0 + (i % 5) as f64,
                })
                .collect(),
        );
        state_with(Arc::new(StaticSource::new(table)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn index_serves_page_with_refresh_interval() {
        let (status, body) = get(create_app(sample_state()), "/").await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Live Weather Dashboard"));
        assert!(html.contains("60000"));
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = get(create_app(sample_state()), "/health").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn dashboard_defaults_to_temperature_over_twelve_hours() {
        let (status, body) = get(create_app(sample_state()), "/api/dashboard").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["line"]["data"][0]["y"].as_array().unwrap().len(), 12);
        assert_eq!(json["bar"]["data"][0]["x"][0], "Temperature (°C)");
        assert_eq!(json["current_weather"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn dashboard_honours_controls() {
        let uri = "/api/dashboard?metric=wind_speed&hours=30&trigger=tick&n=4";
        let (status, body) = get(create_app(sample_state()), uri).await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["line"]["data"][0]["y"].as_array().unwrap().len(), 30);
        assert_eq!(json["summary"], "Latest Weather - Wind Speed (m/s): 3.0 m/s");
    }

    #[tokio::test]
    async fn out_of_range_hours_is_bad_request() {
        let (status, body) = get(create_app(sample_state()), "/api/dashboard?hours=500").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_CONTROL");
    }

    #[tokio::test]
    async fn unknown_metric_is_bad_request() {
        let (status, _) =
            get(create_app(sample_state()), "/api/dashboard?metric=pressure").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fetch_failure_is_bad_gateway() {
        let app = create_app(state_with(Arc::new(FailingSource)));
        let (status, body) = get(app, "/api/dashboard").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "SCHEMA_ERROR");
    }

    #[tokio::test]
    async fn malformed_hours_is_json_bad_request() {
        for raw in ["abc", "-3", "2.5", ""] {
            let uri = format!("/api/dashboard?hours={raw}");
            let (status, body) = get(create_app(sample_state()), &uri).await;
            let json: Value = serde_json::from_slice(&body).unwrap();

            assert_eq!(status, StatusCode::BAD_REQUEST, "hours={raw}");
            assert_eq!(json["error"]["code"], "INVALID_CONTROL", "hours={raw}");
            assert!(json["error"]["message"].as_str().unwrap().contains("Hour count"));
        }
    }

    #[tokio::test]
    async fn malformed_tick_count_still_renders() {
        let (status, _) =
            get(create_app(sample_state()), "/api/dashboard?trigger=tick&n=soon").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn query_trigger_mapping() {
        let q = DashboardQuery {
            trigger: Some("tick".to_string()),
            n: Some("7".to_string()),
            ..Default::default()
        };
        assert_eq!(q.trigger(), Trigger::Tick(7));
        assert_eq!(DashboardQuery::default().trigger(), Trigger::Tick(0));

        let q = DashboardQuery { trigger: Some("hours".to_string()), ..Default::default() };
        assert_eq!(q.trigger(), Trigger::HoursChanged);
    }
}
