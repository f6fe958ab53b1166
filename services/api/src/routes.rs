use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use jobport::board::{board_router, BoardService, BoardStore, NotificationDispatcher};
use serde_json::json;
use std::sync::Arc;

/// Board routes plus the operational endpoints every deployment expects.
pub(crate) fn with_board_routes<S, N>(service: Arc<BoardService<S, N>>) -> axum::Router
where
    S: BoardStore + 'static,
    N: NotificationDispatcher + 'static,
{
    board_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn state_with_readiness(ready: bool) -> AppState {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(handle),
        }
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_startup_flag() {
        let state = state_with_readiness(false);

        let initializing = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(initializing.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let ready = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_prometheus_text() {
        let state = state_with_readiness(true);

        let response = metrics_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("content type set");
        assert_eq!(content_type, "text/plain; version=0.0.4");
    }
}
