use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bakery_ops::workflows::confirmation::{
    confirmation_router, ConfirmationScoreEngine, HistoryWindow,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_confirmation_routes(
    engine: Arc<ConfirmationScoreEngine>,
    window: HistoryWindow,
) -> axum::Router {
    confirmation_router(engine, window)
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
    use bakery_ops::workflows::confirmation::ScoringConfig;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        with_confirmation_routes(
            Arc::new(ConfirmationScoreEngine::new(ScoringConfig::default())),
            HistoryWindow::default(),
        )
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn health_route_is_mounted_next_to_scoring() {
        let response = router()
            .oneshot(
                axum::http::Request::get("/health")
                    .body(axum::body::Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn scoring_route_is_reachable() {
        let payload = json!({
            "today": "2025-09-10",
            "orders": [{ "client_id": "pdv-novo", "scheduled_date": "2025-09-12" }]
        });

        let response = router()
            .oneshot(
                axum::http::Request::post("/api/v1/confirmation/scores")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&payload).expect("serialize payload"),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(body["scores"][0]["key"], "pdv-novo");
        assert_eq!(body["scores"][0]["score"], 70);
    }
}
