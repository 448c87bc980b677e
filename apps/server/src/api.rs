use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};

mod alerts;
mod consultations;
mod medications;
mod mental_health;
mod missions;
mod treatments;
mod users;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Ready once a pooled connection can answer a query.
pub async fn readyz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    let pool = state.pool.clone();
    match tokio::task::spawn_blocking(move || healthpal_storage_sqlite::ping(&pool)).await {
        Ok(Ok(())) => (StatusCode::OK, "ok"),
        Ok(Err(e)) => {
            tracing::warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
        Err(e) => {
            tracing::warn!("Readiness check panicked: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse().with_context(|| format!("Invalid CORS origin '{}'", o)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        CorsLayer::new().allow_origin(origins)
    };
    let cors = cors.allow_methods(Any).allow_headers(Any);

    // `layer` only wraps routes added before it, so the donation route
    // merged afterwards is not subject to the timeout.
    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(users::router(state.clone()))
        .merge(treatments::router(state.clone()))
        .merge(consultations::router(state.clone()))
        .merge(medications::router(state.clone()))
        .merge(alerts::router(state.clone()))
        .merge(mental_health::router(state.clone()))
        .merge(missions::router(state.clone()))
        .layer(TimeoutLayer::new(config.request_timeout))
        .merge(treatments::donation_router(state.clone()));

    Ok(Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http()))
}
