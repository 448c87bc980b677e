use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use healthpal_core::{
    alerts::{HealthAlert, NewHealthAlert},
    users::{Identity, Role},
};

use crate::{
    auth::{authorize, require_identity},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Deserialize)]
struct AlertQuery {
    region: Option<String>,
}

#[derive(Serialize)]
struct AlertListResponse {
    alerts: Vec<HealthAlert>,
}

#[derive(Serialize)]
struct AlertCreatedResponse {
    message: &'static str,
    alert: HealthAlert,
}

async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AlertQuery>,
) -> ApiResult<Json<AlertListResponse>> {
    let alerts = state.alert_service.list_alerts(query.region.as_deref())?;
    Ok(Json(AlertListResponse { alerts }))
}

async fn create_alert(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewHealthAlert>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AlertCreatedResponse>)> {
    authorize(&identity, Role::Admin)?;
    let Json(new_alert) = payload?;
    let alert = state.alert_service.create_alert(&identity, new_alert).await?;
    Ok((
        StatusCode::CREATED,
        Json(AlertCreatedResponse {
            message: "Health alert published successfully",
            alert,
        }),
    ))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth_layer = middleware::from_fn_with_state(state, require_identity);
    Router::new().route(
        "/alerts",
        get(list_alerts).merge(post(create_alert).route_layer(auth_layer)),
    )
}
