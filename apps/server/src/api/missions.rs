use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use healthpal_core::{
    missions::{MedicalMission, MissionRequest, NewMission, NewMissionRequest},
    users::{Identity, Role},
};

use crate::{
    auth::{authorize, require_identity},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Deserialize)]
struct MissionQuery {
    location: Option<String>,
}

#[derive(Serialize)]
struct MissionListResponse {
    missions: Vec<MedicalMission>,
}

#[derive(Serialize)]
struct MissionCreatedResponse {
    message: &'static str,
    mission: MedicalMission,
}

#[derive(Serialize)]
struct MissionRequestResponse {
    message: &'static str,
    request: MissionRequest,
}

async fn list_missions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MissionQuery>,
) -> ApiResult<Json<MissionListResponse>> {
    let missions = state
        .mission_service
        .list_missions(query.location.as_deref())?;
    Ok(Json(MissionListResponse { missions }))
}

async fn create_mission(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewMission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MissionCreatedResponse>)> {
    authorize(&identity, Role::Ngo)?;
    let Json(new_mission) = payload?;
    let mission = state
        .mission_service
        .create_mission(&identity, new_mission)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MissionCreatedResponse {
            message: "Mission created successfully",
            mission,
        }),
    ))
}

/// The body is optional; without one the request carries no notes.
async fn request_mission(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<NewMissionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MissionRequestResponse>)> {
    authorize(&identity, Role::Patient)?;
    let new_request = match payload {
        Ok(Json(new_request)) => new_request,
        Err(JsonRejection::MissingJsonContentType(_)) => NewMissionRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let request = state
        .mission_service
        .request_mission(&identity, &id, new_request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MissionRequestResponse {
            message: "Mission request submitted successfully",
            request,
        }),
    ))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth_layer = middleware::from_fn_with_state(state, require_identity);
    Router::new()
        .route(
            "/missions",
            get(list_missions).merge(post(create_mission).route_layer(auth_layer.clone())),
        )
        .route(
            "/missions/{id}/request",
            post(request_mission).route_layer(auth_layer),
        )
}
