use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Serialize;

use healthpal_core::{
    consultations::{Consultation, ConsultationView, NewConsultation, StatusChange},
    users::{Identity, Role},
};

use crate::{
    auth::{authorize, require_identity},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Serialize)]
struct ConsultationListResponse {
    consultations: Vec<ConsultationView>,
}

#[derive(Serialize)]
struct ConsultationResponse {
    message: &'static str,
    consultation: Consultation,
}

async fn book_consultation(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewConsultation>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ConsultationResponse>)> {
    authorize(&identity, Role::Patient)?;
    let Json(new_consultation) = payload?;
    let consultation = state
        .consultation_service
        .book(&identity, new_consultation)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ConsultationResponse {
            message: "Consultation booked successfully",
            consultation,
        }),
    ))
}

async fn list_my_consultations(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<ConsultationListResponse>> {
    let consultations = state.consultation_service.list_mine(&identity)?;
    Ok(Json(ConsultationListResponse { consultations }))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<StatusChange>, JsonRejection>,
) -> ApiResult<Json<ConsultationResponse>> {
    let Json(change) = payload?;
    let consultation = state
        .consultation_service
        .update_status(&identity, &id, change)
        .await?;
    Ok(Json(ConsultationResponse {
        message: "Consultation updated successfully",
        consultation,
    }))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/consultations",
            get(list_my_consultations).post(book_consultation),
        )
        .route("/consultations/{id}/status", put(update_status))
        .route_layer(middleware::from_fn_with_state(state, require_identity))
}
