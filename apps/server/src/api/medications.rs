use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Serialize;

use healthpal_core::{
    medications::{Medication, MedicationRequest, NewMedication, NewMedicationRequest},
    users::{Identity, Role},
};

use crate::{
    auth::{authorize_any, require_identity},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Serialize)]
struct MedicationListResponse {
    medications: Vec<Medication>,
}

#[derive(Serialize)]
struct MedicationCreatedResponse {
    message: &'static str,
    medication: Medication,
}

#[derive(Serialize)]
struct RequestResponse {
    message: &'static str,
    request: MedicationRequest,
}

#[derive(Serialize)]
struct FulfilResponse {
    message: &'static str,
    request: MedicationRequest,
    medication: Medication,
}

async fn list_available(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MedicationListResponse>> {
    let medications = state.medication_service.list_available()?;
    Ok(Json(MedicationListResponse { medications }))
}

async fn offer_item(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewMedication>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MedicationCreatedResponse>)> {
    authorize_any(&identity, &[Role::Ngo, Role::Donor, Role::Admin])?;
    let Json(new_medication) = payload?;
    let medication = state
        .medication_service
        .offer_item(&identity, new_medication)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MedicationCreatedResponse {
            message: "Medication listed successfully",
            medication,
        }),
    ))
}

async fn request_item(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewMedicationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RequestResponse>)> {
    let Json(new_request) = payload?;
    let request = state
        .medication_service
        .request_item(&identity, new_request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            message: "Medication request submitted successfully",
            request,
        }),
    ))
}

async fn fulfil_request(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<FulfilResponse>> {
    authorize_any(&identity, &[Role::Ngo, Role::Admin])?;
    let fulfilled = state
        .medication_service
        .fulfil_request(&identity, &id)
        .await?;
    Ok(Json(FulfilResponse {
        message: "Medication request fulfilled",
        request: fulfilled.request,
        medication: fulfilled.medication,
    }))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/medications", post(offer_item))
        .route("/medications/requests", post(request_item))
        .route("/medications/requests/{id}/fulfill", put(fulfil_request))
        .route_layer(middleware::from_fn_with_state(state, require_identity));
    Router::new()
        .route("/medications/available", get(list_available))
        .merge(protected)
}
