use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use healthpal_core::{
    donations::{Donation, NewDonation},
    errors::ValidationError,
    transparency::TransparencyReport,
    treatments::{NewTreatment, Treatment, TreatmentPublic},
    users::{Identity, Role},
};

use crate::{
    auth::{authorize, require_identity},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Serialize)]
struct TreatmentListResponse {
    treatments: Vec<TreatmentPublic>,
}

#[derive(Serialize)]
struct TreatmentCreatedResponse {
    message: &'static str,
    treatment: Treatment,
}

/// Donation request body. Fields are optional so that a missing field is
/// reported as a validation error rather than a JSON shape error.
#[derive(Deserialize)]
struct DonationRequest {
    treatment_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "rust_decimal::serde::arbitrary_precision_option::deserialize"
    )]
    amount: Option<Decimal>,
    receipt_url: Option<String>,
}

impl TryFrom<DonationRequest> for NewDonation {
    type Error = ValidationError;

    fn try_from(request: DonationRequest) -> Result<Self, Self::Error> {
        Ok(NewDonation {
            treatment_id: request
                .treatment_id
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| ValidationError::MissingField("treatment_id".to_string()))?,
            amount: request
                .amount
                .ok_or_else(|| ValidationError::MissingField("amount".to_string()))?,
            receipt_url: request.receipt_url,
        })
    }
}

#[derive(Serialize)]
struct DonationCreatedResponse {
    message: &'static str,
    donation: Donation,
    treatment: Treatment,
}

async fn list_treatments(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TreatmentListResponse>> {
    let treatments = state.treatment_service.list_public_treatments()?;
    Ok(Json(TreatmentListResponse { treatments }))
}

async fn create_treatment(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewTreatment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TreatmentCreatedResponse>)> {
    authorize(&identity, Role::Patient)?;
    let Json(new_treatment) = payload?;
    let treatment = state
        .treatment_service
        .create_treatment(&identity.user_id, new_treatment)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TreatmentCreatedResponse {
            message: "Treatment created successfully",
            treatment,
        }),
    ))
}

async fn donate(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<DonationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DonationCreatedResponse>)> {
    authorize(&identity, Role::Donor)?;
    let Json(request) = payload?;
    let new_donation =
        NewDonation::try_from(request).map_err(healthpal_core::Error::from)?;
    let receipt = state
        .donation_service
        .donate(&identity.user_id, new_donation)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DonationCreatedResponse {
            message: "Donation recorded successfully",
            donation: receipt.donation,
            treatment: receipt.treatment,
        }),
    ))
}

async fn transparency_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransparencyReport>> {
    let report = state.transparency_service.transparency_report(&id)?;
    Ok(Json(report))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth_layer = middleware::from_fn_with_state(state, require_identity);
    Router::new()
        .route(
            "/treatments",
            get(list_treatments).merge(post(create_treatment).route_layer(auth_layer)),
        )
        .route("/treatments/{id}/transparency", get(transparency_report))
}

/// The donation route. Mounted outside the request timeout: once a donation
/// job is running its commit cannot be cancelled, so the client waits for
/// the real outcome instead of a 408.
pub fn donation_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new().route(
        "/treatments/donations",
        post(donate).route_layer(middleware::from_fn_with_state(state, require_identity)),
    )
}
