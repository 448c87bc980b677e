use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;

use healthpal_core::users::{Identity, NewUser, User};

use crate::{auth::require_identity, error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
struct UserCreatedResponse {
    message: &'static str,
    user: User,
}

async fn register_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserCreatedResponse>)> {
    let Json(new_user) = payload?;
    let user = state.user_service.register_user(new_user).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "User registered successfully",
            user,
        }),
    ))
}

async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(&identity.user_id)?;
    Ok(Json(user))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(register_user))
        .route(
            "/users/me",
            get(current_user).route_layer(middleware::from_fn_with_state(state, require_identity)),
        )
}
