use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use healthpal_core::users::{Identity, Role};

use crate::error::ApiError;
use crate::main_lib::AppState;

/// Verifies bearer tokens minted by the identity provider.
///
/// Tokens are never issued here; the ledger only trusts `sub` and `role`
/// from a token whose signature and expiry check out.
pub struct AuthManager {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

/// Claims carried by a caller's bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

impl AuthManager {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("Rejected bearer token: {:?}", err.kind());
                AuthError::Unauthorized
            })?;

        if claims.sub.trim().is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let role: Role = claims.role.parse().map_err(|_| AuthError::Unauthorized)?;
        Ok(Identity::new(claims.sub, role))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    match BASE64.decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => Ok(bytes),
        _ if trimmed.len() == 32 => Ok(trimmed.as_bytes().to_vec()),
        _ => anyhow::bail!("JWT secret must be 32 bytes, base64 encoded or as ASCII"),
    }
}

/// Rejects requests without a valid bearer token and attaches the caller's
/// [`Identity`] to the request extensions.
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let identity = state.auth.validate_token(token)?;
    tracing::debug!(user_id = %identity.user_id, role = %identity.role, "Authenticated request");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Capability check for role-restricted operations.
pub fn authorize(identity: &Identity, role: Role) -> Result<(), ApiError> {
    if identity.has_role(role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "This action requires the {} role",
            role
        )))
    }
}

/// Capability check for operations open to several roles.
pub fn authorize_any(identity: &Identity, roles: &[Role]) -> Result<(), ApiError> {
    if roles.contains(&identity.role) {
        return Ok(());
    }
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    Err(ApiError::Forbidden(format!(
        "This action requires one of the roles: {}",
        names.join(", ")
    )))
}
