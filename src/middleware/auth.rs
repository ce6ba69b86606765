use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth;
use crate::error::ApiError;
use crate::AppState;

/// Authenticated admin identity extracted from a bearer token.
///
/// Gates every mutating route (and the media listing): adding `AuthUser` to a
/// handler's arguments rejects the request with a uniform 401 before the
/// handler body runs. Read routes simply omit it.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).map_err(ApiError::unauthorized)?;

        let user_id = auth::verify_token(&state.config.jwt_secret, &token)
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser { user_id })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Authorization token required".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
