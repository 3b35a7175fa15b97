//! Bearer-token authentication extractor.
//!
//! Extracts the token from `Authorization: Bearer <token>` and resolves
//! it to an active user through the token authenticator. Handlers take a
//! `CurrentUser` argument; extraction failing short-circuits with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parley_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated acting user. Extracting this validates the token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;

        match state.auth.authenticate(&token).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(AppError::Unauthorized(
                "Invalid or expired access token".to_string(),
            )),
            Err(e) => Err(AppError::Internal(format!("authentication failed: {e}"))),
        }
    }
}

/// Extract the bearer token from request headers.
fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Err(AppError::Unauthorized(
            "Missing access token. Provide it via 'Authorization: Bearer <token>'.".to_string(),
        ));
    };

    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized(
            "Authorization header must be 'Bearer <token>'".to_string(),
        )),
    }
}
