use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::auth::{Role, jwt};
use crate::entities::{api_token, user};
use crate::error::AppError;
use crate::state::AppState;

/// Verified claims of the `Authorization: Bearer <token>` header.
///
/// Only checks the signature and expiry. Use [`AuthUser`] to also require the token
/// to be live in the `api_token` table.
#[derive(Debug)]
pub struct BearerClaims(pub jwt::Claims);

impl BearerClaims {
    /// The token's `jti` as a UUID.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the claim is not a UUID.
    pub fn token_id(&self) -> Result<Uuid, AppError> {
        self.0
            .jti
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token identifier.".to_string()))
    }
}

impl FromRequestParts<AppState> for BearerClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header.".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format.".to_string())
        })?;

        let claims = jwt::validate_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token.".to_string()))?;

        Ok(Self(claims))
    }
}

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Use as an extractor in handler parameters to require authentication:
/// ```ignore
/// async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = BearerClaims::from_request_parts(parts, state).await?;
        let token_id = claims.token_id()?;

        let user_id: Uuid = claims
            .0
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token subject.".to_string()))?;

        // Tokens are only honoured while their row exists and is neither revoked nor expired
        let token_row = api_token::Entity::find_by_id(token_id)
            .one(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .ok_or_else(|| AppError::Unauthorized("Token has been revoked.".to_string()))?;

        if token_row.user_id != user_id
            || token_row.revoked_at.is_some()
            || token_row.expires_at <= Utc::now().fixed_offset()
        {
            return Err(AppError::Unauthorized("Token has been revoked.".to_string()));
        }

        let user_model = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .ok_or_else(|| AppError::Unauthorized("User not found.".to_string()))?;

        Ok(Self(user_model))
    }
}

/// Like [`AuthUser`], but yields `None` instead of rejecting when no valid token is sent.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<user::Model>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(user_model)) => Ok(Self(Some(user_model))),
            Err(AppError::Internal(err)) => Err(AppError::Internal(err)),
            Err(_) => Ok(Self(None)),
        }
    }
}

/// Requires the authenticated user to have the `"admin"` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_model) = AuthUser::from_request_parts(parts, state).await?;

        if !user_model.role().satisfies(Role::Admin) {
            return Err(AppError::Forbidden("Admin role required.".to_string()));
        }

        Ok(Self(user_model))
    }
}
