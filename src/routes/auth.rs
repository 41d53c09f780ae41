use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::middleware::{AuthUser, BearerClaims, OptionalAuth};
use crate::auth::{Role, jwt, password};
use crate::entities::{api_token, user};
use crate::error::AppError;
use crate::services::activity::{Action, Activity, EntityKind};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the auth routes: `/register`, `/login`, `/logout`, `/user`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: user::Model,
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Sign a token for `user_model` and persist its `jti` so it can be revoked.
async fn issue_token(state: &AppState, user_model: &user::Model) -> Result<String, AppError> {
    let issued = jwt::issue_token(user_model.id, &user_model.role, &state.config)?;
    let now = Utc::now().fixed_offset();

    api_token::ActiveModel {
        id: Set(issued.jti),
        user_id: Set(user_model.id),
        expires_at: Set(issued.expires_at.fixed_offset()),
        revoked_at: Set(None),
        created_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(issued.token)
}

/// Role granted at registration: self-service accounts may only pick `user` or
/// `team_manager`; anything higher needs an admin to create the account.
fn granted_role(requested: Option<&str>, registrar: Option<&user::Model>) -> Result<Role, AppError> {
    let Some(requested) = requested else {
        return Ok(Role::User);
    };
    let role: Role = requested.parse().map_err(AppError::Validation)?;

    let registrar_is_admin = registrar.is_some_and(|u| u.role().satisfies(Role::Admin));
    if role.is_self_assignable() || registrar_is_admin {
        Ok(role)
    } else {
        Ok(Role::User)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn register(
    State(state): State<AppState>,
    OptionalAuth(registrar): OptionalAuth,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let name = body.name.trim().to_string();
    let email = body.email.trim().to_lowercase();

    password::validate_name(&name).map_err(AppError::Validation)?;
    password::validate_email(&email).map_err(AppError::Validation)?;
    password::validate_password(&body.password).map_err(AppError::Validation)?;
    if body.password != body.password_confirmation {
        return Err(AppError::Validation(
            "Password confirmation does not match.".to_string(),
        ));
    }
    let role = granted_role(body.role.as_deref(), registrar.as_ref())?;

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered.".to_string()));
    }

    let password_hash = password::hash_password(&body.password)?;
    let now = Utc::now().fixed_offset();

    let user_model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    let token = issue_token(&state, &user_model).await?;

    tracing::info!(user_id = %user_model.id, role = %role, "User registered");

    Activity::new(
        &user_model,
        Action::Registered,
        EntityKind::User,
        user_model.id,
        format!("User {} registered", user_model.name),
    )
    .after_values(json!({
        "name": user_model.name,
        "email": user_model.email,
        "role": user_model.role,
    }))
    .record(&state.db)
    .await;

    let response = AuthResponse {
        user: user_model,
        access_token: token,
        token_type: "Bearer",
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = body.email.trim().to_lowercase();
    password::validate_email(&email).map_err(AppError::Validation)?;

    let user_model = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid login credentials.".to_string()))?;

    if !password::verify_password(&body.password, &user_model.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid login credentials.".to_string(),
        ));
    }

    let token = issue_token(&state, &user_model).await?;

    Activity::new(
        &user_model,
        Action::LoggedIn,
        EntityKind::User,
        user_model.id,
        format!("User {} logged in", user_model.name),
    )
    .record(&state.db)
    .await;

    Ok(Json(AuthResponse {
        user: user_model,
        access_token: token,
        token_type: "Bearer",
    }))
}

/// Revoke the token that authenticated this request.
async fn logout(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    claims: BearerClaims,
) -> Result<Json<MessageResponse>, AppError> {
    let token_id = claims.token_id()?;

    let token_record = api_token::Entity::find_by_id(token_id)
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    if let Some(record) = token_record {
        let mut active_token: api_token::ActiveModel = record.into();
        active_token.revoked_at = Set(Some(Utc::now().fixed_offset()));
        active_token
            .update(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    }

    Activity::new(
        &user_model,
        Action::LoggedOut,
        EntityKind::User,
        user_model.id,
        format!("User {} logged out", user_model.name),
    )
    .record(&state.db)
    .await;

    Ok(Json(MessageResponse {
        message: "Successfully logged out.".to_string(),
    }))
}

async fn current_user(AuthUser(user_model): AuthUser) -> Json<user::Model> {
    Json(user_model)
}
