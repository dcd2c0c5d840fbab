use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, ApiResult};
use crate::models::{User, UserRole};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> ApiResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| ApiError::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(state.config.session_timeout_hours);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp: expiry.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalError(format!("Token encoding failed: {}", e)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is disabled".to_string()));
    }

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::InternalError(format!("Corrupt password hash: {}", e)))?;
    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let token = issue_token(&state, &user)?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.full_name.trim().is_empty() {
        return Err(ApiError::ValidationError("Full name is required".to_string()));
    }
    if !payload.email.contains('@') || payload.email.len() < 4 {
        return Err(ApiError::ValidationError("Invalid email address".to_string()));
    }
    if payload.password.len() < state.config.password_min_length {
        return Err(ApiError::ValidationError(format!(
            "Password must be at least {} characters",
            state.config.password_min_length
        )));
    }

    let exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&payload.email)
            .fetch_one(&state.db)
            .await?;
    if exists > 0 {
        return Err(ApiError::Conflict(
            "Email is already registered".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?
        .to_string();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, full_name, email, phone, password_hash, role, is_active)
        VALUES ($1, $2, $3, $4, $5, 'TENANT', true)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.full_name.trim())
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    let token = issue_token(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: user.into(),
        }),
    ))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<UserDto>> {
    let user_id = claims.user_id()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user_id = claims.user_id()?;

    if payload.new_password.len() < state.config.password_min_length {
        return Err(ApiError::ValidationError(format!(
            "Password must be at least {} characters",
            state.config.password_min_length
        )));
    }

    let current_hash: String =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(ApiError::NotFound)?;

    let parsed_hash = PasswordHash::new(&current_hash)
        .map_err(|e| ApiError::InternalError(format!("Corrupt password hash: {}", e)))?;
    Argon2::default()
        .verify_password(payload.current_password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let salt = SaltString::generate(&mut OsRng);
    let new_hash = Argon2::default()
        .hash_password(payload.new_password.as_bytes(), &salt)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?
        .to_string();

    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(&new_hash)
        .bind(user_id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Password changed successfully" })))
}

pub async fn logout() -> impl IntoResponse {
    // Stateless JWTs: the client discards its token
    Json(serde_json::json!({ "message": "Logged out successfully" }))
}
