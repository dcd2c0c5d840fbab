use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::auth::{Claims, UserDto};
use super::{ApiError, ApiResult};
use crate::models::user::{CreateUserRequest, UpdateUserRequest};
use crate::models::{User, UserRole};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserDto>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersQuery>,
) -> ApiResult<Json<ListUsersResponse>> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100); // Max 100 per page
    let offset = (page - 1) * limit;

    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
    let mut qb = QueryBuilder::new("SELECT * FROM users WHERE 1=1");
    for builder in [&mut count_qb, &mut qb] {
        if let Some(role) = params.role {
            builder.push(" AND role = ").push_bind(role);
        }
        if let Some(search) = &params.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (full_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR phone ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset as i64);

    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;
    let users: Vec<User> = qb.build_query_as().fetch_all(&state.db).await?;

    let pages = ((total as f64) / (limit as f64)).ceil() as u32;

    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(UserDto::from).collect(),
        total,
        page,
        limit,
        pages,
    }))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    if payload.full_name.trim().is_empty() || payload.email.is_empty() || payload.password.is_empty()
    {
        return Err(ApiError::ValidationError(
            "Full name, email, and password are required".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?
        .to_string();

    let role = payload.role.unwrap_or(UserRole::Tenant);

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, full_name, email, phone, password_hash, role, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, true)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.full_name.trim())
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if e.to_string().contains("duplicate key") {
            ApiError::ValidationError("Email is already registered".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;

    Ok(Json(user.into()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserDto>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    let target = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    // STAFF may manage tenants only; role changes are ADMIN territory
    if claims.role == UserRole::Staff
        && (target.role != UserRole::Tenant || payload.role.is_some())
    {
        return Err(ApiError::Forbidden(
            "Staff accounts cannot modify back-office users or roles".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            full_name = COALESCE($1, full_name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            role = COALESCE($4, role),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.role)
    .bind(payload.is_active)
    .bind(user_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if claims.user_id()? == user_id {
        return Err(ApiError::ValidationError(
            "You cannot delete your own account".to_string(),
        ));
    }

    // Tenants with an active contract must be checked out first
    let active_contracts: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM contracts WHERE tenant_id = $1 AND status = 'ACTIVE'",
    )
    .bind(user_id)
    .fetch_one(&state.db)
    .await?;
    if active_contracts > 0 {
        return Err(ApiError::ValidationError(
            "User still holds an active contract".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}
