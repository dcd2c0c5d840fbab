use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::{ApiError, ApiResult};
use crate::models::room::{CreateRoomRequest, UpdateRoomRequest};
use crate::models::{Room, RoomStatus};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListRoomsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub district: Option<String>,
    pub floor: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Serialize)]
pub struct ListRoomsResponse {
    pub rooms: Vec<Room>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

async fn list_rooms_filtered(
    state: &AppState,
    params: ListRoomsQuery,
    public_only: bool,
) -> ApiResult<ListRoomsResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = (page - 1) * limit;

    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM rooms WHERE 1=1");
    let mut qb = QueryBuilder::new("SELECT * FROM rooms WHERE 1=1");
    for builder in [&mut count_qb, &mut qb] {
        if public_only {
            // The public listing never shows rooms pulled for maintenance
            builder.push(" AND status <> 'MAINTENANCE'");
        }
        if let Some(district) = &params.district {
            builder.push(" AND district = ").push_bind(district.clone());
        }
        if let Some(floor) = params.floor {
            builder.push(" AND floor = ").push_bind(floor);
        }
        if let Some(min_price) = params.min_price {
            builder.push(" AND price_per_month >= ").push_bind(min_price);
        }
        if let Some(max_price) = params.max_price {
            builder.push(" AND price_per_month <= ").push_bind(max_price);
        }
        if let Some(status) = params.status {
            builder.push(" AND status = ").push_bind(status);
        }
    }
    qb.push(" ORDER BY room_number ASC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset as i64);

    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;
    let rooms: Vec<Room> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(ListRoomsResponse {
        rooms,
        total,
        page,
        limit,
        pages: ((total as f64) / (limit as f64)).ceil() as u32,
    })
}

pub async fn list_public_rooms(
    State(state): State<AppState>,
    Query(params): Query<ListRoomsQuery>,
) -> ApiResult<Json<ListRoomsResponse>> {
    Ok(Json(list_rooms_filtered(&state, params, true).await?))
}

pub async fn get_public_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> ApiResult<Json<Room>> {
    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
        .bind(room_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(room))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

/// `GET /search?keyword=` — keyword match over room number, type, and
/// district of the public listing.
pub async fn search_rooms(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Room>>> {
    let keyword = params.keyword.trim();
    if keyword.is_empty() {
        return Ok(Json(vec![]));
    }
    let pattern = format!("%{}%", keyword);

    let rooms = sqlx::query_as::<_, Room>(
        r#"
        SELECT * FROM rooms
        WHERE status <> 'MAINTENANCE'
          AND (room_number ILIKE $1 OR room_type ILIKE $1 OR district ILIKE $1)
        ORDER BY room_number ASC
        LIMIT 50
        "#,
    )
    .bind(&pattern)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rooms))
}

pub async fn list_rooms_admin(
    State(state): State<AppState>,
    Query(params): Query<ListRoomsQuery>,
) -> ApiResult<Json<ListRoomsResponse>> {
    Ok(Json(list_rooms_filtered(&state, params, false).await?))
}

pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomRequest>,
) -> ApiResult<Json<Room>> {
    if payload.room_number.trim().is_empty() {
        return Err(ApiError::ValidationError("Room number is required".to_string()));
    }
    if payload.price_per_month <= 0 {
        return Err(ApiError::ValidationError(
            "Monthly price must be positive".to_string(),
        ));
    }

    let room = sqlx::query_as::<_, Room>(
        r#"
        INSERT INTO rooms (id, room_number, room_type, price_per_month, area_m2, floor,
                           district, status, utilities, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'AVAILABLE', $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.room_number.trim())
    .bind(&payload.room_type)
    .bind(payload.price_per_month)
    .bind(payload.area_m2)
    .bind(payload.floor)
    .bind(&payload.district)
    .bind(SqlJson(payload.utilities.unwrap_or_default()))
    .bind(&payload.description)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if e.to_string().contains("duplicate key") {
            ApiError::ValidationError("Room number already exists".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;

    Ok(Json(room))
}

pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> ApiResult<Json<Room>> {
    get_public_room(State(state), Path(room_id)).await
}

pub async fn update_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    Json(payload): Json<UpdateRoomRequest>,
) -> ApiResult<Json<Room>> {
    let room = sqlx::query_as::<_, Room>(
        r#"
        UPDATE rooms SET
            room_type = COALESCE($1, room_type),
            price_per_month = COALESCE($2, price_per_month),
            area_m2 = COALESCE($3, area_m2),
            floor = COALESCE($4, floor),
            district = COALESCE($5, district),
            status = COALESCE($6, status),
            utilities = COALESCE($7, utilities),
            description = COALESCE($8, description),
            updated_at = NOW()
        WHERE id = $9
        RETURNING *
        "#,
    )
    .bind(&payload.room_type)
    .bind(payload.price_per_month)
    .bind(payload.area_m2)
    .bind(payload.floor)
    .bind(&payload.district)
    .bind(payload.status)
    .bind(payload.utilities.map(SqlJson))
    .bind(&payload.description)
    .bind(room_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(room))
}

pub async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
        .bind(room_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    if room.status == RoomStatus::Occupied {
        return Err(ApiError::ValidationError(
            "Occupied rooms cannot be deleted".to_string(),
        ));
    }

    sqlx::query("DELETE FROM rooms WHERE id = $1")
        .bind(room_id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Room deleted" })))
}
