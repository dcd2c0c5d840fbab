use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utility {
    pub name: String,
    pub condition: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub room_number: String,
    pub room_type: String,
    pub price_per_month: i64,
    pub area_m2: f64,
    pub floor: i32,
    pub district: String,
    pub status: RoomStatus,
    pub utilities: Json<Vec<Utility>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub room_number: String,
    pub room_type: String,
    pub price_per_month: i64,
    pub area_m2: f64,
    pub floor: i32,
    pub district: String,
    pub utilities: Option<Vec<Utility>>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoomRequest {
    pub room_type: Option<String>,
    pub price_per_month: Option<i64>,
    pub area_m2: Option<f64>,
    pub floor: Option<i32>,
    pub district: Option<String>,
    pub status: Option<RoomStatus>,
    pub utilities: Option<Vec<Utility>>,
    pub description: Option<String>,
}
