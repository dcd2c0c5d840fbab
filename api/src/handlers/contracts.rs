use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json as SqlJson;
use tracing::warn;
use uuid::Uuid;

use super::auth::Claims;
use super::{ApiError, ApiResult};
use crate::models::contract::CheckinRequest;
use crate::models::notification::NewNotification;
use crate::models::{
    Bill, Contract, ContractStatus, LineItem, NotificationPriority, Room, RoomStatus,
};
use crate::notify;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListContractsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<ContractStatus>,
}

#[derive(Debug, Serialize)]
pub struct ListContractsResponse {
    pub contracts: Vec<Contract>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// Check-in: create the contract, flip the room to OCCUPIED, and issue the
/// initial contract bill, all in one transaction.
pub async fn checkin(
    State(state): State<AppState>,
    Json(payload): Json<CheckinRequest>,
) -> ApiResult<(StatusCode, Json<Contract>)> {
    if payload.tenant_id.is_none() && payload.tenant_snapshot.is_none() {
        return Err(ApiError::ValidationError(
            "Either a tenant account or a tenant snapshot is required".to_string(),
        ));
    }
    if payload.monthly_rent <= 0 || payload.deposit < 0 {
        return Err(ApiError::ValidationError(
            "Rent must be positive and deposit non-negative".to_string(),
        ));
    }

    let mut tx = state.db.begin().await?;

    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1 FOR UPDATE")
        .bind(payload.room_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound)?;

    if room.status != RoomStatus::Available {
        return Err(ApiError::ValidationError(format!(
            "Room {} is not available",
            room.room_number
        )));
    }

    let contract = sqlx::query_as::<_, Contract>(
        r#"
        INSERT INTO contracts (id, room_id, tenant_id, tenant_snapshot, co_tenants,
                               start_date, end_date, deposit, monthly_rent, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'ACTIVE')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.room_id)
    .bind(payload.tenant_id)
    .bind(payload.tenant_snapshot.map(SqlJson))
    .bind(SqlJson(payload.co_tenants.unwrap_or_default()))
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.deposit)
    .bind(payload.monthly_rent)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE rooms SET status = 'OCCUPIED', updated_at = NOW() WHERE id = $1")
        .bind(payload.room_id)
        .execute(&mut *tx)
        .await?;

    // Initial contract bill: deposit plus the first month of rent
    let line_items = vec![
        LineItem {
            name: "Tiền cọc".to_string(),
            unit_price: payload.deposit,
            line_total: payload.deposit,
            electricity_reading: None,
        },
        LineItem {
            name: "Tiền thuê tháng đầu".to_string(),
            unit_price: payload.monthly_rent,
            line_total: payload.monthly_rent,
            electricity_reading: None,
        },
    ];
    let amount_due: i64 = line_items.iter().map(|item| item.line_total).sum();

    sqlx::query_as::<_, Bill>(
        r#"
        INSERT INTO bills (id, contract_id, tenant_id, bill_type, status, amount_due,
                           amount_paid, billing_date, line_items)
        VALUES ($1, $2, $3, 'CONTRACT', 'UNPAID', $4, 0, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(contract.id)
    .bind(payload.tenant_id)
    .bind(amount_due)
    .bind(payload.start_date)
    .bind(SqlJson(line_items))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    if let Some(tenant_id) = payload.tenant_id {
        if let Err(err) = notify::publish(
            &state.db,
            &state.hub,
            NewNotification {
                user_id: tenant_id,
                notification_type: "contract".to_string(),
                title: "Hợp đồng mới".to_string(),
                message: format!("Bạn đã nhận phòng {}.", room.room_number),
                priority: NotificationPriority::Medium,
                action_url: Some("/invoices".to_string()),
            },
        )
        .await
        {
            warn!("Failed to deliver check-in notification: {}", err);
        }
    }

    Ok((StatusCode::CREATED, Json(contract)))
}

/// Contracts where the caller is the primary tenant or appears as a
/// co-tenant.
pub async fn my_contracts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<Contract>>> {
    let user_id = claims.user_id()?;

    let contracts = sqlx::query_as::<_, Contract>(
        r#"
        SELECT * FROM contracts
        WHERE tenant_id = $1 OR co_tenants @> $2::jsonb
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(json!([{ "user_id": user_id }]))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(contracts))
}

pub async fn list_contracts(
    State(state): State<AppState>,
    Query(params): Query<ListContractsQuery>,
) -> ApiResult<Json<ListContractsResponse>> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = (page - 1) * limit;

    let mut count_qb = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM contracts WHERE 1=1");
    let mut qb = sqlx::QueryBuilder::new("SELECT * FROM contracts WHERE 1=1");
    for builder in [&mut count_qb, &mut qb] {
        if let Some(status) = params.status {
            builder.push(" AND status = ").push_bind(status);
        }
    }
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset as i64);

    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;
    let contracts: Vec<Contract> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(ListContractsResponse {
        contracts,
        total,
        page,
        limit,
    }))
}

pub async fn get_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> ApiResult<Json<Contract>> {
    let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
        .bind(contract_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(contract))
}

async fn close_contract(
    state: &AppState,
    contract_id: Uuid,
    next: ContractStatus,
) -> ApiResult<Contract> {
    let mut tx = state.db.begin().await?;

    let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1 FOR UPDATE")
        .bind(contract_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound)?;

    if contract.status != ContractStatus::Active {
        return Err(ApiError::ValidationError(
            "Only active contracts can be closed".to_string(),
        ));
    }

    let contract = sqlx::query_as::<_, Contract>(
        "UPDATE contracts SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(next)
    .bind(contract_id)
    .fetch_one(&mut *tx)
    .await?;

    // The room goes back on the market
    sqlx::query("UPDATE rooms SET status = 'AVAILABLE', updated_at = NOW() WHERE id = $1")
        .bind(contract.room_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(contract)
}

pub async fn end_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> ApiResult<Json<Contract>> {
    Ok(Json(
        close_contract(&state, contract_id, ContractStatus::Ended).await?,
    ))
}

pub async fn cancel_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> ApiResult<Json<Contract>> {
    Ok(Json(
        close_contract(&state, contract_id, ContractStatus::Canceled).await?,
    ))
}
