use axum::{
    extract::{Extension, Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use tracing::warn;
use uuid::Uuid;

use super::auth::Claims;
use super::{ApiError, ApiResult};
use crate::billing::{self, BillTotals, PayerRole};
use crate::models::bill::CreateBillRequest;
use crate::models::notification::NewNotification;
use crate::models::{Bill, BillStatus, Contract, LineItem, NotificationPriority};
use crate::notify;
use crate::AppState;

pub const CO_TENANT_PAYMENT_MESSAGE: &str =
    "Chỉ người đứng tên hợp đồng mới có thể thanh toán hóa đơn này";

pub(super) async fn load_bill_and_contract(
    state: &AppState,
    bill_id: Uuid,
) -> ApiResult<(Bill, Contract)> {
    let bill = sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = $1")
        .bind(bill_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
        .bind(bill.contract_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok((bill, contract))
}

/// Resolve the caller against the bill; co-tenants may view, only the
/// primary tenant may pay.
pub(super) fn require_payer(bill: &Bill, contract: &Contract, user_id: Uuid) -> ApiResult<()> {
    match billing::resolve_payer(bill, contract, user_id) {
        PayerRole::Primary => Ok(()),
        PayerRole::CoTenant => Err(ApiError::Forbidden(CO_TENANT_PAYMENT_MESSAGE.to_string())),
        PayerRole::Unrelated => Err(ApiError::NotFound),
    }
}

fn require_viewer(bill: &Bill, contract: &Contract, user_id: Uuid) -> ApiResult<PayerRole> {
    match billing::resolve_payer(bill, contract, user_id) {
        PayerRole::Unrelated => Err(ApiError::NotFound),
        role => Ok(role),
    }
}

#[derive(Debug, Serialize)]
pub struct MyBillsResponse {
    pub bills: Vec<Bill>,
    pub totals: BillTotals,
}

pub async fn my_bills(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<MyBillsResponse>> {
    let user_id = claims.user_id()?;

    let bills = sqlx::query_as::<_, Bill>(
        r#"
        SELECT b.* FROM bills b
        JOIN contracts c ON c.id = b.contract_id
        WHERE b.tenant_id = $1
           OR c.tenant_id = $1
           OR c.co_tenants @> $2::jsonb
        ORDER BY b.billing_date DESC, b.created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(serde_json::json!([{ "user_id": user_id }]))
    .fetch_all(&state.db)
    .await?;

    // Display aggregates, recomputed on every load
    let totals = BillTotals::compute(&bills);

    Ok(Json(MyBillsResponse { bills, totals }))
}

#[derive(Debug, Serialize)]
pub struct BillDetailResponse {
    #[serde(flatten)]
    pub bill: Bill,
    pub remaining_amount: i64,
    pub original_total: i64,
    /// Whether the caller is allowed to trigger a payment. False for
    /// co-tenants, who instead see the explanatory message.
    pub can_pay: bool,
    pub payment_blocked_reason: Option<String>,
}

pub async fn get_bill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(bill_id): Path<Uuid>,
) -> ApiResult<Json<BillDetailResponse>> {
    let user_id = claims.user_id()?;
    let (bill, contract) = load_bill_and_contract(&state, bill_id).await?;
    let role = require_viewer(&bill, &contract, user_id)?;

    let payable_status = !bill.status.is_paid() && bill.status != BillStatus::PendingCashConfirm;
    let can_pay = role == PayerRole::Primary && payable_status;
    let payment_blocked_reason = (role == PayerRole::CoTenant && payable_status)
        .then(|| CO_TENANT_PAYMENT_MESSAGE.to_string());

    Ok(Json(BillDetailResponse {
        remaining_amount: bill.remaining_amount(),
        original_total: bill.original_total(),
        can_pay,
        payment_blocked_reason,
        bill,
    }))
}

const ALLOWED_PROOF_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// `POST /bills/:id/pay-cash` — multipart with an `amount` field and a
/// mandatory `proof` image. Without the proof the request is rejected
/// before any state is touched.
pub async fn pay_cash(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(bill_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<Bill>> {
    let user_id = claims.user_id()?;
    let (bill, contract) = load_bill_and_contract(&state, bill_id).await?;
    require_payer(&bill, &contract, user_id)?;

    if !bill.status.can_transition_to(BillStatus::PendingCashConfirm) {
        return Err(ApiError::ValidationError(
            "Hóa đơn này không thể thanh toán".to_string(),
        ));
    }

    let mut amount: Option<i64> = None;
    let mut proof: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("amount") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid amount field: {}", e)))?;
                amount = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| ApiError::ValidationError("Invalid amount".to_string()))?,
                );
            }
            Some("proof") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !ALLOWED_PROOF_TYPES.contains(&content_type.as_str()) {
                    return Err(ApiError::ValidationError(
                        "Proof must be a JPEG, PNG, or WebP image".to_string(),
                    ));
                }
                let extension = content_type.strip_prefix("image/").unwrap_or("bin");
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid proof upload: {}", e)))?;
                proof = Some((data.to_vec(), extension.to_string()));
            }
            _ => {}
        }
    }

    let amount = amount
        .ok_or_else(|| ApiError::ValidationError("Amount is required".to_string()))?;
    // Mandatory proof-of-transfer image
    let (proof_data, extension) = proof.ok_or_else(|| {
        ApiError::ValidationError("Vui lòng đính kèm ảnh chứng từ chuyển khoản".to_string())
    })?;

    if amount != bill.remaining_amount() {
        return Err(ApiError::ValidationError(format!(
            "Cash payments must cover the remaining balance of {}",
            bill.remaining_amount()
        )));
    }

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| ApiError::InternalError(format!("Upload dir unavailable: {}", e)))?;
    let file_name = format!("{}-{}.{}", bill_id, Uuid::new_v4(), extension);
    let path = format!("{}/{}", state.config.upload_dir, file_name);
    tokio::fs::write(&path, &proof_data)
        .await
        .map_err(|e| ApiError::InternalError(format!("Failed to store proof: {}", e)))?;

    let bill = sqlx::query_as::<_, Bill>(
        r#"
        UPDATE bills
        SET status = 'PENDING_CASH_CONFIRM', proof_image_path = $1, updated_at = NOW()
        WHERE id = $2 AND status IN ('UNPAID', 'PARTIALLY_PAID')
        RETURNING *
        "#,
    )
    .bind(&path)
    .bind(bill_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::ValidationError("Hóa đơn này không thể thanh toán".to_string()))?;

    Ok(Json(bill))
}

#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<BillStatus>,
    pub contract_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ListBillsResponse {
    pub bills: Vec<Bill>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

pub async fn list_bills(
    State(state): State<AppState>,
    Query(params): Query<ListBillsQuery>,
) -> ApiResult<Json<ListBillsResponse>> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = (page - 1) * limit;

    let mut count_qb = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM bills WHERE 1=1");
    let mut qb = sqlx::QueryBuilder::new("SELECT * FROM bills WHERE 1=1");
    for builder in [&mut count_qb, &mut qb] {
        if let Some(status) = params.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(contract_id) = params.contract_id {
            builder.push(" AND contract_id = ").push_bind(contract_id);
        }
    }
    qb.push(" ORDER BY billing_date DESC LIMIT ")
        .push_bind(limit as i64)
        .push(" OFFSET ")
        .push_bind(offset as i64);

    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;
    let bills: Vec<Bill> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(ListBillsResponse {
        bills,
        total,
        page,
        limit,
    }))
}

/// Admin issues a bill (typically MONTHLY, with electricity readings in the
/// line items).
pub async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<CreateBillRequest>,
) -> ApiResult<Json<Bill>> {
    if payload.line_items.is_empty() {
        return Err(ApiError::ValidationError(
            "At least one line item is required".to_string(),
        ));
    }

    let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
        .bind(payload.contract_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let line_items: Vec<LineItem> = payload
        .line_items
        .into_iter()
        .map(|item| LineItem {
            name: item.name,
            unit_price: item.unit_price,
            line_total: item.line_total,
            electricity_reading: item.electricity_reading,
        })
        .collect();
    let amount_due: i64 = line_items.iter().map(|item| item.line_total).sum();
    if amount_due <= 0 {
        return Err(ApiError::ValidationError(
            "Bill total must be positive".to_string(),
        ));
    }

    let bill = sqlx::query_as::<_, Bill>(
        r#"
        INSERT INTO bills (id, contract_id, tenant_id, bill_type, status, amount_due,
                           amount_paid, billing_date, line_items)
        VALUES ($1, $2, $3, $4, 'UNPAID', $5, 0, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.contract_id)
    .bind(contract.tenant_id)
    .bind(payload.bill_type)
    .bind(amount_due)
    .bind(payload.billing_date)
    .bind(SqlJson(line_items))
    .fetch_one(&state.db)
    .await?;

    if let Some(tenant_id) = contract.tenant_id {
        if let Err(err) = notify::publish(
            &state.db,
            &state.hub,
            NewNotification {
                user_id: tenant_id,
                notification_type: "bill".to_string(),
                title: "Hóa đơn mới".to_string(),
                message: format!("Bạn có hóa đơn mới {} VND.", bill.amount_due),
                priority: NotificationPriority::High,
                action_url: Some("/invoices".to_string()),
            },
        )
        .await
        {
            warn!("Failed to deliver new-bill notification: {}", err);
        }
    }

    Ok(Json(bill))
}

/// Admin verifies the uploaded transfer proof and settles the bill.
pub async fn confirm_cash(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> ApiResult<Json<Bill>> {
    let mut tx = state.db.begin().await?;

    let mut bill = sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = $1 FOR UPDATE")
        .bind(bill_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound)?;

    if bill.status != BillStatus::PendingCashConfirm {
        return Err(ApiError::ValidationError(
            "Bill is not awaiting cash confirmation".to_string(),
        ));
    }

    let remaining = bill.remaining_amount();
    billing::apply_payment(&mut bill, remaining)
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let bill = sqlx::query_as::<_, Bill>(
        r#"
        UPDATE bills
        SET status = $1, amount_due = $2, amount_paid = $3, updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(bill.status)
    .bind(bill.amount_due)
    .bind(bill.amount_paid)
    .bind(bill_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    if let Some(tenant_id) = bill.tenant_id {
        if let Err(err) = notify::publish(
            &state.db,
            &state.hub,
            NewNotification {
                user_id: tenant_id,
                notification_type: "payment".to_string(),
                title: "Thanh toán đã được xác nhận".to_string(),
                message: "Thanh toán tiền mặt của bạn đã được xác nhận.".to_string(),
                priority: NotificationPriority::Medium,
                action_url: Some("/invoices".to_string()),
            },
        )
        .await
        {
            warn!("Failed to deliver cash-confirmation notification: {}", err);
        }
    }

    Ok(Json(bill))
}
