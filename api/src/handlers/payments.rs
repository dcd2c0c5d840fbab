use axum::{
    extract::{Extension, Path, Query, State},
    response::Redirect,
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

use super::auth::Claims;
use super::bills::{load_bill_and_contract, require_payer};
use super::{ApiError, ApiResult};
use crate::billing;
use crate::drivers::payment::{PaymentGateway, PaymentRequest};
use crate::models::notification::NewNotification;
use crate::models::{Bill, BillStatus, NotificationPriority};
use crate::notify;
use crate::AppState;

fn gateway<'a>(state: &'a AppState, name: &str) -> ApiResult<&'a dyn PaymentGateway> {
    state
        .gateways
        .get(name)
        .map(|g| g.as_ref())
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown payment gateway: {}", name)))
}

#[derive(Debug, Serialize)]
pub struct CreatePaymentResponse {
    pub pay_url: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct CreatePaymentRequest {
    pub bill_id: uuid::Uuid,
}

/// `POST /payment/:gateway/create` — returns the checkout URL for the
/// remaining balance. The client opens it in a new tab; the authoritative
/// state change happens on the signed return redirect.
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(gateway_name): Path<String>,
    Json(payload): Json<CreatePaymentRequest>,
) -> ApiResult<Json<CreatePaymentResponse>> {
    let user_id = claims.user_id()?;
    let driver = gateway(&state, &gateway_name)?;

    let (bill, contract) = load_bill_and_contract(&state, payload.bill_id).await?;
    require_payer(&bill, &contract, user_id)?;

    if bill.status.is_paid() || bill.status == BillStatus::PendingCashConfirm {
        return Err(ApiError::ValidationError(
            "Hóa đơn này không thể thanh toán".to_string(),
        ));
    }

    let remaining = bill.remaining_amount();
    if remaining <= 0 {
        return Err(ApiError::ValidationError(
            "Nothing left to pay on this bill".to_string(),
        ));
    }

    let request = PaymentRequest {
        bill_id: bill.id,
        amount: remaining,
        order_info: format!("Thanh toan hoa don {}", bill.id),
        client_ip: "127.0.0.1".to_string(),
        return_url: format!(
            "{}/api/v1/payment/{}/return",
            state.config.public_base_url, gateway_name
        ),
    };

    let pay_url = driver.create_payment_url(&request).await?;
    info!(
        "Payment initiated via {} for bill {} ({} VND)",
        gateway_name, bill.id, remaining
    );

    Ok(Json(CreatePaymentResponse { pay_url }))
}

/// `GET /payment/:gateway/return` — the gateway redirects the payer here
/// with signed query parameters. This is where the bill actually moves:
/// the client-side never advances payment state on its own.
pub async fn payment_return(
    State(state): State<AppState>,
    Path(gateway_name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Redirect> {
    let driver = gateway(&state, &gateway_name)?;
    let outcome = driver.verify_return(&params)?;

    if !outcome.success {
        warn!(
            "Payment via {} for bill {} reported failure ({})",
            gateway_name, outcome.bill_id, outcome.transaction_ref
        );
        return Ok(Redirect::to(&format!(
            "{}/invoices?payment=failed",
            state.config.public_base_url
        )));
    }

    let mut tx = state.db.begin().await?;

    let mut bill = sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = $1 FOR UPDATE")
        .bind(outcome.bill_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound)?;

    let next = match billing::apply_gateway_payment(&mut bill, outcome.amount, &outcome.transaction_ref)
    {
        Ok(next) => next,
        // A refresh of the return URL replays the already-credited
        // transaction; nothing to apply, the earlier outcome stands.
        Err(billing::PaymentApplyError::DuplicateTransaction(tx_ref)) => {
            warn!(
                "Replayed {} return for bill {} (transaction {}), ignoring",
                gateway_name, bill.id, tx_ref
            );
            return Ok(Redirect::to(&format!(
                "{}/invoices?payment=success",
                state.config.public_base_url
            )));
        }
        Err(e) => return Err(ApiError::ValidationError(e.to_string())),
    };

    let bill = sqlx::query_as::<_, Bill>(
        r#"
        UPDATE bills
        SET status = $1, amount_due = $2, amount_paid = $3,
            transaction_refs = $4, updated_at = NOW()
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(bill.status)
    .bind(bill.amount_due)
    .bind(bill.amount_paid)
    .bind(&bill.transaction_refs)
    .bind(bill.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Payment via {} settled bill {} → {:?}",
        gateway_name, bill.id, next
    );

    if let Some(tenant_id) = bill.tenant_id {
        let (title, message) = if next == BillStatus::Paid {
            (
                "Thanh toán thành công".to_string(),
                format!("Hóa đơn đã được thanh toán đủ ({} VND).", outcome.amount),
            )
        } else {
            (
                "Thanh toán một phần".to_string(),
                format!(
                    "Đã nhận {} VND, còn lại {} VND.",
                    outcome.amount, bill.amount_due
                ),
            )
        };
        if let Err(err) = notify::publish(
            &state.db,
            &state.hub,
            NewNotification {
                user_id: tenant_id,
                notification_type: "payment".to_string(),
                title,
                message,
                priority: NotificationPriority::High,
                action_url: Some("/invoices".to_string()),
            },
        )
        .await
        {
            warn!("Failed to deliver payment notification: {}", err);
        }
    }

    Ok(Redirect::to(&format!(
        "{}/invoices?payment=success",
        state.config.public_base_url
    )))
}
