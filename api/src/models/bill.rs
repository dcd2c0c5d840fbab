use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillType {
    Receipt,
    Contract,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Unpaid,
    PartiallyPaid,
    PendingCashConfirm,
    Paid,
}

impl BillStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, BillStatus::Paid)
    }

    /// Transition table for the payment workflow. PENDING_CASH_CONFIRM only
    /// advances through the admin cash confirmation; PAID is terminal.
    pub fn can_transition_to(&self, next: BillStatus) -> bool {
        use BillStatus::*;
        match (self, next) {
            (Unpaid, PartiallyPaid) | (Unpaid, PendingCashConfirm) | (Unpaid, Paid) => true,
            (PartiallyPaid, PartiallyPaid) | (PartiallyPaid, Paid) => true,
            (PartiallyPaid, PendingCashConfirm) => true,
            (PendingCashConfirm, Paid) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricityReading {
    pub previous: i64,
    pub current: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_price: i64,
    pub line_total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electricity_reading: Option<ElectricityReading>,
}

/// A payable record for rent, deposit, or contract initiation.
///
/// `amount_due` tracks the remaining balance; the original total of the
/// bill is `amount_due + amount_paid`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bill {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub bill_type: BillType,
    pub status: BillStatus,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub billing_date: NaiveDate,
    pub line_items: Json<Vec<LineItem>>,
    /// Gateway transaction refs already credited to this bill. Checked on
    /// the return redirect so a replayed query string cannot credit twice.
    pub transaction_refs: Json<Vec<String>>,
    pub proof_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    pub fn remaining_amount(&self) -> i64 {
        self.amount_due
    }

    pub fn original_total(&self) -> i64 {
        self.amount_due + self.amount_paid
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub contract_id: Uuid,
    pub bill_type: BillType,
    pub billing_date: NaiveDate,
    pub line_items: Vec<LineItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    pub name: String,
    pub unit_price: i64,
    pub line_total: i64,
    pub electricity_reading: Option<ElectricityReading>,
}
