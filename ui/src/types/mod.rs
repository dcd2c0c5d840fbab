// Shared types mirroring the API's JSON shapes
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Staff,
    Tenant,
}

impl UserRole {
    pub fn has_admin_access(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Staff)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub room_number: String,
    pub room_type: String,
    pub price_per_month: i64,
    pub area_m2: f64,
    pub floor: i32,
    pub district: String,
    pub status: RoomStatus,
    pub utilities: Vec<Utility>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Active,
    Ended,
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoTenant {
    pub user_id: Option<Uuid>,
    pub full_name: String,
    pub phone: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSnapshot {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub room_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub tenant_snapshot: Option<TenantSnapshot>,
    pub co_tenants: Vec<CoTenant>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub deposit: i64,
    pub monthly_rent: i64,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillType {
    Receipt,
    Contract,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Unpaid,
    PartiallyPaid,
    PendingCashConfirm,
    Paid,
}

impl BillStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Unpaid => "Chưa thanh toán",
            BillStatus::PartiallyPaid => "Thanh toán một phần",
            BillStatus::PendingCashConfirm => "Chờ xác nhận tiền mặt",
            BillStatus::Paid => "Đã thanh toán",
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

/// `amount_due` is the remaining balance, not the face value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub bill_type: BillType,
    pub status: BillStatus,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub billing_date: NaiveDate,
    pub line_items: Vec<LineItem>,
    pub proof_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillTotals {
    pub unpaid_total: i64,
    pub paid_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyBillsResponse {
    pub bills: Vec<Bill>,
    pub totals: BillTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillDetail {
    #[serde(flatten)]
    pub bill: Bill,
    pub remaining_amount: i64,
    pub original_total: i64,
    pub can_pay: bool,
    pub payment_blocked_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplaintStatus::Resolved | ComplaintStatus::Rejected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Chờ xử lý",
            ComplaintStatus::InProgress => "Đang xử lý",
            ComplaintStatus::Resolved => "Đã giải quyết",
            ComplaintStatus::Rejected => "Từ chối",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub room_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub is_read: bool,
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(alias = "users")]
    #[serde(alias = "rooms")]
    #[serde(alias = "contracts")]
    #[serde(alias = "bills")]
    #[serde(alias = "complaints")]
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}
