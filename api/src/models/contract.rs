use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Active,
    Ended,
    Canceled,
}

/// Secondary occupant attached to a contract. Permitted to view bills for
/// the contract but never to pay them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoTenant {
    pub user_id: Option<Uuid>,
    pub full_name: String,
    pub phone: Option<String>,
    pub status: String,
}

/// Identity captured at check-in when the tenant has no account yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSnapshot {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contract {
    pub id: Uuid,
    pub room_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub tenant_snapshot: Option<Json<TenantSnapshot>>,
    pub co_tenants: Json<Vec<CoTenant>>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub deposit: i64,
    pub monthly_rent: i64,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Whether `user_id` appears in the co-tenant list without being the
    /// primary tenant.
    pub fn is_co_tenant(&self, user_id: Uuid) -> bool {
        if self.tenant_id == Some(user_id) {
            return false;
        }
        self.co_tenants
            .iter()
            .any(|ct| ct.user_id == Some(user_id))
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub room_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub tenant_snapshot: Option<TenantSnapshot>,
    pub co_tenants: Option<Vec<CoTenant>>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub deposit: i64,
    pub monthly_rent: i64,
}
