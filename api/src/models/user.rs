use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Staff,
    Tenant,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Staff => write!(f, "STAFF"),
            UserRole::Tenant => write!(f, "TENANT"),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// ADMIN and STAFF share the back-office surface.
    pub fn has_admin_access(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Staff)
    }

    pub fn can_manage_user(&self, target: &User) -> bool {
        match self.role {
            UserRole::Admin => true,
            // Staff may manage tenants but not other back-office accounts
            UserRole::Staff => matches!(target.role, UserRole::Tenant),
            UserRole::Tenant => self.id == target.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            phone: None,
            password_hash: "hash".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn staff_has_admin_access_but_cannot_manage_staff() {
        let staff = user(UserRole::Staff);
        assert!(staff.has_admin_access());
        assert!(staff.can_manage_user(&user(UserRole::Tenant)));
        assert!(!staff.can_manage_user(&user(UserRole::Staff)));
        assert!(!staff.can_manage_user(&user(UserRole::Admin)));
    }

    #[test]
    fn tenant_can_only_manage_self() {
        let tenant = user(UserRole::Tenant);
        assert!(!tenant.has_admin_access());
        assert!(tenant.can_manage_user(&tenant));
        assert!(!tenant.can_manage_user(&user(UserRole::Tenant)));
    }
}
