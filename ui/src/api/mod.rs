// HTTP client for the RentCP API
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::*;

#[cfg(not(feature = "ssr"))]
use gloo_net::http::Request;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// API origin, injected at build time via `RENTCP_API_URL`; falls back to
/// the dev server.
pub fn base_url() -> &'static str {
    option_env!("RENTCP_API_URL").unwrap_or(DEFAULT_BASE_URL)
}

/// WebSocket endpoint of the notification hub, derived from the HTTP
/// origin so https deployments get wss.
pub fn ws_endpoint() -> String {
    derive_ws_endpoint(base_url())
}

fn derive_ws_endpoint(base: &str) -> String {
    let origin = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/api/v1/ws", origin)
}

#[derive(Debug, Clone)]
pub enum ApiError {
    Network(String),
    /// Non-2xx response; carries the server's `error` message when present.
    Api {
        status: u16,
        message: String,
    },
    Serialization(String),
    Deserialization(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::Network(e) => format!("Không thể kết nối đến máy chủ: {}", e),
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Serialization(e) | ApiError::Deserialization(e) => {
                format!("Lỗi dữ liệu: {}", e)
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    #[cfg(feature = "ssr")]
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            base_url: base_url().to_string(),
            token,
            #[cfg(feature = "ssr")]
            client: reqwest::Client::new(),
        }
    }

    // --- auth ---

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.post(
            "/api/v1/auth/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn register(&self, body: &serde_json::Value) -> Result<User, ApiError> {
        self.post("/api/v1/auth/register", body).await
    }

    // --- tenant site ---

    pub async fn list_public_rooms(&self) -> Result<RoomListing, ApiError> {
        self.get("/api/v1/rooms/public").await
    }

    pub async fn get_public_room(&self, id: Uuid) -> Result<Room, ApiError> {
        self.get(&format!("/api/v1/rooms/public/{}", id)).await
    }

    pub async fn search_rooms(&self, keyword: &str) -> Result<Vec<Room>, ApiError> {
        self.get(&format!(
            "/api/v1/search?keyword={}",
            urlencoding::encode(keyword)
        ))
        .await
    }

    pub async fn my_contracts(&self) -> Result<Vec<Contract>, ApiError> {
        self.get("/api/v1/contracts/my").await
    }

    pub async fn my_bills(&self) -> Result<MyBillsResponse, ApiError> {
        self.get("/api/v1/bills/my-bills").await
    }

    pub async fn get_bill(&self, id: Uuid) -> Result<BillDetail, ApiError> {
        self.get(&format!("/api/v1/bills/{}", id)).await
    }

    /// Cash payment: amount plus a mandatory proof image, as multipart.
    #[cfg(not(feature = "ssr"))]
    pub async fn pay_cash(
        &self,
        bill_id: Uuid,
        amount: i64,
        proof: &web_sys::File,
    ) -> Result<Bill, ApiError> {
        let form = web_sys::FormData::new()
            .map_err(|_| ApiError::Serialization("FormData unavailable".to_string()))?;
        form.append_with_str("amount", &amount.to_string())
            .map_err(|_| ApiError::Serialization("bad amount field".to_string()))?;
        form.append_with_blob_and_filename("proof", proof, &proof.name())
            .map_err(|_| ApiError::Serialization("bad proof field".to_string()))?;

        let url = format!("{}/api/v1/bills/{}/pay-cash", self.base_url, bill_id);
        let mut req = Request::post(&url);
        if let Some(token) = &self.token {
            req = req.header("Authorization", &format!("Bearer {}", token));
        }
        let response = req
            .body(form)
            .map_err(|e| ApiError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    pub async fn create_payment(&self, gateway: &str, bill_id: Uuid) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct PayUrl {
            pay_url: String,
        }
        let body: PayUrl = self
            .post(
                &format!("/api/v1/payment/{}/create", gateway),
                &serde_json::json!({ "bill_id": bill_id }),
            )
            .await?;
        Ok(body.pay_url)
    }

    pub async fn my_complaints(&self) -> Result<Vec<Complaint>, ApiError> {
        self.get("/api/v1/complaints").await
    }

    pub async fn create_complaint(&self, body: &serde_json::Value) -> Result<Complaint, ApiError> {
        self.post("/api/v1/complaints", body).await
    }

    pub async fn list_notifications(&self) -> Result<NotificationsPage, ApiError> {
        self.get("/api/v1/notifications").await
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<Notification, ApiError> {
        self.put_empty(&format!("/api/v1/notifications/{}/read", id))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<serde_json::Value, ApiError> {
        self.put_empty("/api/v1/notifications/read-all").await
    }

    // --- back-office ---

    pub async fn admin_list_users(&self, page: u32) -> Result<Paginated<User>, ApiError> {
        self.get(&format!("/api/v1/admin/users?page={}", page)).await
    }

    pub async fn admin_create_user(&self, body: &serde_json::Value) -> Result<User, ApiError> {
        self.post("/api/v1/admin/users", body).await
    }

    pub async fn admin_list_rooms(&self) -> Result<RoomListing, ApiError> {
        self.get("/api/v1/admin/rooms").await
    }

    pub async fn admin_create_room(&self, body: &serde_json::Value) -> Result<Room, ApiError> {
        self.post("/api/v1/admin/rooms", body).await
    }

    pub async fn admin_list_contracts(&self, page: u32) -> Result<Paginated<Contract>, ApiError> {
        self.get(&format!("/api/v1/admin/contracts?page={}", page))
            .await
    }

    pub async fn admin_checkin(&self, body: &serde_json::Value) -> Result<Contract, ApiError> {
        self.post("/api/v1/admin/contracts/checkin", body).await
    }

    pub async fn admin_end_contract(&self, id: Uuid) -> Result<Contract, ApiError> {
        self.put_empty(&format!("/api/v1/admin/contracts/{}/end", id))
            .await
    }

    pub async fn admin_list_bills(&self, page: u32) -> Result<Paginated<Bill>, ApiError> {
        self.get(&format!("/api/v1/admin/bills?page={}", page)).await
    }

    pub async fn admin_create_bill(&self, body: &serde_json::Value) -> Result<Bill, ApiError> {
        self.post("/api/v1/admin/bills", body).await
    }

    pub async fn admin_confirm_cash(&self, bill_id: Uuid) -> Result<Bill, ApiError> {
        self.put_empty(&format!("/api/v1/admin/bills/{}/confirm-cash", bill_id))
            .await
    }

    pub async fn admin_list_complaints(&self, page: u32) -> Result<Paginated<Complaint>, ApiError> {
        self.get(&format!("/api/v1/admin/complaints?page={}", page))
            .await
    }

    pub async fn admin_update_complaint_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        admin_note: Option<String>,
    ) -> Result<Complaint, ApiError> {
        self.put(
            &format!("/api/v1/admin/complaints/{}/status", id),
            &serde_json::json!({ "status": status, "admin_note": admin_note }),
        )
        .await
    }

    // --- transport ---

    #[cfg(not(feature = "ssr"))]
    async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut req = Request::get(&url);
        if let Some(token) = &self.token {
            req = req.header("Authorization", &format!("Bearer {}", token));
        }
        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    #[cfg(not(feature = "ssr"))]
    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        self.send_json("POST", path, body).await
    }

    #[cfg(not(feature = "ssr"))]
    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        self.send_json("PUT", path, body).await
    }

    #[cfg(not(feature = "ssr"))]
    async fn put_empty<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.send_json("PUT", path, &serde_json::json!({})).await
    }

    #[cfg(not(feature = "ssr"))]
    async fn send_json<T, B>(&self, method: &str, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut req = match method {
            "PUT" => Request::put(&url),
            _ => Request::post(&url),
        };
        if let Some(token) = &self.token {
            req = req.header("Authorization", &format!("Bearer {}", token));
        }
        let response = req
            .json(body)
            .map_err(|e| ApiError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    #[cfg(not(feature = "ssr"))]
    async fn decode<T>(response: gloo_net::http::Response) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        if !response.ok() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(ApiError::Api { status, message });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    #[cfg(feature = "ssr")]
    async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(ApiError::Api { status, message });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    #[cfg(feature = "ssr")]
    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        self.send_json(reqwest::Method::POST, path, body).await
    }

    #[cfg(feature = "ssr")]
    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        self.send_json(reqwest::Method::PUT, path, body).await
    }

    #[cfg(feature = "ssr")]
    async fn put_empty<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.send_json(reqwest::Method::PUT, path, &serde_json::json!({}))
            .await
    }

    #[cfg(feature = "ssr")]
    async fn send_json<T, B>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url).json(body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(ApiError::Api { status, message });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomListing {
    pub rooms: Vec<Room>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsPage {
    pub notifications: Vec<Notification>,
    pub total: i64,
    pub unread: i64,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_endpoint_follows_the_http_scheme() {
        assert_eq!(
            derive_ws_endpoint("http://localhost:8080"),
            "ws://localhost:8080/api/v1/ws"
        );
        assert_eq!(
            derive_ws_endpoint("https://rentcp.example.com"),
            "wss://rentcp.example.com/api/v1/ws"
        );
    }

    #[test]
    fn search_keywords_are_percent_encoded() {
        assert_eq!(urlencoding::encode("phòng 2"), "ph%C3%B2ng%202");
        assert_eq!(urlencoding::encode("quan-1_A.b~"), "quan-1_A.b~");
    }
}
