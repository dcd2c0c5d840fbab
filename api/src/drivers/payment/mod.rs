pub mod momo;
pub mod vnpay;
pub mod zalopay;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("gateway error: {0}")]
    GatewayError(String),
    #[error("gateway not configured: {0}")]
    NotConfigured(String),
    #[error("invalid signature on return parameters")]
    InvalidSignature,
    #[error("missing return parameter: {0}")]
    MissingParameter(&'static str),
    #[error("malformed order reference: {0}")]
    BadOrderRef(String),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("parse error: {0}")]
    ParseError(String),
}

/// What a handler needs to initiate an online payment for the remaining
/// balance of a bill.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub bill_id: Uuid,
    /// Remaining amount in VND.
    pub amount: i64,
    pub order_info: String,
    pub client_ip: String,
    pub return_url: String,
}

/// Verified outcome of a gateway return redirect.
#[derive(Debug, Clone)]
pub struct PaymentReturn {
    pub bill_id: Uuid,
    pub amount: i64,
    pub success: bool,
    pub transaction_ref: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Gateway name as it appears in the route path.
    fn gateway_name(&self) -> &'static str;

    /// Build (or request from the provider) a payment-initiation URL the
    /// client opens in a new tab.
    async fn create_payment_url(&self, request: &PaymentRequest) -> Result<String, PaymentError>;

    /// Verify the signed query parameters of the return redirect and
    /// extract the authoritative payment outcome.
    fn verify_return(&self, params: &HashMap<String, String>) -> Result<PaymentReturn, PaymentError>;
}

/// Order references carry the bill id plus a per-attempt timestamp so the
/// same bill can be retried after an abandoned checkout.
pub fn order_ref(bill_id: Uuid) -> String {
    format!("{}-{}", bill_id, Utc::now().timestamp_millis())
}

pub fn parse_order_ref(order_ref: &str) -> Result<Uuid, PaymentError> {
    let uuid_part = order_ref.get(..36).unwrap_or(order_ref);
    Uuid::parse_str(uuid_part).map_err(|_| PaymentError::BadOrderRef(order_ref.to_string()))
}

pub(crate) fn hmac_sha512_hex(secret: &str, data: &str) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub(crate) fn hmac_sha256_hex(secret: &str, data: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ref_round_trips_bill_id() {
        let id = Uuid::new_v4();
        let reference = order_ref(id);
        assert_eq!(parse_order_ref(&reference).unwrap(), id);
    }

    #[test]
    fn garbage_order_ref_is_rejected() {
        assert!(parse_order_ref("not-a-uuid").is_err());
        assert!(parse_order_ref("").is_err());
    }

    #[test]
    fn hmac_hex_is_stable() {
        let a = hmac_sha256_hex("key", "payload");
        let b = hmac_sha256_hex("key", "payload");
        assert_eq!(a, b);
        assert_ne!(a, hmac_sha256_hex("other", "payload"));
    }
}
