use super::{
    hmac_sha256_hex, order_ref, parse_order_ref, PaymentError, PaymentGateway, PaymentRequest,
    PaymentReturn,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

/// ZaloPay gateway. The create call posts a MAC-signed order and gets the
/// checkout URL back; the return redirect is verified with the same key.
#[derive(Debug, Clone)]
pub struct ZaloPay {
    client: Client,
    app_id: String,
    key1: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    return_code: i32,
    return_message: Option<String>,
    order_url: Option<String>,
}

impl ZaloPay {
    pub fn new(app_id: String, key1: String, endpoint: String) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;
        Ok(ZaloPay {
            client,
            app_id,
            key1,
            endpoint,
        })
    }
}

#[async_trait]
impl PaymentGateway for ZaloPay {
    fn gateway_name(&self) -> &'static str {
        "zalopay"
    }

    async fn create_payment_url(&self, request: &PaymentRequest) -> Result<String, PaymentError> {
        let now = Utc::now();
        // ZaloPay requires the trans id to be prefixed with yymmdd
        let app_trans_id = format!("{}_{}", now.format("%y%m%d"), order_ref(request.bill_id));
        let app_time = now.timestamp_millis();
        let app_user = "rentcp";
        let embed_data = json!({ "redirecturl": request.return_url }).to_string();
        let item = "[]";

        let mac_input = format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.app_id, app_trans_id, app_user, request.amount, app_time, embed_data, item,
        );
        let mac = hmac_sha256_hex(&self.key1, &mac_input);

        let body = json!({
            "app_id": self.app_id,
            "app_trans_id": app_trans_id,
            "app_user": app_user,
            "app_time": app_time,
            "amount": request.amount,
            "item": item,
            "embed_data": embed_data,
            "description": request.order_info,
            "callback_url": request.return_url,
            "mac": mac,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::ParseError(e.to_string()))?;

        if created.return_code != 1 {
            return Err(PaymentError::GatewayError(
                created
                    .return_message
                    .unwrap_or_else(|| "ZaloPay create failed".to_string()),
            ));
        }
        created.order_url.ok_or_else(|| {
            PaymentError::ParseError("missing order_url in ZaloPay response".to_string())
        })
    }

    fn verify_return(&self, params: &HashMap<String, String>) -> Result<PaymentReturn, PaymentError> {
        let given = params
            .get("checksum")
            .ok_or(PaymentError::MissingParameter("checksum"))?;
        let app_trans_id = params
            .get("apptransid")
            .ok_or(PaymentError::MissingParameter("apptransid"))?;
        let amount: i64 = params
            .get("amount")
            .ok_or(PaymentError::MissingParameter("amount"))?
            .parse()
            .map_err(|e| PaymentError::ParseError(format!("amount: {}", e)))?;
        let status = params.get("status").map(String::as_str).unwrap_or_default();

        let mac_input = format!("{}|{}|{}|{}", self.app_id, app_trans_id, amount, status);
        if hmac_sha256_hex(&self.key1, &mac_input) != *given {
            return Err(PaymentError::InvalidSignature);
        }

        // Strip the yymmdd_ prefix before recovering the bill id
        let order_part = app_trans_id
            .split_once('_')
            .map(|(_, rest)| rest)
            .unwrap_or(app_trans_id);

        Ok(PaymentReturn {
            bill_id: parse_order_ref(order_part)?,
            amount,
            success: status == "1",
            transaction_ref: app_trans_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn return_verification_recovers_bill_id() {
        let g = ZaloPay::new(
            "2553".to_string(),
            "key1".to_string(),
            "https://sb-openapi.zalopay.vn/v2/create".to_string(),
        )
        .unwrap();

        let bill_id = Uuid::new_v4();
        let app_trans_id = format!("250601_{}", order_ref(bill_id));
        let mac_input = format!("2553|{}|2000000|1", app_trans_id);
        let checksum = hmac_sha256_hex("key1", &mac_input);

        let mut params = HashMap::new();
        params.insert("apptransid".to_string(), app_trans_id);
        params.insert("amount".to_string(), "2000000".to_string());
        params.insert("status".to_string(), "1".to_string());
        params.insert("checksum".to_string(), checksum);

        let verified = g.verify_return(&params).unwrap();
        assert!(verified.success);
        assert_eq!(verified.bill_id, bill_id);

        params.insert("status".to_string(), "0".to_string());
        assert!(matches!(
            g.verify_return(&params),
            Err(PaymentError::InvalidSignature)
        ));
    }
}
