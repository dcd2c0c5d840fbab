use super::{
    hmac_sha256_hex, order_ref, parse_order_ref, PaymentError, PaymentGateway, PaymentRequest,
    PaymentReturn,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// MoMo wallet gateway. Initiation is an API call against the MoMo create
/// endpoint; the response carries the checkout URL.
#[derive(Debug, Clone)]
pub struct MoMo {
    client: Client,
    partner_code: String,
    access_key: String,
    secret_key: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest {
    partner_code: String,
    access_key: String,
    request_id: String,
    amount: i64,
    order_id: String,
    order_info: String,
    redirect_url: String,
    ipn_url: String,
    request_type: String,
    extra_data: String,
    lang: String,
    signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    result_code: i32,
    message: Option<String>,
    pay_url: Option<String>,
}

impl MoMo {
    pub fn new(
        partner_code: String,
        access_key: String,
        secret_key: String,
        endpoint: String,
    ) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;
        Ok(MoMo {
            client,
            partner_code,
            access_key,
            secret_key,
            endpoint,
        })
    }

    /// MoMo signs a fixed-order key=value string, not the JSON body.
    fn create_signature(
        &self,
        amount: i64,
        extra_data: &str,
        ipn_url: &str,
        order_id: &str,
        order_info: &str,
        redirect_url: &str,
        request_id: &str,
        request_type: &str,
    ) -> String {
        let raw = format!(
            "accessKey={}&amount={}&extraData={}&ipnUrl={}&orderId={}&orderInfo={}&partnerCode={}&redirectUrl={}&requestId={}&requestType={}",
            self.access_key, amount, extra_data, ipn_url, order_id, order_info,
            self.partner_code, redirect_url, request_id, request_type,
        );
        hmac_sha256_hex(&self.secret_key, &raw)
    }
}

#[async_trait]
impl PaymentGateway for MoMo {
    fn gateway_name(&self) -> &'static str {
        "momo"
    }

    async fn create_payment_url(&self, request: &PaymentRequest) -> Result<String, PaymentError> {
        let order_id = order_ref(request.bill_id);
        let request_id = Uuid::new_v4().to_string();
        let request_type = "captureWallet";
        let extra_data = "";

        let signature = self.create_signature(
            request.amount,
            extra_data,
            &request.return_url,
            &order_id,
            &request.order_info,
            &request.return_url,
            &request_id,
            request_type,
        );

        let body = CreateRequest {
            partner_code: self.partner_code.clone(),
            access_key: self.access_key.clone(),
            request_id,
            amount: request.amount,
            order_id,
            order_info: request.order_info.clone(),
            redirect_url: request.return_url.clone(),
            ipn_url: request.return_url.clone(),
            request_type: request_type.to_string(),
            extra_data: extra_data.to_string(),
            lang: "vi".to_string(),
            signature,
        };

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

        if created.result_code != 0 {
            return Err(PaymentError::GatewayError(
                created.message.unwrap_or_else(|| "MoMo create failed".to_string()),
            ));
        }
        created
            .pay_url
            .ok_or_else(|| PaymentError::ParseError("missing payUrl in MoMo response".to_string()))
    }

    fn verify_return(&self, params: &HashMap<String, String>) -> Result<PaymentReturn, PaymentError> {
        let given = params
            .get("signature")
            .ok_or(PaymentError::MissingParameter("signature"))?;
        let order_id = params
            .get("orderId")
            .ok_or(PaymentError::MissingParameter("orderId"))?;
        let amount: i64 = params
            .get("amount")
            .ok_or(PaymentError::MissingParameter("amount"))?
            .parse()
            .map_err(|e| PaymentError::ParseError(format!("amount: {}", e)))?;
        let result_code = params
            .get("resultCode")
            .map(String::as_str)
            .unwrap_or_default();
        let request_id = params
            .get("requestId")
            .map(String::as_str)
            .unwrap_or_default();

        let raw = format!(
            "accessKey={}&amount={}&orderId={}&partnerCode={}&requestId={}&resultCode={}",
            self.access_key, amount, order_id, self.partner_code, request_id, result_code,
        );
        if hmac_sha256_hex(&self.secret_key, &raw) != *given {
            return Err(PaymentError::InvalidSignature);
        }

        Ok(PaymentReturn {
            bill_id: parse_order_ref(order_id)?,
            amount,
            success: result_code == "0",
            transaction_ref: order_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> MoMo {
        MoMo::new(
            "PARTNER".to_string(),
            "access".to_string(),
            "secret".to_string(),
            "https://test-payment.momo.vn/v2/gateway/api/create".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn return_verification_round_trip() {
        let g = gateway();
        let bill_id = Uuid::new_v4();
        let order_id = order_ref(bill_id);

        let raw = format!(
            "accessKey=access&amount=2000000&orderId={}&partnerCode=PARTNER&requestId=req-1&resultCode=0",
            order_id
        );
        let signature = hmac_sha256_hex("secret", &raw);

        let mut params = HashMap::new();
        params.insert("orderId".to_string(), order_id);
        params.insert("amount".to_string(), "2000000".to_string());
        params.insert("resultCode".to_string(), "0".to_string());
        params.insert("requestId".to_string(), "req-1".to_string());
        params.insert("signature".to_string(), signature);

        let verified = g.verify_return(&params).unwrap();
        assert!(verified.success);
        assert_eq!(verified.amount, 2_000_000);
        assert_eq!(verified.bill_id, bill_id);

        params.insert("amount".to_string(), "1".to_string());
        assert!(matches!(
            g.verify_return(&params),
            Err(PaymentError::InvalidSignature)
        ));
    }
}
