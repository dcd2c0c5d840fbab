use super::{
    hmac_sha512_hex, order_ref, parse_order_ref, PaymentError, PaymentGateway, PaymentRequest,
    PaymentReturn,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

/// VNPAY redirect-style gateway. No API call is made at initiation time;
/// the pay URL is a signed redirect to the VNPAY checkout page and the
/// outcome comes back as signed query parameters on the return URL.
#[derive(Debug, Clone)]
pub struct VnPay {
    tmn_code: String,
    hash_secret: String,
    pay_url: String,
}

impl VnPay {
    pub fn new(tmn_code: String, hash_secret: String, pay_url: String) -> Self {
        VnPay {
            tmn_code,
            hash_secret,
            pay_url,
        }
    }

    /// VNPAY signs the URL-encoded query with the parameters in
    /// lexicographic order.
    fn signed_query(&self, params: &BTreeMap<String, String>) -> String {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let signature = hmac_sha512_hex(&self.hash_secret, &query);
        format!("{}&vnp_SecureHash={}", query, signature)
    }
}

#[async_trait]
impl PaymentGateway for VnPay {
    fn gateway_name(&self) -> &'static str {
        "vnpay"
    }

    async fn create_payment_url(&self, request: &PaymentRequest) -> Result<String, PaymentError> {
        let mut params = BTreeMap::new();
        params.insert("vnp_Version".to_string(), "2.1.0".to_string());
        params.insert("vnp_Command".to_string(), "pay".to_string());
        params.insert("vnp_TmnCode".to_string(), self.tmn_code.clone());
        // VNPAY expects the amount multiplied by 100
        params.insert("vnp_Amount".to_string(), (request.amount * 100).to_string());
        params.insert("vnp_CurrCode".to_string(), "VND".to_string());
        params.insert("vnp_TxnRef".to_string(), order_ref(request.bill_id));
        params.insert("vnp_OrderInfo".to_string(), request.order_info.clone());
        params.insert("vnp_OrderType".to_string(), "other".to_string());
        params.insert("vnp_Locale".to_string(), "vn".to_string());
        params.insert("vnp_IpAddr".to_string(), request.client_ip.clone());
        params.insert("vnp_ReturnUrl".to_string(), request.return_url.clone());
        params.insert(
            "vnp_CreateDate".to_string(),
            Utc::now().format("%Y%m%d%H%M%S").to_string(),
        );

        Ok(format!("{}?{}", self.pay_url, self.signed_query(&params)))
    }

    fn verify_return(&self, params: &HashMap<String, String>) -> Result<PaymentReturn, PaymentError> {
        let given_hash = params
            .get("vnp_SecureHash")
            .ok_or(PaymentError::MissingParameter("vnp_SecureHash"))?;

        let signed: BTreeMap<String, String> = params
            .iter()
            .filter(|(k, _)| k.as_str() != "vnp_SecureHash" && k.as_str() != "vnp_SecureHashType")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let query = signed
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        if hmac_sha512_hex(&self.hash_secret, &query) != *given_hash {
            return Err(PaymentError::InvalidSignature);
        }

        let txn_ref = params
            .get("vnp_TxnRef")
            .ok_or(PaymentError::MissingParameter("vnp_TxnRef"))?;
        let amount: i64 = params
            .get("vnp_Amount")
            .ok_or(PaymentError::MissingParameter("vnp_Amount"))?
            .parse()
            .map_err(|e| PaymentError::ParseError(format!("vnp_Amount: {}", e)))?;
        let response_code = params
            .get("vnp_ResponseCode")
            .map(String::as_str)
            .unwrap_or_default();

        Ok(PaymentReturn {
            bill_id: parse_order_ref(txn_ref)?,
            amount: amount / 100,
            success: response_code == "00",
            transaction_ref: txn_ref.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn gateway() -> VnPay {
        VnPay::new(
            "TESTCODE".to_string(),
            "testsecret".to_string(),
            "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
        )
    }

    #[tokio::test]
    async fn payment_url_carries_remaining_amount_times_100() {
        let bill_id = Uuid::new_v4();
        let url = gateway()
            .create_payment_url(&PaymentRequest {
                bill_id,
                amount: 5_000_000,
                order_info: "Thanh toan hoa don".to_string(),
                client_ip: "127.0.0.1".to_string(),
                return_url: "http://localhost:3000/api/v1/payment/vnpay/return".to_string(),
            })
            .await
            .unwrap();
        assert!(url.contains("vnp_Amount=500000000"));
        assert!(url.contains(&bill_id.to_string()));
        assert!(url.contains("vnp_SecureHash="));
    }

    #[test]
    fn tampered_return_params_fail_verification() {
        let g = gateway();
        let bill_id = Uuid::new_v4();
        let txn_ref = order_ref(bill_id);

        // Build a validly signed return, then tamper with the amount
        let mut signed = BTreeMap::new();
        signed.insert("vnp_TxnRef".to_string(), txn_ref.clone());
        signed.insert("vnp_Amount".to_string(), "500000000".to_string());
        signed.insert("vnp_ResponseCode".to_string(), "00".to_string());
        let query = signed
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let hash = hmac_sha512_hex("testsecret", &query);

        let mut params: HashMap<String, String> = signed.clone().into_iter().collect();
        params.insert("vnp_SecureHash".to_string(), hash.clone());
        let verified = g.verify_return(&params).unwrap();
        assert!(verified.success);
        assert_eq!(verified.amount, 5_000_000);
        assert_eq!(verified.bill_id, bill_id);

        params.insert("vnp_Amount".to_string(), "100".to_string());
        assert!(matches!(
            g.verify_return(&params),
            Err(PaymentError::InvalidSignature)
        ));
    }

    #[test]
    fn failed_response_code_is_not_success() {
        let g = gateway();
        let txn_ref = order_ref(Uuid::new_v4());
        let mut signed = BTreeMap::new();
        signed.insert("vnp_TxnRef".to_string(), txn_ref);
        signed.insert("vnp_Amount".to_string(), "200000000".to_string());
        signed.insert("vnp_ResponseCode".to_string(), "24".to_string());
        let query = signed
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let hash = hmac_sha512_hex("testsecret", &query);
        let mut params: HashMap<String, String> = signed.into_iter().collect();
        params.insert("vnp_SecureHash".to_string(), hash);

        let verified = g.verify_return(&params).unwrap();
        assert!(!verified.success);
    }
}
