//! Payment gateway signature contract (Duitku).
//!
//! The storefront creates a payment inquiry for each placed order and
//! receives an asynchronous callback when the buyer pays. Both directions
//! are authenticated with an MD5 signature over concatenated fields and
//! the merchant API key:
//!
//! - inquiry: `md5(merchant_code + merchant_order_id + payment_amount + api_key)`
//! - callback: `md5(merchant_code + amount + merchant_order_id + api_key)`
//!
//! Only the signing, the request shape and the callback outcome live here;
//! the HTTP transport is the caller's concern.

use std::fmt;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::order::{GuestOrderRequest, StoredOrder};
use crate::{CustomerContact, OrderId, OrderStatus, PaymentStatus, Price};

/// Inquiry endpoint, relative to the gateway base URL.
pub const INQUIRY_PATH: &str = "/merchant/v2/inquiry";
/// Minutes before an unpaid inquiry expires.
pub const EXPIRY_PERIOD_MINUTES: u32 = 1440;
/// Callback result code for a successful payment.
pub const SUCCESS_RESULT_CODE: &str = "00";
/// Payment method recorded when the callback does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "duitku";

/// Errors that can occur while signing or verifying payments.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// The amount is not a positive whole-rupiah value.
    #[error("invalid payment amount: {0}")]
    InvalidAmount(String),
    /// The payment method code is blank.
    #[error("payment method is required")]
    MissingPaymentMethod,
    /// The callback names a different merchant.
    #[error("invalid merchant code")]
    MerchantMismatch,
    /// The callback signature does not match.
    #[error("invalid signature")]
    InvalidSignature,
    /// The callback order id is not one of ours.
    #[error("invalid merchant order id: {0}")]
    InvalidOrderId(String),
}

/// Merchant credentials and URLs.
#[derive(Clone)]
pub struct PaymentConfig {
    pub merchant_code: String,
    pub api_key: SecretString,
    /// Gateway base URL.
    pub gateway_url: String,
    /// Public storefront URL, used for callback and return links.
    pub app_base_url: String,
}

impl fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("merchant_code", &self.merchant_code)
            .field("api_key", &"[REDACTED]")
            .field("gateway_url", &self.gateway_url)
            .field("app_base_url", &self.app_base_url)
            .finish()
    }
}

impl PaymentConfig {
    #[must_use]
    pub fn inquiry_url(&self) -> String {
        format!("{}{INQUIRY_PATH}", self.gateway_url.trim_end_matches('/'))
    }

    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("{}/api/payment/callback", self.app_base_url.trim_end_matches('/'))
    }

    /// Thank-you page the buyer returns to after paying.
    #[must_use]
    pub fn return_url(&self, order_id: &str, email: &str) -> String {
        format!(
            "{}/checkout/thank-you?order_id={}&email={}",
            self.app_base_url.trim_end_matches('/'),
            urlencoding::encode(order_id),
            urlencoding::encode(email),
        )
    }

    fn sign(&self, fields: &[&str]) -> String {
        let mut hasher = Md5::new();
        for field in fields {
            hasher.update(field.as_bytes());
        }
        hasher.update(self.api_key.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Signature for an outgoing inquiry.
    #[must_use]
    pub fn inquiry_signature(&self, merchant_order_id: &str, payment_amount: i64) -> String {
        self.sign(&[
            &self.merchant_code,
            merchant_order_id,
            &payment_amount.to_string(),
        ])
    }

    /// Signature the gateway puts on a callback.
    #[must_use]
    pub fn callback_signature(&self, amount: &str, merchant_order_id: &str) -> String {
        self.sign(&[&self.merchant_code, amount, merchant_order_id])
    }
}

/// Body of a payment inquiry request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInquiry {
    pub merchant_code: String,
    pub payment_amount: i64,
    pub payment_method: String,
    pub merchant_order_id: String,
    pub product_details: String,
    pub email: String,
    pub phone_number: String,
    pub callback_url: String,
    pub return_url: String,
    pub signature: String,
    pub expiry_period: u32,
}

impl PaymentInquiry {
    /// Build and sign an inquiry for a submitted guest order.
    ///
    /// # Errors
    ///
    /// See [`PaymentInquiry::new`].
    pub fn for_order(
        config: &PaymentConfig,
        order_id: OrderId,
        request: &GuestOrderRequest,
        payment_method: &str,
    ) -> Result<Self, PaymentError> {
        Self::new(
            config,
            order_id,
            request.total,
            &request.customer,
            payment_method,
            request.product_details(),
        )
    }

    /// Build and sign an inquiry for an order.
    ///
    /// The amount is rounded to a whole rupiah before signing.
    ///
    /// # Errors
    ///
    /// Returns an error if the rounded amount is not positive or the payment
    /// method is blank.
    pub fn new(
        config: &PaymentConfig,
        order_id: OrderId,
        amount: Price,
        customer: &CustomerContact,
        payment_method: &str,
        product_details: String,
    ) -> Result<Self, PaymentError> {
        let payment_amount = amount
            .whole_rupiah()
            .filter(|a| *a > 0)
            .ok_or_else(|| PaymentError::InvalidAmount(amount.amount().to_string()))?;
        let payment_method = payment_method.trim();
        if payment_method.is_empty() {
            return Err(PaymentError::MissingPaymentMethod);
        }

        let merchant_order_id = order_id.to_string();
        let email = customer.email.as_str();
        Ok(Self {
            merchant_code: config.merchant_code.clone(),
            payment_amount,
            payment_method: payment_method.to_string(),
            signature: config.inquiry_signature(&merchant_order_id, payment_amount),
            return_url: config.return_url(&merchant_order_id, email),
            callback_url: config.callback_url(),
            merchant_order_id,
            product_details,
            email: email.to_string(),
            phone_number: customer.phone.clone().unwrap_or_default(),
            expiry_period: EXPIRY_PERIOD_MINUTES,
        })
    }
}

/// Accept a JSON string or number and keep its textual form.
///
/// The gateway posts amounts as strings; numbers are rendered the way they
/// would be concatenated into the signature.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Callback body posted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentCallback {
    pub merchant_code: String,
    #[serde(deserialize_with = "text_or_number")]
    pub amount: String,
    pub merchant_order_id: String,
    pub product_detail: Option<String>,
    pub additional_param: Option<String>,
    pub payment_code: Option<String>,
    pub result_code: String,
    pub merchant_user_id: Option<String>,
    pub reference: Option<String>,
    pub signature: String,
}

/// What a verified callback means for the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutcome {
    pub order_id: OrderId,
    pub payment_status: PaymentStatus,
    /// New order status, or `None` to leave it unchanged.
    pub order_status: Option<OrderStatus>,
    /// Recorded only for successful payments.
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
}

impl PaymentOutcome {
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self.payment_status, PaymentStatus::Paid)
    }

    /// Apply the outcome to a stored order.
    pub fn apply(&self, order: &mut StoredOrder, now: DateTime<Utc>) {
        order.payment_status = self.payment_status;
        if let Some(reference) = &self.payment_reference {
            order.payment_reference = Some(reference.clone());
        }
        if let Some(status) = self.order_status {
            order.status = status;
        }
        if let Some(method) = &self.payment_method {
            order.payment_method = Some(method.clone());
        }
        if self.is_paid() {
            order.paid_at = Some(now);
        }
    }
}

/// Authenticate a callback and derive its outcome.
///
/// # Errors
///
/// Returns [`PaymentError::MerchantMismatch`] if the merchant code differs,
/// [`PaymentError::InvalidSignature`] if the signature does not match, and
/// [`PaymentError::InvalidOrderId`] if the order id is not a UUID.
pub fn verify_callback(
    config: &PaymentConfig,
    callback: &PaymentCallback,
) -> Result<PaymentOutcome, PaymentError> {
    if callback.merchant_code != config.merchant_code {
        warn!("payment callback with unknown merchant code");
        return Err(PaymentError::MerchantMismatch);
    }

    let expected = config.callback_signature(&callback.amount, &callback.merchant_order_id);
    if !constant_time_compare(&expected, &callback.signature) {
        warn!(order = %callback.merchant_order_id, "payment callback with invalid signature");
        return Err(PaymentError::InvalidSignature);
    }

    let order_id: OrderId = callback
        .merchant_order_id
        .parse()
        .map_err(|_| PaymentError::InvalidOrderId(callback.merchant_order_id.clone()))?;

    let outcome = if callback.result_code == SUCCESS_RESULT_CODE {
        info!(%order_id, "payment successful");
        PaymentOutcome {
            order_id,
            payment_status: PaymentStatus::Paid,
            order_status: Some(OrderStatus::Processing),
            payment_method: Some(
                callback
                    .payment_code
                    .clone()
                    .filter(|code| !code.is_empty())
                    .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            ),
            payment_reference: callback.reference.clone(),
        }
    } else {
        info!(%order_id, result_code = %callback.result_code, "payment failed");
        PaymentOutcome {
            order_id,
            payment_status: PaymentStatus::Failed,
            order_status: None,
            payment_method: None,
            payment_reference: callback.reference.clone(),
        }
    };
    Ok(outcome)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
