//! Payment gateway signature tools.
//!
//! # Usage
//!
//! ```bash
//! # Signature (and, with --email, the full inquiry body) for an order
//! kaos-cli payment sign --order-id 3f2c…-… --amount 400000 --email buyer@example.com
//!
//! # Check a callback body captured from the gateway
//! kaos-cli payment verify callback.json
//! ```

use std::path::Path;

use kaos_euy_core::order::order_description;
use kaos_euy_core::payment::{PaymentCallback, PaymentConfig, PaymentInquiry, verify_callback};
use kaos_euy_core::{CustomerContact, OrderId, Price};
use rust_decimal::Decimal;
use tracing::info;

/// Arguments for `payment sign`.
#[derive(Debug)]
pub struct SignArgs {
    pub order_id: OrderId,
    pub amount: Decimal,
    pub email: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub method: String,
    pub lines: usize,
}

/// Log the inquiry signature, and the inquiry body when an email is given.
///
/// # Errors
///
/// Returns an error if the amount or contact details are invalid.
pub fn sign(config: &PaymentConfig, args: &SignArgs) -> Result<(), Box<dyn std::error::Error>> {
    let price = Price::new(args.amount);
    let payment_amount = price
        .whole_rupiah()
        .ok_or_else(|| format!("amount out of range: {}", args.amount))?;
    let merchant_order_id = args.order_id.to_string();

    info!(
        merchant_code = %config.merchant_code,
        merchant_order_id = %merchant_order_id,
        payment_amount,
        signature = %config.inquiry_signature(&merchant_order_id, payment_amount),
        "Inquiry signature"
    );

    if let Some(email) = &args.email {
        let customer = CustomerContact::new(email, &args.name, args.phone.as_deref())?;
        let inquiry = PaymentInquiry::new(
            config,
            args.order_id,
            price,
            &customer,
            &args.method,
            order_description(args.lines),
        )?;
        info!(
            url = %config.inquiry_url(),
            body = %serde_json::to_string_pretty(&inquiry)?,
            "Inquiry request"
        );
    }
    Ok(())
}

/// Verify a callback body read from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the callback fails
/// verification.
pub async fn verify(config: &PaymentConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(path).await?;
    let callback: PaymentCallback = serde_json::from_str(&content)?;

    let outcome = verify_callback(config, &callback)?;
    info!(
        order_id = %outcome.order_id,
        payment_status = %outcome.payment_status,
        order_status = ?outcome.order_status,
        reference = ?outcome.payment_reference,
        "Callback verified"
    );
    Ok(())
}
