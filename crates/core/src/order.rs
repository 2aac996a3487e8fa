//! Order records exchanged with the order collaborators.
//!
//! Outbound types ([`GuestOrderRequest`] and friends) are built from the
//! cart and are always internally consistent. Inbound types
//! ([`StoredOrder`], [`StoredOrderItem`]) mirror whatever the backend
//! returns and are deliberately lenient: any field that is missing or has
//! the wrong type falls back to its default instead of failing the whole
//! record.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::cart::{Cart, CartLine};
use crate::customization::{NormalizedCustomization, SummaryEntry, normalize, summarize};
use crate::{CustomerContact, OrderId, OrderStatus, PaymentStatus, Price, ProductId};

// =============================================================================
// Outbound
// =============================================================================

/// One order line as submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub product_name: String,
    pub size: String,
    pub color_code: String,
    pub color_name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub custom_fee: Price,
    /// Frozen customization in its persisted shape.
    pub customization: Value,
    pub line_total: Price,
}

impl From<&CartLine> for OrderItemInput {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            size: line.size.to_string(),
            color_code: line.color.code.clone(),
            color_name: line.color.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            custom_fee: line.custom_fee(),
            customization: line.customization.customization().to_json(),
            line_total: line.line_total(),
        }
    }
}

/// Delivery details for a guest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Everything the order submitter needs to create a guest order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestOrderRequest {
    pub items: Vec<OrderItemInput>,
    pub customer: CustomerContact,
    pub shipping: ShippingDetails,
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
}

impl GuestOrderRequest {
    /// Build a request from the cart. Shipping is free.
    #[must_use]
    pub fn from_cart(cart: &Cart, customer: CustomerContact, shipping: ShippingDetails) -> Self {
        let items: Vec<OrderItemInput> = cart.lines().iter().map(OrderItemInput::from).collect();
        let subtotal: Price = items.iter().map(|item| item.line_total).sum();
        let shipping_fee = Price::zero();
        Self {
            items,
            customer,
            shipping,
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
        }
    }

    /// Units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Product description shown on the payment page.
    #[must_use]
    pub fn product_details(&self) -> String {
        order_description(self.items.len())
    }
}

/// Payment page description for an order with `line_count` lines.
#[must_use]
pub fn order_description(line_count: usize) -> String {
    format!("Kaos EUY! - {line_count} item(s)")
}

/// Result of a successful order submission.
///
/// The lookup token lets a guest retrieve the order later without an
/// account; it is kept out of logs.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub lookup_token: SecretString,
}

// =============================================================================
// Inbound
// =============================================================================

/// Deserialize a field, falling back to its default on any type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// An order header as returned by the order lookup collaborator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoredOrder {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub status: OrderStatus,
    #[serde(deserialize_with = "lenient")]
    pub payment_status: PaymentStatus,
    #[serde(deserialize_with = "lenient")]
    pub payment_method: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub payment_reference: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub subtotal: Price,
    #[serde(deserialize_with = "lenient")]
    pub shipping_fee: Price,
    #[serde(deserialize_with = "lenient")]
    pub total: Price,
    #[serde(deserialize_with = "lenient")]
    pub guest_email: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub guest_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub guest_phone: Option<String>,
    pub guest_shipping: Value,
    #[serde(deserialize_with = "lenient")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient")]
    pub items: Vec<StoredOrderItem>,
}

impl StoredOrder {
    /// The order id, if the stored value is a valid UUID.
    #[must_use]
    pub fn order_id(&self) -> Option<OrderId> {
        self.id.parse().ok()
    }

    /// Display views of every line.
    #[must_use]
    pub fn item_views(&self) -> Vec<OrderItemView> {
        self.items.iter().map(OrderItemView::new).collect()
    }
}

/// An order line as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoredOrderItem {
    #[serde(deserialize_with = "lenient")]
    pub product_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub product_name: String,
    #[serde(deserialize_with = "lenient")]
    pub size: String,
    #[serde(deserialize_with = "lenient")]
    pub color_code: String,
    #[serde(deserialize_with = "lenient")]
    pub color_name: String,
    #[serde(deserialize_with = "lenient")]
    pub quantity: u32,
    #[serde(deserialize_with = "lenient")]
    pub unit_price: Price,
    #[serde(deserialize_with = "lenient")]
    pub custom_fee: Price,
    /// Stored exactly as written; read it through [`OrderItemView`].
    pub customization: Value,
    #[serde(deserialize_with = "lenient")]
    pub line_total: Price,
}

/// Display-ready view of a stored order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemView {
    pub product_name: String,
    pub size: String,
    pub color_name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub custom_fee: Price,
    pub line_total: Price,
    pub customization: NormalizedCustomization,
    pub summary: Vec<SummaryEntry>,
}

impl OrderItemView {
    #[must_use]
    pub fn new(item: &StoredOrderItem) -> Self {
        let customization = normalize(&item.customization);
        let summary = summarize(&customization);
        Self {
            product_name: item.product_name.clone(),
            size: item.size.clone(),
            color_name: item.color_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            custom_fee: item.custom_fee,
            line_total: item.line_total,
            customization,
            summary,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::composer::{ProductRef, VariantComposer};
    use crate::customization::{DesignSet, PricingRule, PrintPosition};
    use crate::{ProductColor, Size};

    fn cart_with_custom_line() -> Cart {
        let mut design = DesignSet::new();
        design.set_image(PrintPosition::Front, "https://cdn.test/f.png", None);
        design.set_text(PrintPosition::LeftArm, "EUY!");

        let mut composer = VariantComposer::new(ProductRef {
            id: ProductId::generate(),
            name: "Kaos Polos".to_string(),
            base_price: Price::idr(150_000),
        });
        composer.add_variant(Size::L, ProductColor::new("#000000", "Black"), 2);

        let mut cart = Cart::new();
        composer.commit_into(&mut design, &PricingRule::default(), &mut cart);
        cart
    }

    fn contact() -> CustomerContact {
        CustomerContact::new("asep@kaoseuy.id", "Asep", None).unwrap()
    }

    #[test]
    fn test_request_from_cart() {
        let cart = cart_with_custom_line();
        let request = GuestOrderRequest::from_cart(&cart, contact(), ShippingDetails::default());

        assert_eq!(request.items.len(), 1);
        let item = &request.items[0];
        assert_eq!(item.size, "L");
        assert_eq!(item.color_code, "#000000");
        assert_eq!(item.unit_price, Price::idr(150_000));
        assert_eq!(item.custom_fee, Price::idr(50_000));
        assert_eq!(item.line_total, Price::idr(400_000));
        assert_eq!(
            item.customization["applied_positions"],
            json!(["front", "leftArm"])
        );
        assert_eq!(request.subtotal, Price::idr(400_000));
        assert_eq!(request.shipping_fee, Price::zero());
        assert_eq!(request.total, Price::idr(400_000));
        assert_eq!(request.item_count(), 2);
        assert_eq!(request.product_details(), "Kaos EUY! - 1 item(s)");
    }

    #[test]
    fn test_request_serializes_amounts_as_numbers() {
        let cart = cart_with_custom_line();
        let request = GuestOrderRequest::from_cart(&cart, contact(), ShippingDetails::default());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["total"], json!(400_000));
        assert_eq!(json["items"][0]["custom_fee"], json!(50_000));
        assert_eq!(json["customer"]["email"], "asep@kaoseuy.id");
    }

    #[test]
    fn test_stored_order_is_lenient() {
        let order: StoredOrder = serde_json::from_value(json!({
            "id": "f47ac10b-58cc-4372-a567-0e02b2c3d479",
            "status": "shipped",
            "payment_status": "settled-somehow",
            "total": "not a number",
            "created_at": "yesterday",
            "items": [
                {"product_name": "Kaos Polos", "quantity": 2, "customization": null},
                {"quantity": "many", "customization": {"parts": {"front": {"text": "EUY!"}}}}
            ]
        }))
        .unwrap();

        assert!(order.order_id().is_some());
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total, Price::zero());
        assert_eq!(order.created_at, None);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].quantity, 0);

        let views = order.item_views();
        assert!(views[0].summary.is_empty());
        assert_eq!(views[1].summary.len(), 1);
        assert_eq!(views[1].summary[0].value, "EUY!");
    }

    #[test]
    fn test_stored_order_from_empty_object() {
        let order: StoredOrder = serde_json::from_value(json!({})).unwrap();
        assert_eq!(order, StoredOrder::default());
        assert!(order.order_id().is_none());
    }
}
