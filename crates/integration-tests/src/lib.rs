//! Integration tests for Kaos EUY!.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kaos-euy-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `customization_flow` - Design, pricing and add-to-cart scenarios
//! - `order_snapshot` - Freeze/normalize contract for stored customizations
//! - `checkout_payment` - Guest checkout, lookup and payment callbacks
//!
//! This library holds in-memory collaborators shared by those tests.

use std::collections::HashMap;
use std::sync::Mutex;

use kaos_euy_core::collaborators::{
    CollaboratorError, ImageUpload, ImageUploader, OrderLookup, OrderSubmitter, SettingsSource,
};
use kaos_euy_core::order::{GuestOrderRequest, OrderReceipt, StoredOrder};
use kaos_euy_core::{Email, OrderId, Price, Product, ProductColor, ProductId, Size};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

/// A customizable tee at 150.000.
#[must_use]
pub fn polos_tee() -> Product {
    Product {
        id: ProductId::generate(),
        name: "Kaos Polos".to_string(),
        slug: "kaos-polos".to_string(),
        price: Price::idr(150_000),
        images: Vec::new(),
        sizes: vec![Size::S, Size::M, Size::L, Size::XL],
        colors: vec![black(), ProductColor::new("#FFFFFF", "White")],
        in_stock: true,
        is_customizable: true,
    }
}

#[must_use]
pub fn black() -> ProductColor {
    ProductColor::new("#000000", "Black")
}

/// Uploader that hands out predictable CDN URLs.
#[derive(Debug, Default)]
pub struct MemoryUploader {
    uploads: Mutex<Vec<String>>,
}

impl MemoryUploader {
    /// File names uploaded so far.
    #[must_use]
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl ImageUploader for MemoryUploader {
    async fn upload(&self, upload: ImageUpload) -> Result<String, CollaboratorError> {
        let mut uploads = self
            .uploads
            .lock()
            .map_err(|e| CollaboratorError::Upload(e.to_string()))?;
        uploads.push(upload.file_name.clone());
        Ok(format!("https://cdn.kaoseuy.test/designs/{}", upload.file_name))
    }
}

/// Order backend that stores requests as they would be persisted.
#[derive(Debug, Default)]
pub struct MemoryOrders {
    orders: Mutex<HashMap<OrderId, (String, StoredOrder)>>,
    /// When set, submissions fail.
    pub offline: bool,
}

impl MemoryOrders {
    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().map(|o| o.len()).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutate a stored order in place.
    pub fn update(&self, order_id: OrderId, f: impl FnOnce(&mut StoredOrder)) {
        if let Ok(mut orders) = self.orders.lock() {
            if let Some((_, order)) = orders.get_mut(&order_id) {
                f(order);
            }
        }
    }

    /// Round-trip a request through JSON the way a database row would.
    fn persist(
        order_id: OrderId,
        request: &GuestOrderRequest,
    ) -> Result<StoredOrder, CollaboratorError> {
        let mut row = serde_json::to_value(request)
            .map_err(|e| CollaboratorError::Submission(e.to_string()))?;
        if let Some(object) = row.as_object_mut() {
            object.insert("id".to_string(), json!(order_id.to_string()));
            object.insert("status".to_string(), json!("pending"));
            object.insert("payment_status".to_string(), json!("pending"));
            object.insert("guest_email".to_string(), json!(request.customer.email.as_str()));
            object.insert("guest_name".to_string(), json!(request.customer.name));
        }
        serde_json::from_value(row).map_err(|e| CollaboratorError::Submission(e.to_string()))
    }
}

impl OrderSubmitter for MemoryOrders {
    async fn create_guest_order(
        &self,
        request: GuestOrderRequest,
    ) -> Result<OrderReceipt, CollaboratorError> {
        if self.offline {
            return Err(CollaboratorError::Unavailable {
                service: "orders",
                reason: "connection refused".to_string(),
            });
        }

        let order_id = OrderId::generate();
        let token = format!("lookup-{}", order_id.as_uuid().simple());
        let stored = Self::persist(order_id, &request)?;
        self.orders
            .lock()
            .map_err(|e| CollaboratorError::Submission(e.to_string()))?
            .insert(order_id, (token.clone(), stored));

        Ok(OrderReceipt {
            order_id,
            lookup_token: SecretString::from(token),
        })
    }
}

impl OrderLookup for MemoryOrders {
    async fn find_guest_order(
        &self,
        order_id: OrderId,
        email: &Email,
        lookup_token: &str,
    ) -> Result<Option<StoredOrder>, CollaboratorError> {
        let orders = self.orders.lock().map_err(|e| CollaboratorError::Unavailable {
            service: "orders",
            reason: e.to_string(),
        })?;
        Ok(orders.get(&order_id).and_then(|(token, order)| {
            let email_matches = order
                .guest_email
                .as_deref()
                .is_some_and(|stored| stored.eq_ignore_ascii_case(email.as_str()));
            (email_matches && token == lookup_token).then(|| order.clone())
        }))
    }
}

/// Settings source with a fixed answer.
#[derive(Debug, Clone)]
pub struct FixedSettings(pub Result<u32, CollaboratorError>);

impl SettingsSource for FixedSettings {
    async fn bulk_order_threshold(&self) -> Result<u32, CollaboratorError> {
        self.0.clone()
    }
}

/// Expose a receipt's lookup token for assertions.
#[must_use]
pub fn token_of(receipt: &OrderReceipt) -> &str {
    receipt.lookup_token.expose_secret()
}
