//! Guest checkout orchestration.

use tracing::{info, instrument, warn};

use crate::cart::Cart;
use crate::collaborators::{CollaboratorError, OrderSubmitter, SettingsSource};
use crate::order::{GuestOrderRequest, OrderReceipt, ShippingDetails};
use crate::CustomerContact;

/// Bulk threshold used when nothing else is configured.
pub const DEFAULT_BULK_ORDER_THRESHOLD: u32 = 10;

/// Errors that can occur while placing an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,
    /// The shipping address is blank.
    #[error("shipping address is required")]
    MissingAddress,
    /// The order backend failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Submit the cart as a guest order.
///
/// The cart is cleared only after the submitter accepts the order, so a
/// failed submission can simply be retried.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] or [`CheckoutError::MissingAddress`]
/// without contacting the submitter, or the submitter's error.
#[instrument(skip_all, fields(lines = cart.lines().len()))]
pub async fn place_order<S: OrderSubmitter>(
    submitter: &S,
    cart: &mut Cart,
    customer: CustomerContact,
    shipping: ShippingDetails,
) -> Result<OrderReceipt, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if shipping.full_address.trim().is_empty() {
        return Err(CheckoutError::MissingAddress);
    }

    let request = GuestOrderRequest::from_cart(cart, customer, shipping);
    let total = request.total;
    let receipt = submitter.create_guest_order(request).await?;

    cart.clear();
    info!(order_id = %receipt.order_id, %total, "guest order placed");
    Ok(receipt)
}

/// Bulk threshold from settings, or `fallback` if settings are unavailable.
#[instrument(skip(settings))]
pub async fn resolve_bulk_threshold<S: SettingsSource>(settings: &S, fallback: u32) -> u32 {
    match settings.bulk_order_threshold().await {
        Ok(threshold) => threshold,
        Err(e) => {
            warn!(error = %e, fallback, "using fallback bulk order threshold");
            fallback
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::cart::CartLine;
    use crate::customization::{CustomizationSnapshot, DesignSet, PricingRule};
    use crate::{CartLineId, OrderId, Price, ProductColor, ProductId, Size};

    #[derive(Default)]
    struct Submitter {
        fail: bool,
        seen: Mutex<Vec<GuestOrderRequest>>,
    }

    impl OrderSubmitter for Submitter {
        async fn create_guest_order(
            &self,
            request: GuestOrderRequest,
        ) -> Result<OrderReceipt, CollaboratorError> {
            if self.fail {
                return Err(CollaboratorError::Submission("database down".into()));
            }
            self.seen.lock().unwrap().push(request);
            Ok(OrderReceipt {
                order_id: OrderId::generate(),
                lookup_token: SecretString::from("token-123".to_string()),
            })
        }
    }

    struct Settings(Result<u32, CollaboratorError>);

    impl SettingsSource for Settings {
        async fn bulk_order_threshold(&self) -> Result<u32, CollaboratorError> {
            self.0.clone()
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_lines([CartLine {
            id: CartLineId::generate(),
            product_id: ProductId::generate(),
            product_name: "Kaos Polos".to_string(),
            unit_price: Price::idr(150_000),
            size: Size::M,
            color: ProductColor::new("#FFFFFF", "White"),
            quantity: 3,
            customization: CustomizationSnapshot::capture(
                &DesignSet::new(),
                &PricingRule::default(),
            ),
        }]);
        cart
    }

    fn contact() -> CustomerContact {
        CustomerContact::new("asep@kaoseuy.id", "Asep", Some("0812")).unwrap()
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_address: "Jl. Braga 1, Bandung".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_place_order_clears_cart() {
        let submitter = Submitter::default();
        let mut cart = cart();

        let receipt = place_order(&submitter, &mut cart, contact(), shipping())
            .await
            .unwrap();

        assert_eq!(receipt.lookup_token.expose_secret(), "token-123");
        assert!(cart.is_empty());
        let seen = submitter.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].total, Price::idr(450_000));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let submitter = Submitter::default();
        let mut cart = Cart::new();
        let err = place_order(&submitter, &mut cart, contact(), shipping())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert!(submitter.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_address_is_rejected() {
        let submitter = Submitter::default();
        let mut cart = cart();
        let err = place_order(&submitter, &mut cart, contact(), ShippingDetails::default())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::MissingAddress);
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_cart() {
        let submitter = Submitter {
            fail: true,
            ..Submitter::default()
        };
        let mut cart = cart();
        let before = cart.clone();

        let err = place_order(&submitter, &mut cart, contact(), shipping())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Collaborator(_)));
        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn test_resolve_bulk_threshold() {
        assert_eq!(resolve_bulk_threshold(&Settings(Ok(24)), 10).await, 24);
        let down = Settings(Err(CollaboratorError::Unavailable {
            service: "settings",
            reason: "timeout".into(),
        }));
        assert_eq!(resolve_bulk_threshold(&down, 10).await, 10);
    }
}
