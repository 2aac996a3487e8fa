//! Inspect stored customization payloads.
//!
//! Accepts a bare `customization` object, a stored order item carrying one,
//! or a whole stored order with `items`. Anything else is still normalized
//! (to four empty parts) rather than rejected.

use std::path::Path;

use kaos_euy_core::customization::{PrintPosition, SummaryEntry, normalize, summarize};
use kaos_euy_core::order::{OrderItemView, StoredOrder, StoredOrderItem};
use serde_json::Value;
use tracing::info;

/// Summary of one customization found in the input.
#[derive(Debug, PartialEq)]
pub struct Inspected {
    pub label: String,
    pub applied: Vec<PrintPosition>,
    pub summary: Vec<SummaryEntry>,
}

impl From<OrderItemView> for Inspected {
    fn from(view: OrderItemView) -> Self {
        Self {
            label: format!(
                "{} {} / {} x{}",
                view.product_name, view.color_name, view.size, view.quantity
            ),
            applied: view.customization.applied_positions(),
            summary: view.summary,
        }
    }
}

/// Find and summarize every customization in `value`.
#[must_use]
pub fn inspect_value(value: &Value) -> Vec<Inspected> {
    if value.get("items").is_some_and(Value::is_array) {
        let order: StoredOrder = serde_json::from_value(value.clone()).unwrap_or_default();
        return order.item_views().into_iter().map(Inspected::from).collect();
    }

    if value.get("customization").is_some() {
        let item: StoredOrderItem = serde_json::from_value(value.clone()).unwrap_or_default();
        return vec![OrderItemView::new(&item).into()];
    }

    let normalized = normalize(value);
    vec![Inspected {
        label: "customization".to_string(),
        applied: normalized.applied_positions(),
        summary: summarize(&normalized),
    }]
}

/// Read a JSON file and log its customization summaries.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not JSON.
pub async fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(path).await?;
    let value: Value = serde_json::from_str(&content)?;

    for inspected in inspect_value(&value) {
        let applied: Vec<&str> = inspected.applied.iter().map(PrintPosition::key).collect();
        info!(item = %inspected.label, applied = ?applied, "Customization");
        if inspected.summary.is_empty() {
            info!("  (no image or text)");
        }
        for entry in &inspected.summary {
            info!(position = %entry.position, kind = ?entry.kind, value = %entry.value, "  part");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use kaos_euy_core::customization::SummaryKind;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bare_customization() {
        let inspected = inspect_value(&json!({
            "parts": {"leftArm": {"text": "EUY!"}},
            "applied_positions": ["leftArm", "back"]
        }));
        assert_eq!(inspected.len(), 1);
        assert_eq!(
            inspected[0].applied,
            vec![PrintPosition::Back, PrintPosition::LeftArm]
        );
        assert_eq!(inspected[0].summary[0].kind, SummaryKind::Text);
    }

    #[test]
    fn test_order_with_items() {
        let inspected = inspect_value(&json!({
            "id": "not-a-uuid",
            "items": [
                {"product_name": "Kaos", "size": "L", "color_name": "Black", "quantity": 2,
                 "customization": {"parts": {"front": {"image_url": "https://cdn.test/f.png"}}}},
                {"product_name": "Kaos", "customization": "garbage"}
            ]
        }));
        assert_eq!(inspected.len(), 2);
        assert_eq!(inspected[0].label, "Kaos Black / L x2");
        assert_eq!(inspected[0].summary[0].value, "https://cdn.test/f.png");
        assert!(inspected[1].summary.is_empty());
    }

    #[test]
    fn test_single_item_and_junk() {
        let item = inspect_value(&json!({"customization": null, "quantity": 1}));
        assert_eq!(item.len(), 1);
        assert!(item[0].applied.is_empty());

        let junk = inspect_value(&json!([1, 2, 3]));
        assert_eq!(junk.len(), 1);
        assert!(junk[0].summary.is_empty());
    }
}
