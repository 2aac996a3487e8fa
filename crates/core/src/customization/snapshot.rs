//! Order snapshots: freezing a design for persistence and reading it back.
//!
//! # Persisted shape
//!
//! ```json
//! {
//!   "parts": {
//!     "front":    { "image_url": "https://…", "text": "", "position": {"x": 0, "y": 0}, "scale": 1 },
//!     "back":     { … },
//!     "leftArm":  { … },
//!     "rightArm": { … }
//!   },
//!   "applied_positions": ["front", "leftArm"]
//! }
//! ```
//!
//! The outbound side ([`freeze`], [`CustomizationSnapshot`]) produces exactly
//! this shape. The inbound side ([`normalize`], [`summarize`]) accepts any
//! JSON value at all, since historical rows may be partial or hand-edited,
//! and always yields four well-formed parts. Display code should read stored
//! customizations only through these functions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::Price;

use super::placement::{DEFAULT_SCALE, Offset, clamp_scale};
use super::pricing::{PricingRule, applied_positions};
use super::{DesignPart, DesignSet, PrintPosition};

// =============================================================================
// Outbound
// =============================================================================

/// One position as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPart {
    pub image_url: Option<String>,
    pub text: String,
    pub position: Offset,
    pub scale: f64,
}

impl From<&DesignPart> for StoredPart {
    fn from(part: &DesignPart) -> Self {
        Self {
            image_url: part.image_ref().map(str::to_string),
            text: part.text().to_string(),
            position: part.offset(),
            scale: part.scale(),
        }
    }
}

/// All four positions as persisted, keyed by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredParts {
    pub front: StoredPart,
    pub back: StoredPart,
    #[serde(rename = "leftArm")]
    pub left_arm: StoredPart,
    #[serde(rename = "rightArm")]
    pub right_arm: StoredPart,
}

/// The exact `customization` payload stored on an order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCustomization {
    pub parts: StoredParts,
    pub applied_positions: Vec<PrintPosition>,
}

impl StoredCustomization {
    /// The payload as a JSON value, ready for a JSON column.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            warn!(error = %e, "failed to serialize customization");
            Value::Null
        })
    }
}

/// Freeze a design set into its persisted shape.
#[must_use]
pub fn freeze(design: &DesignSet) -> StoredCustomization {
    StoredCustomization {
        parts: StoredParts {
            front: design.part(PrintPosition::Front).into(),
            back: design.part(PrintPosition::Back).into(),
            left_arm: design.part(PrintPosition::LeftArm).into(),
            right_arm: design.part(PrintPosition::RightArm).into(),
        },
        applied_positions: applied_positions(design),
    }
}

/// Customization captured at add-to-cart time.
///
/// Immutable once captured: every cart line produced by the same
/// add-to-cart action carries an identical copy, and the copy is written to
/// the order row unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationSnapshot {
    customization: StoredCustomization,
    fee_per_unit: Price,
}

impl CustomizationSnapshot {
    /// Capture the current design and its fee.
    #[must_use]
    pub fn capture(design: &DesignSet, pricing: &PricingRule) -> Self {
        Self {
            customization: freeze(design),
            fee_per_unit: pricing.fee_per_unit(design),
        }
    }

    #[must_use]
    pub const fn customization(&self) -> &StoredCustomization {
        &self.customization
    }

    #[must_use]
    pub fn applied_positions(&self) -> &[PrintPosition] {
        &self.customization.applied_positions
    }

    #[must_use]
    pub const fn fee_per_unit(&self) -> Price {
        self.fee_per_unit
    }

    /// Whether any position is applied.
    #[must_use]
    pub fn is_customized(&self) -> bool {
        !self.customization.applied_positions.is_empty()
    }
}

// =============================================================================
// Inbound
// =============================================================================

/// A stored part after defensive normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPart {
    pub applied: bool,
    pub image_url: Option<String>,
    pub text: String,
    pub position: Offset,
    pub scale: f64,
}

impl Default for NormalizedPart {
    fn default() -> Self {
        Self {
            applied: false,
            image_url: None,
            text: String::new(),
            position: Offset::ORIGIN,
            scale: DEFAULT_SCALE,
        }
    }
}

/// Four normalized parts in canonical order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NormalizedCustomization {
    front: NormalizedPart,
    back: NormalizedPart,
    #[serde(rename = "leftArm")]
    left_arm: NormalizedPart,
    #[serde(rename = "rightArm")]
    right_arm: NormalizedPart,
}

impl NormalizedCustomization {
    #[must_use]
    pub const fn part(&self, position: PrintPosition) -> &NormalizedPart {
        match position {
            PrintPosition::Front => &self.front,
            PrintPosition::Back => &self.back,
            PrintPosition::LeftArm => &self.left_arm,
            PrintPosition::RightArm => &self.right_arm,
        }
    }

    const fn part_mut(&mut self, position: PrintPosition) -> &mut NormalizedPart {
        match position {
            PrintPosition::Front => &mut self.front,
            PrintPosition::Back => &mut self.back,
            PrintPosition::LeftArm => &mut self.left_arm,
            PrintPosition::RightArm => &mut self.right_arm,
        }
    }

    pub fn parts(&self) -> impl Iterator<Item = (PrintPosition, &NormalizedPart)> {
        PrintPosition::ALL
            .into_iter()
            .map(move |position| (position, self.part(position)))
    }

    /// Applied positions in canonical order.
    #[must_use]
    pub fn applied_positions(&self) -> Vec<PrintPosition> {
        self.parts()
            .filter(|(_, part)| part.applied)
            .map(|(position, _)| position)
            .collect()
    }
}

/// Normalize an arbitrary stored `customization` value.
///
/// Never fails. Missing or mistyped fields fall back to defaults:
/// `image_url` → `None`, `text` → `""`, `position.x`/`position.y` → `0`,
/// `scale` → `1`. Offsets and scale are then clamped to their editing
/// ranges.
///
/// When the payload carries an `applied_positions` array, a part is applied
/// iff the array lists it, so content left in a toggled-off position stays
/// unapplied. Older rows without the array mark a part applied if it carries
/// an image or non-blank text, or if its raw `applied` flag is truthy.
#[must_use]
pub fn normalize(raw: &Value) -> NormalizedCustomization {
    let mut normalized = NormalizedCustomization::default();

    let Some(root) = raw.as_object() else {
        if !raw.is_null() {
            warn!(kind = json_kind(raw), "customization is not an object");
        }
        return normalized;
    };

    let Some(parts) = root.get("parts").and_then(Value::as_object) else {
        warn!("customization has no parts object");
        return normalized;
    };

    let listed = listed_positions(root);

    for position in PrintPosition::ALL {
        let mut part = parts
            .get(position.key())
            .map_or_else(NormalizedPart::default, normalize_part);
        if let Some(listed) = &listed {
            part.applied = listed.contains(&position);
        }
        *normalized.part_mut(position) = part;
    }

    normalized
}

fn normalize_part(raw: &Value) -> NormalizedPart {
    let Some(fields) = raw.as_object() else {
        warn!(kind = json_kind(raw), "customization part is not an object");
        return NormalizedPart::default();
    };

    let image_url = fields
        .get("image_url")
        .and_then(Value::as_str)
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string);
    let text = fields
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let position = fields.get("position");
    let offset = Offset::new(
        number_field(position, "x").unwrap_or(0.0),
        number_field(position, "y").unwrap_or(0.0),
    )
    .clamped();
    let scale = clamp_scale(
        fields
            .get("scale")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_SCALE),
    );
    let applied = fields.get("applied").is_some_and(is_truthy)
        || image_url.is_some()
        || !text.trim().is_empty();

    NormalizedPart {
        applied,
        image_url,
        text,
        position: offset,
        scale,
    }
}

/// The stored `applied_positions` list, if the row has one.
///
/// Rows written before the list existed return `None`; their parts fall
/// back to the per-part flag and content.
fn listed_positions(root: &Map<String, Value>) -> Option<Vec<PrintPosition>> {
    root.get("applied_positions")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|key| key.parse().ok())
                .collect()
        })
}

fn number_field(object: Option<&Value>, key: &str) -> Option<f64> {
    object?.get(key)?.as_f64().filter(|n| n.is_finite())
}

/// JavaScript-style truthiness, matching how the flag was historically
/// written by the storefront.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What a summarized position carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    Image,
    Text,
}

/// One line of a customization summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub position: PrintPosition,
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub value: String,
}

/// Summarize the content of each position, in canonical order.
///
/// An image wins over text. Unapplied positions are skipped, and so are
/// applied (and billed) positions with neither image nor text.
#[must_use]
pub fn summarize(customization: &NormalizedCustomization) -> Vec<SummaryEntry> {
    customization
        .parts()
        .filter(|(_, part)| part.applied)
        .filter_map(|(position, part)| {
            if let Some(url) = &part.image_url {
                return Some(SummaryEntry {
                    position,
                    kind: SummaryKind::Image,
                    value: url.clone(),
                });
            }
            let text = part.text.trim();
            (!text.is_empty()).then(|| SummaryEntry {
                position,
                kind: SummaryKind::Text,
                value: text.to_string(),
            })
        })
        .collect()
}
