//! Product customization engine.
//!
//! A buyer picks print positions, attaches an image or text to each, and
//! nudges the art around inside a bounded area. This module holds that
//! state ([`DesignSet`]), turns gestures into clamped geometry
//! ([`Visualizer`]), derives the per-unit fee ([`PricingRule`]) and freezes
//! the result for the order row ([`CustomizationSnapshot`]).
//!
//! # Modules
//!
//! - [`position`] - The four print positions and their safe zones
//! - [`preview`] - Scoped ownership of transient image previews
//! - [`design`] - Per-position design state
//! - [`placement`] - Drag/zoom clamping
//! - [`pricing`] - Customization fee
//! - [`snapshot`] - Freeze for persistence, normalize on read

pub mod design;
pub mod placement;
pub mod position;
pub mod preview;
pub mod pricing;
pub mod snapshot;

pub use design::{DesignPart, DesignSet};
pub use placement::{
    DEFAULT_SCALE, DragDelta, MAX_SCALE, MIN_SCALE, OFFSET_LIMIT, Offset, Visualizer, ZOOM_STEP,
    clamp_axis, clamp_scale,
};
pub use position::{PrintPosition, SafeZone};
pub use preview::{PreviewHandle, PreviewReleaser, RecordingReleaser};
pub use pricing::{PRICE_PER_POSITION, PricingRule, applied_positions, fee_per_unit};
pub use snapshot::{
    CustomizationSnapshot, NormalizedCustomization, NormalizedPart, StoredCustomization,
    StoredPart, StoredParts, SummaryEntry, SummaryKind, freeze, normalize, summarize,
};
