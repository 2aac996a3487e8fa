//! Bounded placement math for the customization preview.
//!
//! Gestures arrive as raw deltas (a drag measured against the preview
//! container, a zoom button press) and are turned into part geometry here.
//! Nothing is ever rejected: out-of-range results are clamped and
//! non-finite input is ignored.

use serde::{Deserialize, Serialize};

use super::{DesignSet, PrintPosition};

/// Largest displacement, in percent of the container, on either axis.
pub const OFFSET_LIMIT: f64 = 20.0;
/// Smallest allowed art scale.
pub const MIN_SCALE: f64 = 0.5;
/// Largest allowed art scale.
pub const MAX_SCALE: f64 = 2.0;
/// Scale of freshly placed art.
pub const DEFAULT_SCALE: f64 = 1.0;
/// Scale change per zoom button press.
pub const ZOOM_STEP: f64 = 0.1;

/// Clamp one offset axis to `[-OFFSET_LIMIT, OFFSET_LIMIT]`. NaN becomes 0.
#[must_use]
pub fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-OFFSET_LIMIT, OFFSET_LIMIT)
    }
}

/// Clamp a scale to `[MIN_SCALE, MAX_SCALE]`. NaN becomes the default scale.
#[must_use]
pub fn clamp_scale(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_SCALE
    } else {
        value.clamp(MIN_SCALE, MAX_SCALE)
    }
}

/// Displacement from a position's anchor, in percent of the container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This offset with both axes clamped.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_axis(self.x),
            y: clamp_axis(self.y),
        }
    }
}

/// A drag gesture expressed as a fraction of the container size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragDelta {
    dx: f64,
    dy: f64,
}

impl DragDelta {
    /// Delta as fractions of container width and height (`0.1` = 10%).
    #[must_use]
    pub fn from_fraction(dx: f64, dy: f64) -> Self {
        Self {
            dx: finite_or_zero(dx),
            dy: finite_or_zero(dy),
        }
    }

    /// Delta measured in pixels against a container of the given size.
    ///
    /// A container with no extent on an axis contributes no movement on it.
    #[must_use]
    pub fn from_pixels(dx: f64, dy: f64, container_width: f64, container_height: f64) -> Self {
        Self::from_fraction(ratio(dx, container_width), ratio(dy, container_height))
    }

    /// The delta in offset units (percent).
    #[must_use]
    pub fn as_percent(&self) -> Offset {
        Offset::new(self.dx * 100.0, self.dy * 100.0)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn ratio(delta: f64, extent: f64) -> f64 {
    if extent > 0.0 && extent.is_finite() {
        delta / extent
    } else {
        0.0
    }
}

/// Gesture target bound to a design set.
///
/// Every operation acts on the set's active position only; switching the
/// active position redirects subsequent gestures without touching geometry.
#[derive(Debug)]
pub struct Visualizer<'a> {
    design: &'a mut DesignSet,
}

impl<'a> Visualizer<'a> {
    pub(crate) const fn new(design: &'a mut DesignSet) -> Self {
        Self { design }
    }

    /// Position receiving gestures.
    #[must_use]
    pub const fn target(&self) -> PrintPosition {
        self.design.active_position()
    }

    /// Apply a finished drag. Returns the stored offset.
    pub fn drag(&mut self, delta: DragDelta) -> Offset {
        let position = self.target();
        let current = self.design.part(position).offset();
        let step = delta.as_percent();
        self.design
            .set_offset(position, Offset::new(current.x + step.x, current.y + step.y));
        self.design.part(position).offset()
    }

    /// Change the scale by `delta`. Returns the stored scale.
    pub fn zoom(&mut self, delta: f64) -> f64 {
        let position = self.target();
        let current = self.design.part(position).scale();
        self.design.set_scale(position, current + finite_or_zero(delta));
        self.design.part(position).scale()
    }

    /// One zoom-in button press.
    pub fn zoom_in(&mut self) -> f64 {
        self.zoom(ZOOM_STEP)
    }

    /// One zoom-out button press.
    pub fn zoom_out(&mut self) -> f64 {
        self.zoom(-ZOOM_STEP)
    }

    /// Restore default geometry for the active position.
    pub fn reset(&mut self) {
        let position = self.target();
        self.design.set_offset(position, Offset::ORIGIN);
        self.design.set_scale(position, DEFAULT_SCALE);
    }

    /// Scale shown on the zoom indicator, in whole percent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // scale is within [0.5, 2.0]
    pub fn zoom_percent(&self) -> u32 {
        let scale = self.design.part(self.target()).scale();
        (scale * 100.0).round() as u32
    }
}
