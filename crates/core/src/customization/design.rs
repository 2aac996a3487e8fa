//! Per-position design state.
//!
//! A [`DesignSet`] is owned by whichever view shows the product being
//! customized. It is created with defaults when the product opens, mutated
//! only through the named operations below, and reset when the product
//! changes or after a successful add-to-cart.

use tracing::debug;

use super::placement::{DEFAULT_SCALE, Offset, Visualizer, clamp_scale};
use super::{PreviewHandle, PrintPosition};

/// Design content and geometry for one print position.
#[derive(Debug)]
pub struct DesignPart {
    applied: bool,
    image_ref: Option<String>,
    preview: Option<PreviewHandle>,
    text: String,
    offset: Offset,
    scale: f64,
}

impl Default for DesignPart {
    fn default() -> Self {
        Self {
            applied: false,
            image_ref: None,
            preview: None,
            text: String::new(),
            offset: Offset::ORIGIN,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DesignPart {
    /// Whether this position is selected for printing (and billed).
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.applied
    }

    /// Reference (URL) of the uploaded image, if any.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Key of the transient local preview, if one is held.
    #[must_use]
    pub fn preview_key(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::key)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether the part carries an image or non-blank text.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.image_ref.is_some() || !self.text.trim().is_empty()
    }
}

/// The four design parts plus the position currently being edited.
#[derive(Debug)]
pub struct DesignSet {
    parts: [DesignPart; 4],
    active: PrintPosition,
}

impl Default for DesignSet {
    fn default() -> Self {
        Self {
            parts: std::array::from_fn(|_| DesignPart::default()),
            active: PrintPosition::Front,
        }
    }
}

impl DesignSet {
    /// A design set with every position at defaults and `Front` active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn active_position(&self) -> PrintPosition {
        self.active
    }

    #[must_use]
    #[allow(clippy::indexing_slicing)] // one slot per PrintPosition
    pub const fn part(&self, position: PrintPosition) -> &DesignPart {
        &self.parts[position.index()]
    }

    #[allow(clippy::indexing_slicing)]
    const fn part_mut(&mut self, position: PrintPosition) -> &mut DesignPart {
        &mut self.parts[position.index()]
    }

    /// Parts in canonical position order.
    pub fn parts(&self) -> impl Iterator<Item = (PrintPosition, &DesignPart)> {
        PrintPosition::ALL.into_iter().zip(self.parts.iter())
    }

    /// Choose which position receives uploads and gestures.
    pub const fn set_active_position(&mut self, position: PrintPosition) {
        self.active = position;
    }

    /// Flip whether a position is applied. Content is kept, so re-enabling
    /// restores it.
    pub fn toggle(&mut self, position: PrintPosition) {
        let part = self.part_mut(position);
        part.applied = !part.applied;
        debug!(%position, applied = part.applied, "toggled print position");
    }

    /// Attach an uploaded image, optionally with its local preview.
    ///
    /// Always applies the position. A previously held preview is released
    /// before this call returns. A blank reference clears the stored image.
    pub fn set_image(
        &mut self,
        position: PrintPosition,
        image_ref: impl Into<String>,
        preview: Option<PreviewHandle>,
    ) {
        let image_ref = image_ref.into();
        let part = self.part_mut(position);
        part.image_ref = if image_ref.trim().is_empty() {
            None
        } else {
            Some(image_ref)
        };
        drop(std::mem::replace(&mut part.preview, preview));
        part.applied = true;
        debug!(%position, has_image = part.image_ref.is_some(), "set design image");
    }

    /// Set the text for a position.
    ///
    /// The position is applied iff the text is non-blank or an image is set,
    /// so clearing the text of an image-less part un-applies it.
    pub fn set_text(&mut self, position: PrintPosition, text: impl Into<String>) {
        let part = self.part_mut(position);
        part.text = text.into();
        part.applied = !part.text.trim().is_empty() || part.image_ref.is_some();
    }

    /// Store an offset, clamped per axis.
    pub fn set_offset(&mut self, position: PrintPosition, offset: Offset) {
        self.part_mut(position).offset = offset.clamped();
    }

    /// Store a scale, clamped to the allowed range.
    pub fn set_scale(&mut self, position: PrintPosition, scale: f64) {
        self.part_mut(position).scale = clamp_scale(scale);
    }

    /// Restore one position to defaults, releasing its preview.
    pub fn reset_part(&mut self, position: PrintPosition) {
        *self.part_mut(position) = DesignPart::default();
        debug!(%position, "reset design part");
    }

    /// Restore every position to defaults and make `Front` active.
    pub fn reset_all(&mut self) {
        *self = Self::default();
        debug!("reset design set");
    }

    /// Gesture target for the active position.
    pub const fn visualizer(&mut self) -> Visualizer<'_> {
        Visualizer::new(self)
    }
}
