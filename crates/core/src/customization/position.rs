//! Print positions and their nominal placement areas.

use serde::{Deserialize, Serialize};

/// One of the four printable areas of a garment.
///
/// Variant order is the canonical order used everywhere positions are listed
/// (applied positions, summaries, persisted payloads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrintPosition {
    Front,
    Back,
    LeftArm,
    RightArm,
}

impl PrintPosition {
    /// All positions in canonical order.
    pub const ALL: [Self; 4] = [Self::Front, Self::Back, Self::LeftArm, Self::RightArm];

    /// Key used in persisted customization payloads.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::LeftArm => "leftArm",
            Self::RightArm => "rightArm",
        }
    }

    /// Nominal placement area used for initial layout.
    #[must_use]
    pub const fn safe_zone(&self) -> SafeZone {
        match self {
            Self::Front | Self::Back => SafeZone::new(20.0, 25.0, 50.0, 40.0),
            Self::LeftArm => SafeZone::new(15.0, 5.0, 20.0, 30.0),
            Self::RightArm => SafeZone::new(15.0, 75.0, 20.0, 30.0),
        }
    }

    /// Index into fixed-size per-position arrays.
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for PrintPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for PrintPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|position| position.key() == s)
            .ok_or_else(|| format!("invalid print position: {s}"))
    }
}

/// A rectangle in percent of the preview container.
///
/// Advisory only: art is anchored at the zone's center and then displaced by
/// the part's offset, which is clamped independently of the zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafeZone {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl SafeZone {
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Anchor point `(left, top)` in percent of the container.
    #[must_use]
    pub fn anchor(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}
