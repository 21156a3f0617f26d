//! Paper sheet dimensions and orientation presets.

use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the portrait sheet (landscape height).
pub const PAPER_SHORT_SIDE: f64 = 600.0;
/// Height of the portrait sheet (landscape width).
pub const PAPER_LONG_SIDE: f64 = 900.0;

/// Sheet orientation chosen when a template is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    pub fn name(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!("unknown orientation: {other}")),
        }
    }
}

/// The fixed-size canvas a template is laid out on.
///
/// Fixed for the lifetime of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub width: f64,
    pub height: f64,
}

impl Paper {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Paper for one of the preset orientations.
    pub fn for_orientation(orientation: Orientation) -> Self {
        paper_dimensions(orientation)
    }

    /// The whole sheet as a box anchored at the origin.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }

    /// Orientation implied by the aspect ratio (square counts as portrait).
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl Default for Paper {
    fn default() -> Self {
        paper_dimensions(Orientation::default())
    }
}

/// Resolve the paper size for an orientation.
pub fn paper_dimensions(orientation: Orientation) -> Paper {
    match orientation {
        Orientation::Portrait => Paper::new(PAPER_SHORT_SIDE, PAPER_LONG_SIDE),
        Orientation::Landscape => Paper::new(PAPER_LONG_SIDE, PAPER_SHORT_SIDE),
    }
}
