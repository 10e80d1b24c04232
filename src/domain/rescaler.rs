//! Conversion of bounding-box geometry between an image's original resolution
//! and the fixed display width of the annotation screen.
//!
//! Height is never scaled independently: the same width-derived factor applies to
//! all four fields, so the aspect ratio is preserved.

use crate::entities::bounding_box::BoxCoords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rescaler {
    pub target_width: u32,
}

impl Rescaler {
    pub fn new(target_width: u32) -> Self {
        Rescaler { target_width }
    }

    /// Display width over original width.
    pub fn factor(&self, original_width: f64) -> f64 {
        f64::from(self.target_width) / original_width
    }

    /// Storage space → display space.
    pub fn to_display(&self, original_width: f64, coords: BoxCoords) -> BoxCoords {
        let factor = self.factor(original_width);
        BoxCoords {
            xc: coords.xc * factor,
            yc: coords.yc * factor,
            width: coords.width * factor,
            height: coords.height * factor,
            angle: coords.angle,
        }
    }

    /// Display space → storage space.
    pub fn to_storage(&self, original_width: f64, coords: BoxCoords) -> BoxCoords {
        let factor = self.factor(original_width);
        BoxCoords {
            xc: coords.xc / factor,
            yc: coords.yc / factor,
            width: coords.width / factor,
            height: coords.height / factor,
            angle: coords.angle,
        }
    }
}
