use crate::{constants::PALETTE, entities::bounding_box::BoundingBoxPayload, errors::AppError};

/// Round-robin display colours, assigned by list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colorizer {
    colors: Vec<String>,
}

impl Default for Colorizer {
    fn default() -> Self {
        Colorizer {
            colors: PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Colorizer {
    pub fn new(colors: Vec<String>) -> Result<Self, AppError> {
        // the modulus below is len - 1
        if colors.len() < 2 {
            return Err(AppError::Validation("a palette needs at least two colours".into()));
        }
        Ok(Colorizer { colors })
    }

    /// Colour for the box at `index`. The last palette entry is never selected.
    pub fn color_for(&self, index: usize) -> &str {
        &self.colors[index % (self.colors.len() - 1)]
    }

    pub fn colorize(&self, boxes: &mut [BoundingBoxPayload]) {
        for (i, b) in boxes.iter_mut().enumerate() {
            b.color = Some(self.color_for(i).to_string());
        }
    }
}
