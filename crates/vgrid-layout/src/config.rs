//! Layout tuning
//!
//! Constants that size the grid. The minimum cell height is always derived
//! from the width so the 16:9 constraint cannot be broken by configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Hard ceiling on simultaneously rendered tiles
pub const MAX_TILES: usize = 9;

/// Aspect ratio of every tile (width:height)
pub const ASPECT_WIDTH: u32 = 16;
pub const ASPECT_HEIGHT: u32 = 9;

/// Where y = 0 lies on the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// y grows upward from the bottom edge (canvas-style video surfaces)
    #[default]
    BottomLeft,
    /// y grows downward from the top edge
    TopLeft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Smallest acceptable tile width in pixels
    pub min_cell_width: u32,
    /// Margin on each side of a tile
    pub offset: u32,
    /// Tiles per page, at most [`MAX_TILES`]
    pub max_tiles: usize,
    /// Coordinate origin of the rendering surface
    pub origin: Origin,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_cell_width: 256,
            offset: 5,
            max_tiles: MAX_TILES,
            origin: Origin::BottomLeft,
        }
    }
}

impl LayoutConfig {
    pub fn min_cell_height(&self) -> u32 {
        self.min_cell_width * ASPECT_HEIGHT / ASPECT_WIDTH
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_cell_width == 0 {
            return Err(LayoutError::ZeroCellWidth);
        }
        if self.min_cell_width % ASPECT_WIDTH != 0 {
            return Err(LayoutError::InexactAspect(self.min_cell_width));
        }
        if self.max_tiles == 0 || self.max_tiles > MAX_TILES {
            return Err(LayoutError::TileLimit {
                got: self.max_tiles,
                max: MAX_TILES,
            });
        }
        Ok(())
    }

    /// Columns and rows of minimum-size cells that fit the viewport, each at least 1
    pub fn capacity(&self, width: u32, height: u32) -> (usize, usize) {
        let columns = width / (self.min_cell_width + 2 * self.offset);
        let rows = height / (self.min_cell_height() + 2 * self.offset);
        (columns.max(1) as usize, rows.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_height_is_sixteen_by_nine() {
        let config = LayoutConfig::default();
        assert_eq!(config.min_cell_height(), 144);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_width_without_exact_height() {
        let config = LayoutConfig {
            min_cell_width: 250,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(LayoutError::InexactAspect(250)));
    }

    #[test]
    fn rejects_tile_limit_above_nine() {
        let config = LayoutConfig {
            max_tiles: 12,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LayoutError::TileLimit { got: 12, .. })
        ));
    }

    #[test]
    fn capacity_never_below_one_by_one() {
        let config = LayoutConfig::default();
        assert_eq!(config.capacity(1280, 720), (4, 4));
        assert_eq!(config.capacity(100, 50), (1, 1));
        assert_eq!(config.capacity(800, 600), (3, 3));
    }
}
