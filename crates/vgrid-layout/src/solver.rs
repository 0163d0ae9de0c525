//! Grid layout solver
//!
//! Picks the rows x columns arrangement that gives the largest 16:9 tiles for a
//! tile count, then places the tiles centered in the viewport.
//!
//! Coordinates follow [`Origin`]. With [`Origin::BottomLeft`] y is measured
//! from the bottom edge, so the first row of tiles (indices `0..columns`)
//! gets the largest y even though it is the top row on screen. Tile order
//! is always visual reading order: left to right, top to bottom.

use vgrid_protocol::{QualityTier, TileRect};

use crate::config::{ASPECT_HEIGHT, ASPECT_WIDTH, LayoutConfig, Origin};
use crate::error::Result;

/// Grid shape considered for a tile count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    rows: usize,
    columns: usize,
}

/// Output of [`GridSolver::solve`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
    pub cell_width: u32,
    pub cell_height: u32,
    /// One rectangle per visible slot, in slot order
    pub tiles: Vec<TileRect>,
}

impl GridLayout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, index: usize) -> Option<&TileRect> {
        self.tiles.get(index)
    }

    /// Same row/column count and cell size
    pub fn same_shape(&self, other: &GridLayout) -> bool {
        self.rows == other.rows
            && self.columns == other.columns
            && self.cell_width == other.cell_width
            && self.cell_height == other.cell_height
    }
}

/// Stateless solver with a candidate table built once per configuration
#[derive(Debug, Clone)]
pub struct GridSolver {
    config: LayoutConfig,
    /// `candidates[n]` lists the shapes for `n` tiles in enumeration order
    candidates: Vec<Vec<Candidate>>,
}

impl GridSolver {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let candidates = (0..=config.max_tiles).map(enumerate_candidates).collect();
        Ok(Self { config, candidates })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `count` tiles in a `width` x `height` viewport.
    ///
    /// Returns an empty layout when `count` is zero or above the tile limit.
    /// If the viewport cannot hold `count` minimum-size cells, only as many
    /// tiles as fit are laid out.
    pub fn solve(&self, width: u32, height: u32, count: usize) -> GridLayout {
        if count == 0 || count > self.config.max_tiles {
            return GridLayout::empty();
        }

        let (max_columns, max_rows) = self.config.capacity(width, height);
        let rows = max_rows.min(count);
        let columns = max_columns.min(count);
        let actual = count.min(rows * columns);

        let mut best: Option<(Candidate, u32)> = None;
        let mut best_area = 0u64;
        for candidate in &self.candidates[actual] {
            if candidate.rows > max_rows || candidate.columns > max_columns {
                continue;
            }
            let unit = self.unit(width, height, *candidate);
            let (cell_width, cell_height) = self.cell_size(unit);
            let area = u64::from(cell_width) * u64::from(cell_height);
            // Strictly greater: the earliest candidate wins a tie
            if best.is_none() || area > best_area {
                best = Some((*candidate, unit));
                best_area = area;
            }
        }

        let (shape, unit) = match best {
            Some(found) => found,
            None => {
                let shape = Candidate {
                    rows: actual.div_ceil(max_columns),
                    columns: max_columns.min(actual),
                };
                tracing::debug!(
                    "No candidate grid for {} tiles in {}x{}, falling back to {}x{}",
                    actual,
                    width,
                    height,
                    shape.rows,
                    shape.columns
                );
                (shape, self.unit(width, height, shape))
            }
        };

        let (cell_width, cell_height) = self.cell_size(unit);
        if cell_width == 0 || cell_height == 0 {
            tracing::debug!("Viewport {}x{} too small to place any tile", width, height);
            return GridLayout::empty();
        }

        let quality = quality_for(actual, cell_height);
        let tiles = self.place(width, height, actual, shape, unit, quality);

        tracing::debug!(
            "Solved {} tiles in {}x{}: {} rows x {} columns, cell {}x{} at {}",
            actual,
            width,
            height,
            shape.rows,
            shape.columns,
            cell_width,
            cell_height,
            quality
        );

        GridLayout {
            rows: shape.rows,
            columns: shape.columns,
            cell_width,
            cell_height,
            tiles,
        }
    }

    /// Largest 16:9 unit such that the grid fits the viewport
    fn unit(&self, width: u32, height: u32, shape: Candidate) -> u32 {
        let by_width = width / (ASPECT_WIDTH * shape.columns as u32);
        let by_height = height / (ASPECT_HEIGHT * shape.rows as u32);
        by_width.min(by_height)
    }

    fn cell_size(&self, unit: u32) -> (u32, u32) {
        let margin = 2 * self.config.offset;
        (
            (unit * ASPECT_WIDTH).saturating_sub(margin),
            (unit * ASPECT_HEIGHT).saturating_sub(margin),
        )
    }

    fn place(
        &self,
        width: u32,
        height: u32,
        count: usize,
        shape: Candidate,
        unit: u32,
        quality: QualityTier,
    ) -> Vec<TileRect> {
        let offset = self.config.offset;
        let box_width = unit * ASPECT_WIDTH;
        let box_height = unit * ASPECT_HEIGHT;
        let (cell_width, cell_height) = self.cell_size(unit);

        let columns = shape.columns as u32;
        let rows = shape.rows as u32;
        let margin_x = width.saturating_sub(columns * box_width) / 2;
        let margin_y = height.saturating_sub(rows * box_height) / 2;

        // The last row is centered on the cells it actually holds
        let used_rows = count.div_ceil(shape.columns);
        let last_row_cells = (count - (used_rows - 1) * shape.columns) as u32;
        let last_margin_x = width.saturating_sub(last_row_cells * box_width) / 2;

        (0..count)
            .map(|index| {
                let row = (index / shape.columns) as u32;
                let column = (index % shape.columns) as u32;
                let left = if row as usize == used_rows - 1 {
                    last_margin_x
                } else {
                    margin_x
                };
                let visual_row = match self.config.origin {
                    Origin::TopLeft => row,
                    Origin::BottomLeft => rows - row - 1,
                };
                TileRect {
                    width: cell_width,
                    height: cell_height,
                    x: left + column * box_width + offset,
                    y: margin_y + visual_row * box_height + offset,
                    quality,
                }
            })
            .collect()
    }
}

/// All shapes for `count` tiles: rows from 1 to ceil(count / 2) with just
/// enough columns, each followed by its transpose.
fn enumerate_candidates(count: usize) -> Vec<Candidate> {
    let mut list: Vec<Candidate> = Vec::new();
    if count == 0 {
        return list;
    }
    let mut push = |rows: usize, columns: usize| {
        let candidate = Candidate { rows, columns };
        if !list.contains(&candidate) {
            list.push(candidate);
        }
    };
    for rows in 1..=count.div_ceil(2) {
        let columns = count.div_ceil(rows);
        push(rows, columns);
        if rows != columns {
            push(columns, rows);
        }
    }
    list
}

/// Finer tiers only when the tile is big enough to show them
pub fn quality_for(count: usize, cell_height: u32) -> QualityTier {
    if count <= 4 && cell_height >= 510 {
        QualityTier::Video720p
    } else if count <= 4 && cell_height >= 270 {
        QualityTier::Video360p
    } else if count > 4 && cell_height >= 180 {
        QualityTier::Video180p
    } else {
        QualityTier::Video90p
    }
}
