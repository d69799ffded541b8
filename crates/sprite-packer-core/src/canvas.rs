//! Free-space tracker for a single packing trial.
//!
//! Rectangles are placed as far left as possible; among positions with the same x the
//! lowest y wins. Occupancy is kept in a [`ResizableGrid`] whose rows and columns are split
//! at the edges of every placed rectangle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpritePackerError};
use crate::grid::ResizableGrid;

/// Initial grid capacity per axis. The grid doubles when this runs out.
const INITIAL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasCell {
    pub occupied: bool,
}

impl fmt::Display for CanvasCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.occupied { "x" } else { "." })
    }
}

/// Outcome of [`Canvas::add_rectangle`].
///
/// Both variants carry the lowest free height deficit seen since the last
/// [`Canvas::set_dimensions`]: the smallest extra height that could have let some
/// column take a rectangle it had to skip. `None` when no column has been skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasPlacement {
    Placed {
        x: u32,
        y: u32,
        lowest_deficit: Option<u32>,
    },
    Failed { lowest_deficit: Option<u32> },
}

impl CanvasPlacement {
    pub fn lowest_deficit(&self) -> Option<u32> {
        match *self {
            CanvasPlacement::Placed { lowest_deficit, .. } => lowest_deficit,
            CanvasPlacement::Failed { lowest_deficit } => lowest_deficit,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, CanvasPlacement::Placed { .. })
    }
}

/// Snapshot of canvas counters since the last [`Canvas::set_dimensions`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanvasStats {
    pub rectangle_add_attempts: u64,
    pub cells_generated: u64,
    pub lowest_free_height_deficit: Option<u32>,
}

/// Cells a rectangle spans from its top-left cell, and how much of the last
/// column/row it leaves unused.
#[derive(Debug, Clone, Copy)]
struct Footprint {
    columns: usize,
    rows: usize,
    leftover_width: u32,
    leftover_height: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    cells: ResizableGrid<CanvasCell>,
    width: u32,
    height: u32,
    lowest_free_height_deficit: Option<u32>,
    cells_generated: u64,
    add_attempts: u64,
}

impl Canvas {
    /// Width used by the optimal search as "no limit".
    pub const UNLIMITED_SIZE: u32 = i16::MAX as u32;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resets the canvas to one free cell covering `width` x `height` and clears the counters.
    pub fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SpritePackerError::InvalidDimensions { width, height });
        }
        self.cells.initialize(
            INITIAL_CAPACITY,
            INITIAL_CAPACITY,
            width,
            height,
            CanvasCell::default(),
        )?;
        self.width = width;
        self.height = height;
        self.lowest_free_height_deficit = None;
        self.cells_generated = 0;
        self.add_attempts = 0;
        Ok(())
    }

    pub fn statistics(&self) -> CanvasStats {
        CanvasStats {
            rectangle_add_attempts: self.add_attempts,
            cells_generated: self.cells_generated,
            lowest_free_height_deficit: self.lowest_free_height_deficit,
        }
    }

    /// Places a `width` x `height` rectangle at the leftmost, then lowest, free position.
    ///
    /// Failing to fit is not an error; it is reported as [`CanvasPlacement::Failed`].
    pub fn add_rectangle(&mut self, width: u32, height: u32) -> Result<CanvasPlacement> {
        if width == 0 || height == 0 {
            return Err(SpritePackerError::InvalidDimensions { width, height });
        }
        self.add_attempts += 1;

        if self.width < width {
            return Ok(CanvasPlacement::Failed {
                lowest_deficit: self.lowest_free_height_deficit,
            });
        }

        let nbr_rows = self.cells.nbr_rows();
        let mut x = 0usize;
        let mut y = 0usize;
        let mut offset_x = 0u32;
        let mut offset_y = 0u32;

        loop {
            // Skip occupied cells first; the deficit has to be measured from the top of
            // the highest occupied cell.
            while y < nbr_rows && self.cells.item(x, y).occupied {
                offset_y += self.cells.row_height(y);
                y += 1;
            }

            if y < nbr_rows && self.free_height_deficit(offset_y, height).is_none() {
                if let Some(fp) = self.footprint(x, y, width, height) {
                    self.occupy(x, y, fp)?;
                    return Ok(CanvasPlacement::Placed {
                        x: offset_x,
                        y: offset_y,
                        lowest_deficit: self.lowest_free_height_deficit,
                    });
                }
                offset_y += self.cells.row_height(y);
                y += 1;
            }

            // Too close to the bottom edge (or past it): move to the next column.
            // The deficit recorded here ignores whether the column is wide enough, so it
            // can be lower than what would actually make the rectangle fit.
            if let Some(deficit) = self.free_height_deficit(offset_y, height) {
                offset_y = 0;
                y = 0;
                offset_x += self.cells.column_width(x);
                x += 1;
                if self.lowest_free_height_deficit.is_none_or(|d| d > deficit) {
                    self.lowest_free_height_deficit = Some(deficit);
                }
            }

            if self.width - offset_x < width {
                return Ok(CanvasPlacement::Failed {
                    lowest_deficit: self.lowest_free_height_deficit,
                });
            }
        }
    }

    /// Height missing below `offset_y` for a rectangle of `required` height,
    /// or `None` if there is room.
    fn free_height_deficit(&self, offset_y: u32, required: u32) -> Option<u32> {
        let space_left = self.height.saturating_sub(offset_y);
        (required > space_left).then(|| required - space_left)
    }

    /// Checks that every cell under a rectangle anchored at cell `(x, y)` is free.
    /// The caller guarantees the canvas extends far enough right and down.
    fn footprint(&self, x: usize, y: usize, width: u32, height: u32) -> Option<Footprint> {
        let mut found_height = 0u32;
        let mut found_width = 0u32;
        let mut trial_x = x;
        let mut trial_y = y;

        while found_height < height {
            trial_x = x;
            found_width = 0;
            while found_width < width {
                if self.cells.item(trial_x, trial_y).occupied {
                    return None;
                }
                found_width += self.cells.column_width(trial_x);
                trial_x += 1;
            }
            found_height += self.cells.row_height(trial_y);
            trial_y += 1;
        }

        Some(Footprint {
            columns: trial_x - x,
            rows: trial_y - y,
            leftover_width: found_width - width,
            leftover_height: found_height - height,
        })
    }

    /// Marks the footprint occupied, splitting its last column and row first so the
    /// occupied cells match the rectangle exactly.
    fn occupy(&mut self, x: usize, y: usize, fp: Footprint) -> Result<()> {
        if fp.leftover_width > 0 {
            self.cells_generated += self.cells.nbr_rows() as u64;
            self.cells
                .insert_column(x + fp.columns - 1, fp.leftover_width)?;
        }
        if fp.leftover_height > 0 {
            self.cells_generated += self.cells.nbr_columns() as u64;
            self.cells.insert_row(y + fp.rows - 1, fp.leftover_height)?;
        }
        for i in x..x + fp.columns {
            for j in y..y + fp.rows {
                self.cells.set_item(i, j, CanvasCell { occupied: true });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "canvas {}x{}", self.width, self.height)?;
        write!(f, "{}", self.cells)
    }
}
